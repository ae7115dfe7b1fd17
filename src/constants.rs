// src/constants.rs
//
// SPDX-License-Identifier: Apache-2.0 OR MIT
//
// Centralized constants for keyed-payload to avoid hardcoded values throughout the codebase

// =============================================================================
// Data Generation Constants
// =============================================================================

/// Symbols used for filler bytes: lowercase, uppercase, digits (62 total)
pub const LETTERS: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Smallest generation chunk (4 KiB), used for small objects
pub const SMALL_CHUNK_SIZE: usize = 4 * 1024;

/// Mid-tier generation chunk (32 KiB)
pub const MEDIUM_CHUNK_SIZE: usize = 32 * 1024;

/// Largest generation chunk (64 KiB), used for multi-megabyte objects
pub const LARGE_CHUNK_SIZE: usize = 64 * 1024;

/// Minimum number of chunks before filler generation is spread across rayon threads.
/// Below this the thread pool hand-off costs more than it saves.
pub const PARALLEL_CHUNK_THRESHOLD: usize = 16;

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for an explicit filler RNG seed (u64)
/// Example: KEYED_PAYLOAD_SEED=12345
pub const ENV_PAYLOAD_SEED: &str = "KEYED_PAYLOAD_SEED";

/// Environment variable overriding the generation chunk size in bytes
pub const ENV_PAYLOAD_CHUNK_SIZE: &str = "KEYED_PAYLOAD_CHUNK_SIZE";

/// Environment variable capping the number of generator threads
pub const ENV_PAYLOAD_THREADS: &str = "KEYED_PAYLOAD_THREADS";
