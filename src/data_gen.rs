// src/data_gen.rs
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block generation for keyed payload streams.
//!
//! We need an efficient way to generate data for objects we write to object
//! storage, and ideally that data differs per object. A block is derived from
//! the object key: keys at least as long as the request are used verbatim,
//! otherwise the block is filled with alphanumeric filler.
//!
//! # Performance
//! Filler is produced in whole chunks (4 KiB, 32 KiB or 64 KiB depending on the
//! request size). Each chunk is filled from its own Xoshiro256++ keystream with a
//! single `fill_bytes` call and then mapped in place onto [`LETTERS`], so there
//! is no per-character allocation. Large requests fan the chunks out over rayon.

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::GeneratorConfig;
use crate::constants::*;

/// Chunk size tier for a request of `num_bytes`.
///
/// - `<= 4 KiB`: 4 KiB
/// - `<= 32 KiB`: 32 KiB
/// - larger: 64 KiB
pub fn data_block_size(num_bytes: usize) -> usize {
    if num_bytes <= SMALL_CHUNK_SIZE {
        SMALL_CHUNK_SIZE
    } else if num_bytes <= MEDIUM_CHUNK_SIZE {
        MEDIUM_CHUNK_SIZE
    } else {
        LARGE_CHUNK_SIZE
    }
}

/// Generate exactly `num_bytes` bytes for `key` using the default config.
///
/// Filler is seeded from time + OS entropy, so two calls with a short key are
/// not expected to match. Use [`generate_data_from_key_with_config`] with an
/// explicit seed when reproducible filler is needed.
///
/// # Example
/// ```rust
/// use keyed_payload::data_gen::generate_data_from_key;
///
/// assert_eq!(generate_data_from_key("turkey", 6), b"turkey");
/// assert_eq!(generate_data_from_key("hello", 1), b"h");
/// assert_eq!(generate_data_from_key("s3tester", 1024).len(), 1024);
/// ```
pub fn generate_data_from_key(key: &str, num_bytes: usize) -> Vec<u8> {
    generate_data_from_key_with_config(key, num_bytes, &GeneratorConfig::default())
}

/// Generate exactly `num_bytes` bytes for `key`.
///
/// If the key is at least `num_bytes` long its first `num_bytes` bytes are
/// returned verbatim (this covers `num_bytes == 0`). Otherwise the result is
/// filler drawn from [`LETTERS`].
pub fn generate_data_from_key_with_config(
    key: &str,
    num_bytes: usize,
    config: &GeneratorConfig,
) -> Vec<u8> {
    let key_bytes = key.as_bytes();
    if key_bytes.len() >= num_bytes {
        return key_bytes[..num_bytes].to_vec();
    }

    let chunk_size = config
        .effective_chunk_size()
        .unwrap_or_else(|| data_block_size(num_bytes));
    let nchunks = num_bytes.div_ceil(chunk_size);
    let call_entropy = config.seed.unwrap_or_else(generate_call_entropy);

    tracing::debug!(
        "Generating filler: size={}, chunk_size={}, chunks={}, seeded={}",
        num_bytes,
        chunk_size,
        nchunks,
        config.seed.is_some()
    );

    let mut data = vec![0u8; nchunks * chunk_size];
    fill_chunks(&mut data, chunk_size, call_entropy, config);

    // Trim the buffer to the exact requested size.
    data.truncate(num_bytes);
    data
}

/// True if every byte belongs to the filler alphabet.
pub fn is_alphanumeric_payload(data: &[u8]) -> bool {
    data.iter().all(u8::is_ascii_alphanumeric)
}

fn fill_chunks(data: &mut [u8], chunk_size: usize, call_entropy: u64, config: &GeneratorConfig) {
    let nchunks = data.len() / chunk_size;
    let threads = config.effective_threads();

    if nchunks < PARALLEL_CHUNK_THRESHOLD || threads <= 1 {
        tracing::trace!("Sequential fill of {} chunks", nchunks);
        data.chunks_mut(chunk_size)
            .enumerate()
            .for_each(|(i, chunk)| fill_chunk(chunk, i, call_entropy));
        return;
    }

    let parallel_fill = |data: &mut [u8]| {
        data.par_chunks_mut(chunk_size)
            .enumerate()
            .for_each(|(i, chunk)| fill_chunk(chunk, i, call_entropy));
    };

    // Only a capped thread count needs a dedicated pool; otherwise use the global one.
    match config.max_threads {
        None => parallel_fill(data),
        Some(_) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => {
                tracing::trace!("Parallel fill of {} chunks on {} threads", nchunks, threads);
                pool.install(|| parallel_fill(data));
            }
            Err(e) => {
                tracing::warn!("Failed to create thread pool: {}, falling back to sequential", e);
                data.chunks_mut(chunk_size)
                    .enumerate()
                    .for_each(|(i, chunk)| fill_chunk(chunk, i, call_entropy));
            }
        },
    }
}

/// Fill one chunk with alphanumeric filler.
///
/// The RNG is derived from `seed_base + chunk_idx`, so a chunk's content does
/// not depend on which thread filled it.
fn fill_chunk(out: &mut [u8], chunk_idx: usize, seed_base: u64) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed_base.wrapping_add(chunk_idx as u64));
    rng.fill_bytes(out);

    // Multiply-shift maps 0..=255 onto 0..62 without a division per byte.
    for b in out.iter_mut() {
        *b = LETTERS[(*b as usize * LETTERS.len()) >> 8];
    }
}

/// Generate per-call entropy from time + urandom
fn generate_call_entropy() -> u64 {
    let time_entropy = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    let urandom_entropy: u64 = {
        let mut rng = rand::rng();
        rng.next_u64()
    };

    time_entropy.wrapping_add(urandom_entropy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size_tiers() {
        assert_eq!(data_block_size(0), SMALL_CHUNK_SIZE);
        assert_eq!(data_block_size(4096), SMALL_CHUNK_SIZE);
        assert_eq!(data_block_size(4097), MEDIUM_CHUNK_SIZE);
        assert_eq!(data_block_size(32 * 1024), MEDIUM_CHUNK_SIZE);
        assert_eq!(data_block_size(32 * 1024 + 1), LARGE_CHUNK_SIZE);
        assert_eq!(data_block_size(100 * 1024 * 1024), LARGE_CHUNK_SIZE);
    }

    #[test]
    fn test_key_prefix_used_verbatim() {
        assert_eq!(generate_data_from_key("abc", 0), b"");
        assert_eq!(generate_data_from_key("", 0), b"");
        assert_eq!(generate_data_from_key("hello", 1), b"h");
        assert_eq!(generate_data_from_key("turkey", 6), b"turkey");
    }

    #[test]
    fn test_short_key_gets_filler_of_exact_length() {
        for size in [1usize, 10, 4095, 4096, 4097, 70_000] {
            let data = generate_data_from_key("cran", size);
            assert_eq!(data.len(), size);
            assert!(is_alphanumeric_payload(&data));
        }
    }

    #[test]
    fn test_fill_chunk_is_alphanumeric() {
        let mut buf = vec![0u8; SMALL_CHUNK_SIZE];
        fill_chunk(&mut buf, 3, 99);
        assert!(is_alphanumeric_payload(&buf));
    }

    #[test]
    fn test_seeded_filler_is_reproducible() {
        let cfg = GeneratorConfig::seeded(12345);
        let a = generate_data_from_key_with_config("k", 100_000, &cfg);
        let b = generate_data_from_key_with_config("k", 100_000, &cfg);
        assert_eq!(a, b);

        let other = generate_data_from_key_with_config("k", 100_000, &GeneratorConfig::seeded(54321));
        assert_ne!(a, other);
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let size = 2 * 1024 * 1024;
        let single = GeneratorConfig { seed: Some(7), max_threads: Some(1), ..Default::default() };
        let multi = GeneratorConfig { seed: Some(7), max_threads: Some(4), ..Default::default() };
        let global = GeneratorConfig::seeded(7);

        let a = generate_data_from_key_with_config("obj", size, &single);
        let b = generate_data_from_key_with_config("obj", size, &multi);
        let c = generate_data_from_key_with_config("obj", size, &global);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_alphabet_coverage() {
        let data = generate_data_from_key_with_config("", 64 * 1024, &GeneratorConfig::seeded(1));
        let mut seen = [false; 256];
        for &b in &data {
            seen[b as usize] = true;
        }
        for &letter in LETTERS.iter() {
            assert!(seen[letter as usize], "missing {}", letter as char);
        }
    }
}
