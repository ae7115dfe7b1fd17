// src/config.rs
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::env;
use std::str::FromStr;

use crate::constants::{
    ENV_PAYLOAD_CHUNK_SIZE, ENV_PAYLOAD_SEED, ENV_PAYLOAD_THREADS, LARGE_CHUNK_SIZE,
    SMALL_CHUNK_SIZE,
};

/// Runtime parameters used by `data_gen`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Filler chunk size in bytes (None = pick by object size tier).
    /// Clamped to the 4 KiB..=64 KiB range.
    pub chunk_size: Option<usize>,
    /// Optional RNG seed for reproducible filler (None = time + OS entropy)
    pub seed: Option<u64>,
    /// Maximum number of threads to use (None = use all available cores)
    pub max_threads: Option<usize>,
}

impl GeneratorConfig {
    /// Config with an explicit filler seed, everything else default
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Build a config from `KEYED_PAYLOAD_*` environment variables.
    ///
    /// Unset variables keep their default; values that fail to parse are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        Self {
            chunk_size: env_parse(ENV_PAYLOAD_CHUNK_SIZE),
            seed: env_parse(ENV_PAYLOAD_SEED),
            max_threads: env_parse(ENV_PAYLOAD_THREADS),
        }
    }

    /// Effective chunk size if one was requested
    pub fn effective_chunk_size(&self) -> Option<usize> {
        self.chunk_size
            .map(|cs| cs.clamp(SMALL_CHUNK_SIZE, LARGE_CHUNK_SIZE))
    }

    /// Effective thread count, never zero
    pub fn effective_threads(&self) -> usize {
        self.max_threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_is_clamped() {
        let small = GeneratorConfig { chunk_size: Some(10), ..Default::default() };
        assert_eq!(small.effective_chunk_size(), Some(SMALL_CHUNK_SIZE));

        let big = GeneratorConfig { chunk_size: Some(1 << 30), ..Default::default() };
        assert_eq!(big.effective_chunk_size(), Some(LARGE_CHUNK_SIZE));

        assert_eq!(GeneratorConfig::default().effective_chunk_size(), None);
    }

    #[test]
    fn test_threads_never_zero() {
        let cfg = GeneratorConfig { max_threads: Some(0), ..Default::default() };
        assert_eq!(cfg.effective_threads(), 1);
        assert!(GeneratorConfig::default().effective_threads() >= 1);
    }

    #[test]
    fn test_seeded() {
        let cfg = GeneratorConfig::seeded(42);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.chunk_size, None);
    }

    #[test]
    fn test_from_env() {
        // Single test touches these variables so parallel tests don't race.
        unsafe {
            env::set_var(ENV_PAYLOAD_SEED, "777");
            env::set_var(ENV_PAYLOAD_CHUNK_SIZE, "not-a-number");
            env::set_var(ENV_PAYLOAD_THREADS, " 3 ");
        }
        let cfg = GeneratorConfig::from_env();
        unsafe {
            env::remove_var(ENV_PAYLOAD_SEED);
            env::remove_var(ENV_PAYLOAD_CHUNK_SIZE);
            env::remove_var(ENV_PAYLOAD_THREADS);
        }

        assert_eq!(cfg.seed, Some(777));
        assert_eq!(cfg.chunk_size, None);
        assert_eq!(cfg.max_threads, Some(3));
    }
}
