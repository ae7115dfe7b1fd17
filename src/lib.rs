// src/lib.rs
//
// SPDX-License-Identifier: Apache-2.0 OR MIT
//
// Crate root — public re-exports.

//! Deterministic, seekable synthetic payloads for object-storage load tests.
//!
//! ```rust
//! use std::io::Read;
//! use keyed_payload::{Anchor, DummyReader};
//!
//! let mut body = DummyReader::new(5, "hello");
//! let mut buf = [0u8; 5];
//! assert_eq!(body.read(&mut buf).unwrap(), 5);
//! assert_eq!(&buf, b"hello");
//!
//! // Rewind for a retried upload.
//! body.seek(0, Anchor::FromStart).unwrap();
//! ```

pub mod constants;
pub mod config;
pub mod error;
pub mod data_gen;
pub mod reader;
pub mod source;
mod async_io;

pub use config::GeneratorConfig;
pub use data_gen::{
    data_block_size,
    generate_data_from_key,
    generate_data_from_key_with_config,
    is_alphanumeric_payload,
};
pub use error::{Anchor, ReaderError, Result};
pub use reader::{DummyReader, ReadOutcome};
pub use source::{copy_payload, PayloadSource};
