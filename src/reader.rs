// src/reader.rs
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seekable reader over a keyed payload.
//!
//! A [`DummyReader`] reports `size` readable bytes and serves them from a
//! generated block. When the block is shorter than `size` it is treated as a
//! repeating tile: logical byte `k` is block byte `k % block.len()`.

use std::io::{self, BufRead, Read, Seek, SeekFrom};

use bytes::Bytes;

use crate::config::GeneratorConfig;
use crate::data_gen::{generate_data_from_key, generate_data_from_key_with_config};
use crate::error::{Anchor, ReaderError, Result};

/// Result of a successful [`DummyReader::try_read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// This many bytes were copied into the caller's buffer.
    Data(usize),
    /// The cursor is at the logical end; nothing was copied.
    EndOfStream,
}

impl ReadOutcome {
    pub fn bytes_read(&self) -> usize {
        match self {
            ReadOutcome::Data(n) => *n,
            ReadOutcome::EndOfStream => 0,
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ReadOutcome::EndOfStream)
    }
}

/// Deterministic, seekable payload stream of a fixed logical size.
///
/// Single owner: the reader holds its block and cursor exclusively. Build one
/// instance per concurrent upload.
#[derive(Debug, Clone)]
pub struct DummyReader {
    /// Logical size reported to callers
    size: u64,
    /// Logical cursor, always in `[0, size]`
    offset: u64,
    /// Generated block, tiled when shorter than `size`
    block: Bytes,
    /// Cursor inside `block`; equals `offset % block.len()`
    block_pos: usize,
}

impl DummyReader {
    /// Build a stream of `size` bytes whose block is generated from `seed`.
    ///
    /// The whole logical size is generated up front. Filler (used when `seed`
    /// is shorter than `size`) is not reproducible across constructions; use
    /// [`DummyReader::with_config`] with a seeded config for that.
    pub fn new(size: u64, seed: &str) -> Self {
        Self::with_config(size, seed, &GeneratorConfig::default())
    }

    /// Build a stream of `size` bytes using an explicit generator config.
    pub fn with_config(size: u64, seed: &str, config: &GeneratorConfig) -> Self {
        let block = generate_data_from_key_with_config(seed, block_len_for(size), config);
        tracing::debug!(
            "Creating DummyReader: size={}, block_len={}, seeded={}",
            size,
            block.len(),
            config.seed.is_some()
        );
        Self::from_block(size, Bytes::from(block))
    }

    /// Build a stream that repeats the seed bytes verbatim until `size` is covered.
    ///
    /// ```rust
    /// use std::io::Read;
    /// use keyed_payload::DummyReader;
    ///
    /// let mut r = DummyReader::tiled(10, "cran");
    /// let mut out = String::new();
    /// r.read_to_string(&mut out).unwrap();
    /// assert_eq!(out, "crancrancr");
    /// ```
    pub fn tiled(size: u64, seed: &str) -> Self {
        let tile_len = block_len_for(size).min(seed.len());
        Self::from_block(size, Bytes::from(generate_data_from_key(seed, tile_len)))
    }

    /// Wrap a pre-built block. The block may be shorter or longer than `size`.
    pub fn from_block(size: u64, block: Bytes) -> Self {
        Self {
            size,
            offset: 0,
            block,
            block_pos: 0,
        }
    }

    /// Logical size of the stream.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Current logical offset.
    pub fn position(&self) -> u64 {
        self.offset
    }

    /// Bytes left before end of stream.
    pub fn remaining(&self) -> u64 {
        self.size - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.size
    }

    /// Length of the backing block (may be less than [`DummyReader::size`]).
    pub fn block_len(&self) -> usize {
        self.block.len()
    }

    /// Copy the next `min(buf.len(), remaining)` bytes into `buf`.
    ///
    /// Never returns a short read: either the full amount is copied or the
    /// stream is at its end. A stream without a block fails with
    /// [`ReaderError::Unconfigured`].
    pub fn try_read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        if self.block.is_empty() {
            return Err(ReaderError::Unconfigured);
        }
        if self.offset >= self.size {
            return Ok(ReadOutcome::EndOfStream);
        }

        let want = self.remaining().min(buf.len() as u64) as usize;

        // This runs very frequently during large object puts, so copy whole
        // block runs at a time and wrap the block cursor when it is used up.
        let mut filled = 0;
        while filled < want {
            let avail = &self.block[self.block_pos..];
            let n = avail.len().min(want - filled);
            buf[filled..filled + n].copy_from_slice(&avail[..n]);
            filled += n;
            self.advance_block(n);
        }

        self.offset += want as u64;
        Ok(ReadOutcome::Data(want))
    }

    /// Move the cursor relative to `anchor` and return the new offset.
    ///
    /// `FromEnd` counts backwards: the target is `size - delta`. A target
    /// outside `[0, size]` fails with [`ReaderError::OutOfRange`] and leaves
    /// the cursor untouched.
    pub fn seek(&mut self, delta: i64, anchor: Anchor) -> Result<u64> {
        let delta = delta as i128;
        let target = match anchor {
            Anchor::FromStart => delta,
            Anchor::FromCurrent => self.offset as i128 + delta,
            Anchor::FromEnd => self.size as i128 - delta,
        };
        self.seek_to(anchor, target)
    }

    /// [`DummyReader::seek`] with a raw whence value (0 = start, 1 = current, 2 = end).
    pub fn seek_whence(&mut self, delta: i64, whence: i32) -> Result<u64> {
        let anchor = Anchor::try_from(whence)?;
        self.seek(delta, anchor)
    }

    /// Return to offset 0.
    pub fn reset(&mut self) {
        self.set_offset(0);
    }

    fn seek_to(&mut self, anchor: Anchor, target: i128) -> Result<u64> {
        if target < 0 || target > self.size as i128 {
            return Err(ReaderError::OutOfRange {
                anchor,
                offset: target,
                size: self.size,
            });
        }
        self.set_offset(target as u64);
        Ok(self.offset)
    }

    fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
        self.block_pos = if self.block.is_empty() {
            0
        } else {
            (offset % self.block.len() as u64) as usize
        };
    }

    /// Contiguous bytes available at the block cursor without wrapping.
    fn current_run(&self) -> usize {
        let left_in_block = self.block.len() - self.block_pos;
        self.remaining().min(left_in_block as u64) as usize
    }

    fn advance_block(&mut self, n: usize) {
        self.block_pos += n;
        if self.block_pos == self.block.len() {
            self.block_pos = 0;
        }
    }
}

/// Sizes beyond the address space cannot be materialized; the allocation fails instead.
fn block_len_for(size: u64) -> usize {
    usize::try_from(size).unwrap_or(usize::MAX)
}

impl Read for DummyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.try_read(buf)?.bytes_read())
    }
}

impl Seek for DummyReader {
    /// Standard seek semantics: `SeekFrom::End(d)` targets `size + d`.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let result = match pos {
            SeekFrom::Start(n) => self.seek_to(Anchor::FromStart, n as i128),
            SeekFrom::Current(d) => self.seek_to(Anchor::FromCurrent, self.offset as i128 + d as i128),
            SeekFrom::End(d) => self.seek_to(Anchor::FromEnd, self.size as i128 + d as i128),
        };
        Ok(result?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.offset)
    }
}

impl BufRead for DummyReader {
    /// Hands out the block run at the cursor, bounded by the remaining bytes.
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.block.is_empty() {
            return Err(ReaderError::Unconfigured.into());
        }
        let run = self.current_run();
        Ok(&self.block[self.block_pos..self.block_pos + run])
    }

    fn consume(&mut self, amt: usize) {
        let amt = amt.min(self.current_run());
        self.offset += amt as u64;
        self.advance_block(amt);
    }
}
