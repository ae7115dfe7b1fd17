// src/source.rs
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io::{self, Read, Seek, Write};

use crate::reader::DummyReader;

/// A sized, seekable payload body as consumed by upload clients.
///
/// Implementors report end of data by returning `Ok(0)` from `read` once
/// `position() == size()`.
pub trait PayloadSource: Read + Seek + Send {
    /// Total bytes the source will yield from offset 0.
    fn size(&self) -> u64;

    /// Current read offset.
    fn position(&self) -> u64;

    fn remaining(&self) -> u64 {
        self.size().saturating_sub(self.position())
    }
}

impl PayloadSource for DummyReader {
    fn size(&self) -> u64 {
        DummyReader::size(self)
    }

    fn position(&self) -> u64 {
        DummyReader::position(self)
    }
}

/// Drain `src` into `dst` using reads of at most `chunk_size` bytes.
///
/// Returns the number of bytes copied. A `chunk_size` of 0 is treated as 1.
pub fn copy_payload<S, W>(src: &mut S, dst: &mut W, chunk_size: usize) -> io::Result<u64>
where
    S: PayloadSource + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;
    loop {
        let n = src.read(&mut buf)?;
        if n == 0 {
            break;
        }
        dst.write_all(&buf[..n])?;
        total += n as u64;
    }
    tracing::trace!("copy_payload: {} bytes in {}-byte reads", total, buf.len());
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::SeekFrom;

    #[test]
    fn test_copy_payload_full_stream() {
        let mut r = DummyReader::tiled(11, "abcd");
        let mut out = Vec::new();
        assert_eq!(copy_payload(&mut r, &mut out, 3).unwrap(), 11);
        assert_eq!(out, b"abcdabcdabc");
        assert_eq!(PayloadSource::remaining(&r), 0);
    }

    #[test]
    fn test_copy_payload_from_offset_via_dyn() {
        let mut r = DummyReader::tiled(8, "wxyz");
        Seek::seek(&mut r, SeekFrom::Start(5)).unwrap();
        let src: &mut dyn PayloadSource = &mut r;
        assert_eq!(src.remaining(), 3);

        let mut out = Vec::new();
        assert_eq!(copy_payload(src, &mut out, 0).unwrap(), 3);
        assert_eq!(out, b"xyz");
    }

    #[test]
    fn test_copy_payload_unconfigured_errors() {
        let mut r = DummyReader::new(0, "");
        let mut out = Vec::new();
        let err = copy_payload(&mut r, &mut out, 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
