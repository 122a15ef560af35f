//! Random-access byte source over the underlying file.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::warn;

use crate::endian::EndianConverter;
use crate::{ElfError, Result};

/// Seekable reader over the file bytes. Every read is bounded by the length
/// observed when the file was opened; the handle lives only for the duration
/// of `ElfImage::open`.
pub(crate) struct ByteSource {
    file: File,
    len: u64,
}

impl ByteSource {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ElfError::FileNotFound(path.to_path_buf())
            } else {
                ElfError::Io(e)
            }
        })?;
        let len = file.metadata()?.len();
        Ok(Self { file, len })
    }

    /// Read exactly `wanted` bytes at `offset`. Fails with `Truncated` when
    /// the requested range is not fully inside the file. Used for header
    /// records, which are required reads.
    pub(crate) fn read_exact_at(&mut self, offset: u64, wanted: usize) -> Result<Vec<u8>> {
        match offset.checked_add(wanted as u64) {
            Some(end) if end <= self.len => {}
            _ => return Err(ElfError::Truncated { offset, wanted }),
        }
        let mut buf = vec![0u8; wanted];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file
            .read_exact(&mut buf)
            .map_err(|_| ElfError::Truncated { offset, wanted })?;
        Ok(buf)
    }

    /// Capture a data buffer of `size` bytes at `offset`. Failure is not
    /// fatal: an out-of-range request, an allocation failure, or a short read
    /// degrades to an empty buffer and parsing continues.
    pub(crate) fn read_data(&mut self, offset: u64, size: u64) -> Vec<u8> {
        let Ok(wanted) = usize::try_from(size) else {
            warn!(offset, size, "data buffer exceeds address space, dropping");
            return Vec::new();
        };
        match offset.checked_add(size) {
            Some(end) if end <= self.len => {}
            _ => {
                warn!(offset, size, file_len = self.len, "data range outside file, dropping");
                return Vec::new();
            }
        }

        let mut buf = Vec::new();
        if buf.try_reserve_exact(wanted).is_err() {
            warn!(offset, size, "allocation failed, keeping empty buffer");
            return Vec::new();
        }
        buf.resize(wanted, 0);

        let read = self
            .file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.read_exact(&mut buf));
        if read.is_err() {
            warn!(offset, size, "short read, dropping data buffer");
            return Vec::new();
        }
        buf
    }
}

/// Walks the fields of one fixed-size record. Bytes are interpreted in the
/// host's native order, exactly as a raw struct read would produce, then
/// normalised through the converter. Requesting past the record end yields
/// zeroes; record sizes are validated before construction.
pub(crate) struct RecordReader<'a> {
    buf: &'a [u8],
    pos: usize,
    conv: EndianConverter,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(buf: &'a [u8], conv: EndianConverter) -> Self {
        Self { buf, pos: 0, conv }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(bytes) = self.buf.get(self.pos..self.pos + N) {
            out.copy_from_slice(bytes);
        }
        self.pos += N;
        out
    }

    pub(crate) fn skip(&mut self, count: usize) {
        self.pos += count;
    }

    pub(crate) fn u8(&mut self) -> u8 {
        self.conv.u8(self.take::<1>()[0])
    }

    pub(crate) fn u16(&mut self) -> u16 {
        self.conv.u16(u16::from_ne_bytes(self.take()))
    }

    pub(crate) fn u32(&mut self) -> u32 {
        self.conv.u32(u32::from_ne_bytes(self.take()))
    }

    pub(crate) fn u64(&mut self) -> u64 {
        self.conv.u64(u64::from_ne_bytes(self.take()))
    }

    pub(crate) fn i32(&mut self) -> i32 {
        self.conv.i32(i32::from_ne_bytes(self.take()))
    }

    pub(crate) fn i64(&mut self) -> i64 {
        self.conv.i64(i64::from_ne_bytes(self.take()))
    }

    /// Read an address-sized field widened to 64 bits.
    pub(crate) fn addr(&mut self, is_64bit: bool) -> u64 {
        if is_64bit {
            self.u64()
        } else {
            u64::from(self.u32())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_reader_walks_fields_in_order() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut r = RecordReader::new(&buf, EndianConverter::for_file(true));
        assert_eq!(r.u16(), 0x0201);
        assert_eq!(r.u32(), 0x0605_0403);
    }

    #[test]
    fn record_reader_normalises_foreign_order() {
        // Big-endian file on a little-endian host.
        let buf = [0x12, 0x34, 0x56, 0x78];
        let conv = EndianConverter::for_file(false);
        let mut r = RecordReader::new(&buf, conv);
        assert_eq!(r.u32(), 0x1234_5678);
    }

    #[test]
    fn record_reader_returns_zero_past_end() {
        let buf = [0xFF];
        let mut r = RecordReader::new(&buf, EndianConverter::new(true, true));
        r.skip(1);
        assert_eq!(r.u32(), 0);
        assert_eq!(r.u64(), 0);
    }

    #[test]
    fn addr_widens_32_bit_fields() {
        let buf = [0x44, 0x33, 0x22, 0x11];
        let conv = EndianConverter::for_file(true);
        let mut r = RecordReader::new(&buf, conv);
        assert_eq!(r.addr(false), 0x1122_3344);
    }
}
