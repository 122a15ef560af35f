//! Shared helpers for building synthetic ELF files on disk.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Byte order used when emitting fixture fields.
#[derive(Clone, Copy)]
pub enum Endian {
    Little,
    Big,
}

/// Emits one fixed-size record field by field.
pub struct Record {
    endian: Endian,
    pub bytes: Vec<u8>,
}

impl Record {
    pub fn new(endian: Endian) -> Self {
        Self {
            endian,
            bytes: Vec::new(),
        }
    }

    pub fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn u16(mut self, value: u16) -> Self {
        match self.endian {
            Endian::Little => self.bytes.extend_from_slice(&value.to_le_bytes()),
            Endian::Big => self.bytes.extend_from_slice(&value.to_be_bytes()),
        }
        self
    }

    pub fn u32(mut self, value: u32) -> Self {
        match self.endian {
            Endian::Little => self.bytes.extend_from_slice(&value.to_le_bytes()),
            Endian::Big => self.bytes.extend_from_slice(&value.to_be_bytes()),
        }
        self
    }

    pub fn u64(mut self, value: u64) -> Self {
        match self.endian {
            Endian::Little => self.bytes.extend_from_slice(&value.to_le_bytes()),
            Endian::Big => self.bytes.extend_from_slice(&value.to_be_bytes()),
        }
        self
    }

    pub fn i32(self, value: i32) -> Self {
        self.u32(value as u32)
    }

    pub fn i64(self, value: i64) -> Self {
        self.u64(value as u64)
    }

    pub fn raw(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(data);
        self
    }
}

/// Sparse file image; gaps between placed spans stay zero.
pub struct FileImage {
    pub bytes: Vec<u8>,
}

impl FileImage {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn put(&mut self, offset: usize, data: &[u8]) {
        let end = offset + data.len();
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        self.bytes[offset..end].copy_from_slice(data);
    }

    /// Write the image to a temp file; the handle keeps the file alive for
    /// the duration of the test.
    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(&self.bytes).expect("write fixture");
        file.flush().expect("flush fixture");
        file
    }
}

/// String-table accumulator; hands back the offset of each added string.
pub struct StrTab {
    data: Vec<u8>,
}

impl StrTab {
    pub fn new() -> Self {
        Self { data: vec![0] }
    }

    pub fn add(&mut self, name: &str) -> u32 {
        let offset = self.data.len() as u32;
        self.data.extend_from_slice(name.as_bytes());
        self.data.push(0);
        offset
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// The 16-byte identification prefix.
pub fn ident(endian: Endian, class: u8, data: u8) -> Vec<u8> {
    let mut bytes = Record::new(endian)
        .raw(&[0x7F, b'E', b'L', b'F'])
        .u8(class)
        .u8(data)
        .u8(1) // EI_VERSION
        .u8(0) // EI_OSABI
        .u8(0) // EI_ABIVERSION
        .bytes;
    bytes.resize(16, 0);
    bytes
}
