//! Identity probe over the 16-byte identification prefix.

use crate::constants::*;
use crate::{ElfError, Result};

/// ELF class, identification byte 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

impl ElfClass {
    pub fn is_64bit(self) -> bool {
        matches!(self, ElfClass::Elf64)
    }

    pub fn name(self) -> &'static str {
        match self {
            ElfClass::Elf32 => "ELF32",
            ElfClass::Elf64 => "ELF64",
        }
    }
}

/// Data encoding of multi-byte fields, identification byte 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElfData {
    LittleEndian,
    BigEndian,
}

impl ElfData {
    pub fn is_little(self) -> bool {
        matches!(self, ElfData::LittleEndian)
    }

    pub fn name(self) -> &'static str {
        match self {
            ElfData::LittleEndian => "Little Endian",
            ElfData::BigEndian => "Big Endian",
        }
    }
}

/// Decoded identification prefix. Class and encoding are fixed here and
/// drive every structural decision for the rest of the parse.
#[derive(Clone, Copy, Debug)]
pub struct Identity {
    pub class: ElfClass,
    pub encoding: ElfData,
    pub version: u8,
    pub os_abi: u8,
    pub abi_version: u8,
}

impl Identity {
    pub fn parse(ident: &[u8; EI_NIDENT]) -> Result<Self> {
        if ident[..4] != ELF_MAGIC {
            return Err(ElfError::BadMagic);
        }
        let class = match ident[EI_CLASS] {
            ELF_CLASS_32 => ElfClass::Elf32,
            ELF_CLASS_64 => ElfClass::Elf64,
            other => return Err(ElfError::BadClass(other)),
        };
        let encoding = match ident[EI_DATA] {
            ELF_DATA_LSB => ElfData::LittleEndian,
            ELF_DATA_MSB => ElfData::BigEndian,
            other => return Err(ElfError::BadEncoding(other)),
        };
        Ok(Self {
            class,
            encoding,
            version: ident[EI_VERSION],
            os_abi: ident[EI_OSABI],
            abi_version: ident[EI_ABIVERSION],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(class: u8, data: u8) -> [u8; EI_NIDENT] {
        let mut bytes = [0u8; EI_NIDENT];
        bytes[..4].copy_from_slice(&ELF_MAGIC);
        bytes[EI_CLASS] = class;
        bytes[EI_DATA] = data;
        bytes[EI_VERSION] = 1;
        bytes
    }

    #[test]
    fn accepts_both_classes_and_encodings() {
        let probe = Identity::parse(&ident(ELF_CLASS_32, ELF_DATA_LSB)).unwrap();
        assert_eq!(probe.class, ElfClass::Elf32);
        assert_eq!(probe.encoding, ElfData::LittleEndian);
        assert!(!probe.class.is_64bit());

        let probe = Identity::parse(&ident(ELF_CLASS_64, ELF_DATA_MSB)).unwrap();
        assert_eq!(probe.class, ElfClass::Elf64);
        assert_eq!(probe.encoding, ElfData::BigEndian);
        assert!(!probe.encoding.is_little());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = ident(ELF_CLASS_64, ELF_DATA_LSB);
        bytes[0] = 0x7E;
        assert!(matches!(Identity::parse(&bytes), Err(ElfError::BadMagic)));
    }

    #[test]
    fn rejects_bad_class() {
        assert!(matches!(
            Identity::parse(&ident(3, ELF_DATA_LSB)),
            Err(ElfError::BadClass(3))
        ));
    }

    #[test]
    fn rejects_bad_encoding() {
        assert!(matches!(
            Identity::parse(&ident(ELF_CLASS_32, 0)),
            Err(ElfError::BadEncoding(0))
        ));
    }
}
