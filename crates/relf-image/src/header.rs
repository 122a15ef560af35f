//! File header decoding.

use crate::constants::*;
use crate::endian::EndianConverter;
use crate::ident::{ElfClass, ElfData, Identity};
use crate::names;
use crate::source::{ByteSource, RecordReader};
use crate::Result;

/// Decoded ELF file header. Address- and offset-sized fields are widened to
/// 64 bits so the surface is class-agnostic; the class-dependent layout is
/// handled once at decode time.
#[derive(Clone, Debug)]
pub struct FileHeader {
    pub class: ElfClass,
    pub encoding: ElfData,
    pub version: u32,
    pub os_abi: u8,
    pub abi_version: u8,
    pub elf_type: u16,
    pub machine: u16,
    pub entry: u64,
    pub phoff: u64,
    pub shoff: u64,
    pub flags: u32,
    pub ehsize: u16,
    pub phentsize: u16,
    pub phnum: u16,
    pub shentsize: u16,
    pub shnum: u16,
    pub shstrndx: u16,
}

impl FileHeader {
    /// Decode the header at file offset 0. The identity probe has already
    /// fixed class and encoding; the record size follows the class.
    pub(crate) fn load(
        source: &mut ByteSource,
        ident: &Identity,
        conv: EndianConverter,
    ) -> Result<Self> {
        let size = if ident.class.is_64bit() {
            EHDR_SIZE_64
        } else {
            EHDR_SIZE_32
        };
        let buf = source.read_exact_at(0, size)?;
        let mut r = RecordReader::new(&buf, conv);
        r.skip(EI_NIDENT);

        let is64 = ident.class.is_64bit();
        let elf_type = r.u16();
        let machine = r.u16();
        let version = r.u32();
        let entry = r.addr(is64);
        let phoff = r.addr(is64);
        let shoff = r.addr(is64);
        let flags = r.u32();
        let ehsize = r.u16();
        let phentsize = r.u16();
        let phnum = r.u16();
        let shentsize = r.u16();
        let shnum = r.u16();
        let shstrndx = r.u16();

        Ok(Self {
            class: ident.class,
            encoding: ident.encoding,
            version,
            os_abi: ident.os_abi,
            abi_version: ident.abi_version,
            elf_type,
            machine,
            entry,
            phoff,
            shoff,
            flags,
            ehsize,
            phentsize,
            phnum,
            shentsize,
            shnum,
            shstrndx,
        })
    }

    pub fn is_64bit(&self) -> bool {
        self.class.is_64bit()
    }

    pub fn is_little_endian(&self) -> bool {
        self.encoding.is_little()
    }

    /// OS/ABI name for identification byte 7, `"Unknown"` for codes outside
    /// the table.
    pub fn abi_name(&self) -> &'static str {
        names::abi_name(self.os_abi)
    }

    /// File type name (`"Executable"`, `"Shared Object"`, ...).
    pub fn type_name(&self) -> &'static str {
        names::elf_type_name(self.elf_type)
    }

    /// Machine architecture name from the canonical EM table.
    pub fn machine_name(&self) -> &'static str {
        names::machine_name(self.machine)
    }
}
