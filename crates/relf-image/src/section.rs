//! Section records and their typed payloads.

use crate::constants::*;
use crate::dynamic::{DynamicEntry, DynamicTable};
use crate::endian::EndianConverter;
use crate::ident::ElfClass;
use crate::names;
use crate::note::NoteEntry;
use crate::reloc::RelocationTable;
use crate::source::{ByteSource, RecordReader};
use crate::symbol::SymbolTable;
use crate::Result;

/// Typed view over a section's contents, assigned after name resolution.
/// The generic record stays in place; upcasting is a payload assignment,
/// not a copy.
#[derive(Clone, Debug, Default)]
pub enum SectionPayload {
    #[default]
    Raw,
    Strings,
    Symbols(SymbolTable),
    Dynamic(DynamicTable),
    Relocations(RelocationTable),
    Notes(Vec<NoteEntry>),
}

/// One section-header entry plus its captured bytes.
#[derive(Clone, Debug)]
pub struct Section {
    pub index: usize,
    /// Resolved from the header-designated string table; empty until the
    /// name-resolution pass has run.
    pub name: String,
    pub name_offset: u32,
    pub sh_type: u32,
    pub flags: u64,
    pub addr: u64,
    pub offset: u64,
    pub size: u64,
    pub link: u32,
    pub info: u32,
    pub addralign: u64,
    pub entsize: u64,
    data: Vec<u8>,
    pub payload: SectionPayload,
}

impl Section {
    /// Decode one section-header record and capture the section bytes.
    /// `NULL` and `NOBITS` sections carry no file data; for the rest a
    /// failed capture degrades to an empty buffer and the section reports
    /// size 0.
    pub(crate) fn load(
        source: &mut ByteSource,
        record_offset: u64,
        class: ElfClass,
        conv: EndianConverter,
        index: usize,
    ) -> Result<Self> {
        let is64 = class.is_64bit();
        let record_size = if is64 { SHDR_SIZE_64 } else { SHDR_SIZE_32 };
        let buf = source.read_exact_at(record_offset, record_size)?;
        let mut r = RecordReader::new(&buf, conv);

        let name_offset = r.u32();
        let sh_type = r.u32();
        let flags = r.addr(is64);
        let addr = r.addr(is64);
        let offset = r.addr(is64);
        let mut size = r.addr(is64);
        let link = r.u32();
        let info = r.u32();
        let addralign = r.addr(is64);
        let entsize = r.addr(is64);

        let data = if sh_type != SHT_NULL && sh_type != SHT_NOBITS {
            let data = source.read_data(offset, size);
            // A failed capture leaves the section flagged empty.
            if size != 0 && data.is_empty() {
                size = 0;
            }
            data
        } else {
            Vec::new()
        };

        Ok(Self {
            index,
            name: String::new(),
            name_offset,
            sh_type,
            flags,
            addr,
            offset,
            size,
            link,
            info,
            addralign,
            entsize,
            data,
            payload: SectionPayload::Raw,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn type_name(&self) -> &'static str {
        names::section_type_name(self.sh_type)
    }

    pub fn flags_string(&self) -> String {
        names::section_flags_string(self.flags)
    }

    pub fn is_alloc(&self) -> bool {
        self.flags & SHF_ALLOC != 0
    }

    /// NUL-terminated string at `offset` within this section's data.
    /// Out-of-range offsets yield the empty string.
    pub fn string_at(&self, offset: u64) -> String {
        string_from(&self.data, offset)
    }

    pub fn symbols(&self) -> Option<&SymbolTable> {
        match &self.payload {
            SectionPayload::Symbols(table) => Some(table),
            _ => None,
        }
    }

    pub fn dynamic_entries(&self) -> Option<&[DynamicEntry]> {
        match &self.payload {
            SectionPayload::Dynamic(table) => Some(&table.entries),
            _ => None,
        }
    }

    pub fn relocations(&self) -> Option<&RelocationTable> {
        match &self.payload {
            SectionPayload::Relocations(table) => Some(table),
            _ => None,
        }
    }

    pub fn notes(&self) -> Option<&[NoteEntry]> {
        match &self.payload {
            SectionPayload::Notes(entries) => Some(entries),
            _ => None,
        }
    }
}

/// Bytes from `offset` up to the next NUL, decoded as a string. Shared by
/// section-name resolution and every string-table lookup.
pub(crate) fn string_from(data: &[u8], offset: u64) -> String {
    let Ok(start) = usize::try_from(offset) else {
        return String::new();
    };
    let Some(tail) = data.get(start..) else {
        return String::new();
    };
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_from_reads_to_nul() {
        let data = b"\0.text\0.data\0";
        assert_eq!(string_from(data, 1), ".text");
        assert_eq!(string_from(data, 7), ".data");
        assert_eq!(string_from(data, 0), "");
    }

    #[test]
    fn string_from_is_empty_past_end() {
        let data = b"abc\0";
        assert_eq!(string_from(data, 100), "");
        assert_eq!(string_from(data, u64::MAX), "");
    }

    #[test]
    fn string_from_without_terminator_takes_the_tail() {
        assert_eq!(string_from(b"abc", 0), "abc");
    }
}
