//! Relocation sections (`REL` and `RELA`).

use crate::constants::*;
use crate::endian::EndianConverter;
use crate::section::Section;
use crate::source::RecordReader;
use crate::symbol::{Symbol, SymbolTable};

/// One relocation directive. The symbol index and type come from the
/// class-dependent split of `r_info`; `symbol` is the resolved entry from
/// the linked symbol table, `None` when the index does not resolve.
#[derive(Clone, Debug)]
pub struct RelocationEntry {
    pub offset: u64,
    pub info: u64,
    pub symbol_index: u32,
    pub reloc_type: u32,
    /// Zero for `REL` entries.
    pub addend: i64,
    pub symbol: Option<Symbol>,
}

/// Parsed relocation section, with the index of the symbol section its
/// entries resolve through.
#[derive(Clone, Debug)]
pub struct RelocationTable {
    /// Index of the linked symbol section (`sh_link`).
    pub symtab: usize,
    /// `true` for `RELA`, whose entries carry an explicit addend.
    pub has_addend: bool,
    pub entries: Vec<RelocationEntry>,
}

impl RelocationTable {
    /// Walk the section data as an array of class-sized `Rel`/`Rela`
    /// records. For 32-bit files `r_info` splits as `sym = info >> 8`,
    /// `type = info & 0xFF`; for 64-bit as `sym = info >> 32`,
    /// `type = info & 0xFFFF_FFFF`.
    pub(crate) fn parse(
        section: &Section,
        symtab: Option<&SymbolTable>,
        is64: bool,
        conv: EndianConverter,
    ) -> Self {
        let has_addend = section.sh_type == SHT_RELA;
        let entsize = section.entsize;
        let count = if entsize != 0 { section.size / entsize } else { 0 };
        let data = section.data();

        let mut entries = Vec::new();
        for i in 0..count {
            let Ok(start) = usize::try_from(i * entsize) else {
                break;
            };
            let Ok(len) = usize::try_from(entsize) else {
                break;
            };
            let Some(record) = data.get(start..start + len) else {
                break;
            };
            let mut r = RecordReader::new(record, conv);

            let (offset, info) = if is64 {
                (r.u64(), r.u64())
            } else {
                (u64::from(r.u32()), u64::from(r.u32()))
            };
            let (symbol_index, reloc_type) = if is64 {
                ((info >> 32) as u32, (info & 0xFFFF_FFFF) as u32)
            } else {
                ((info >> 8) as u32, (info & 0xFF) as u32)
            };
            let addend = if !has_addend {
                0
            } else if is64 {
                r.i64()
            } else {
                i64::from(r.i32())
            };
            let symbol = symtab
                .and_then(|table| table.symbol(symbol_index as usize))
                .cloned();

            entries.push(RelocationEntry {
                offset,
                info,
                symbol_index,
                reloc_type,
                addend,
                symbol,
            });
        }

        RelocationTable {
            symtab: section.link as usize,
            has_addend,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, `None` past the end.
    pub fn entry(&self, index: usize) -> Option<&RelocationEntry> {
        self.entries.get(index)
    }
}
