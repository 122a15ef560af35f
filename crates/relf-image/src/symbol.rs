//! Symbol-table sections.

use crate::constants::*;
use crate::endian::EndianConverter;
use crate::section::{string_from, Section};
use crate::source::RecordReader;

/// One symbol record, name already resolved through the linked string
/// section.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub value: u64,
    pub size: u64,
    /// Upper nibble of `st_info`.
    pub binding: u8,
    /// Lower nibble of `st_info`.
    pub sym_type: u8,
    pub shndx: u16,
    pub other: u8,
}

impl Symbol {
    pub fn binding_name(&self) -> &'static str {
        match self.binding {
            STB_LOCAL => "LOCAL",
            STB_GLOBAL => "GLOBAL",
            STB_WEAK => "WEAK",
            _ => "UNKNOWN",
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.sym_type {
            STT_NOTYPE => "NOTYPE",
            STT_OBJECT => "OBJECT",
            STT_FUNC => "FUNC",
            STT_SECTION => "SECTION",
            STT_FILE => "FILE",
            STT_COMMON => "COMMON",
            STT_TLS => "TLS",
            _ => "UNKNOWN",
        }
    }
}

/// Parsed symbol section (`SYMTAB` or `DYNSYM`), with the index of the
/// string section its names were resolved through.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    /// Index of the linked string section (`sh_link`).
    pub strtab: usize,
    pub symbols: Vec<Symbol>,
}

impl SymbolTable {
    /// Walk the section data as an array of class-sized `Sym` records.
    /// The two classes order their fields differently; both layouts are
    /// handled here. `strtab_data` is the linked string section's bytes,
    /// empty when the link is out of range.
    pub(crate) fn parse(
        section: &Section,
        strtab_data: &[u8],
        is64: bool,
        conv: EndianConverter,
    ) -> Self {
        let entsize = section.entsize;
        let count = if entsize != 0 { section.size / entsize } else { 0 };
        let data = section.data();

        let mut symbols = Vec::new();
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

            let (name_offset, value, size, info, other, shndx);
            if is64 {
                name_offset = r.u32();
                info = r.u8();
                other = r.u8();
                shndx = r.u16();
                value = r.u64();
                size = r.u64();
            } else {
                name_offset = r.u32();
                value = u64::from(r.u32());
                size = u64::from(r.u32());
                info = r.u8();
                other = r.u8();
                shndx = r.u16();
            }

            symbols.push(Symbol {
                name: string_from(strtab_data, u64::from(name_offset)),
                value,
                size,
                binding: info >> 4,
                sym_type: info & 0x0F,
                shndx,
                other,
            });
        }
        SymbolTable {
            strtab: section.link as usize,
            symbols,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at `index`, `None` past the end.
    pub fn symbol(&self, index: usize) -> Option<&Symbol> {
        self.symbols.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(info: u8) -> Symbol {
        Symbol {
            name: String::new(),
            value: 0,
            size: 0,
            binding: info >> 4,
            sym_type: info & 0x0F,
            shndx: 0,
            other: 0,
        }
    }

    #[test]
    fn info_nibble_split() {
        let sym = symbol(0x12);
        assert_eq!(sym.binding, STB_GLOBAL);
        assert_eq!(sym.sym_type, STT_FUNC);
        assert_eq!(sym.binding_name(), "GLOBAL");
        assert_eq!(sym.type_name(), "FUNC");
    }

    #[test]
    fn unknown_binding_and_type() {
        let sym = symbol(0xFF);
        assert_eq!(sym.binding_name(), "UNKNOWN");
        assert_eq!(sym.type_name(), "UNKNOWN");
    }

    #[test]
    fn weak_object() {
        let sym = symbol((STB_WEAK << 4) | STT_OBJECT);
        assert_eq!(sym.binding_name(), "WEAK");
        assert_eq!(sym.type_name(), "OBJECT");
    }
}
