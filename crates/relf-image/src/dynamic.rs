//! Dynamic-section entries.

use crate::constants::*;
use crate::endian::EndianConverter;
use crate::names;
use crate::section::Section;
use crate::source::RecordReader;

/// How a tag's `d_un` union is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DynValueKind {
    /// Plain numeric value (`d_val`).
    Value,
    /// Address (`d_ptr`). Tags outside both known sets fall through here.
    Pointer,
    /// The union carries no payload; the entry's value is zero.
    Ignored,
}

/// Semantic kind of `d_un` for a given tag.
pub fn dyn_value_kind(tag: u64) -> DynValueKind {
    match tag {
        DT_NULL | DT_SYMBOLIC | DT_TEXTREL | DT_BIND_NOW => DynValueKind::Ignored,
        DT_NEEDED | DT_PLTRELSZ | DT_RELASZ | DT_RELAENT | DT_STRSZ | DT_SYMENT | DT_SONAME
        | DT_RPATH | DT_RELSZ | DT_RELENT | DT_PLTREL | DT_INIT_ARRAYSZ | DT_FINI_ARRAYSZ
        | DT_RUNPATH | DT_FLAGS | DT_PREINIT_ARRAYSZ => DynValueKind::Value,
        _ => DynValueKind::Pointer,
    }
}

/// One `(d_tag, d_un)` pair, value already interpreted per the tag table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicEntry {
    pub tag: u64,
    pub value: u64,
}

impl DynamicEntry {
    /// Textual tag name, empty for unknown tags.
    pub fn tag_name(&self) -> &'static str {
        names::dynamic_tag_name(self.tag)
    }
}

/// Parsed dynamic section.
#[derive(Clone, Debug)]
pub struct DynamicTable {
    pub entries: Vec<DynamicEntry>,
}

impl DynamicTable {
    /// Walk the section data as an array of class-sized `Dyn` records.
    /// Entry count is `size / entry_size`, zero when `entry_size` is zero.
    pub(crate) fn parse(section: &Section, is64: bool, conv: EndianConverter) -> Self {
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
            let (tag, raw) = if is64 {
                (r.i64() as u64, r.u64())
            } else {
                (r.i32() as i64 as u64, u64::from(r.u32()))
            };
            let value = match dyn_value_kind(tag) {
                DynValueKind::Ignored => 0,
                DynValueKind::Value | DynValueKind::Pointer => raw,
            };
            entries.push(DynamicEntry { tag, value });
        }
        DynamicTable { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, `None` past the end.
    pub fn entry(&self, index: usize) -> Option<&DynamicEntry> {
        self.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_tags_keep_their_number() {
        assert_eq!(dyn_value_kind(DT_NEEDED), DynValueKind::Value);
        assert_eq!(dyn_value_kind(DT_STRSZ), DynValueKind::Value);
        assert_eq!(dyn_value_kind(DT_FLAGS), DynValueKind::Value);
    }

    #[test]
    fn flag_tags_carry_no_value() {
        assert_eq!(dyn_value_kind(DT_NULL), DynValueKind::Ignored);
        assert_eq!(dyn_value_kind(DT_SYMBOLIC), DynValueKind::Ignored);
        assert_eq!(dyn_value_kind(DT_TEXTREL), DynValueKind::Ignored);
        assert_eq!(dyn_value_kind(DT_BIND_NOW), DynValueKind::Ignored);
    }

    #[test]
    fn address_tags_and_unknown_tags_are_pointers() {
        assert_eq!(dyn_value_kind(DT_PLTGOT), DynValueKind::Pointer);
        assert_eq!(dyn_value_kind(DT_INIT), DynValueKind::Pointer);
        assert_eq!(dyn_value_kind(DT_JMPREL), DynValueKind::Pointer);
        // Tags absent from both sets (DT_GNU_HASH, versioning tags) fall
        // through to pointer.
        assert_eq!(dyn_value_kind(0x6FFF_FEF5), DynValueKind::Pointer);
        assert_eq!(dyn_value_kind(0x6FFF_FFFE), DynValueKind::Pointer);
    }

    #[test]
    fn tag_names_resolve() {
        let entry = DynamicEntry { tag: DT_NEEDED, value: 1 };
        assert_eq!(entry.tag_name(), "NEEDED");
        let unknown = DynamicEntry { tag: 0x7000_0000, value: 0 };
        assert_eq!(unknown.tag_name(), "");
    }
}
