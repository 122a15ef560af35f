//! Parsed ELF image and the `open` orchestration.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::*;
use crate::dynamic::DynamicTable;
use crate::endian::EndianConverter;
use crate::header::FileHeader;
use crate::ident::{ElfClass, ElfData, Identity};
use crate::note;
use crate::reloc::RelocationTable;
use crate::section::{string_from, Section, SectionPayload};
use crate::segment::Segment;
use crate::source::ByteSource;
use crate::symbol::SymbolTable;
use crate::Result;

/// Immutable object graph over one ELF file. Built once by [`ElfImage::open`];
/// the backing file handle is closed before `open` returns, and nothing is
/// read or allocated afterwards, so a parsed image can be shared freely
/// across threads by reference.
#[derive(Debug)]
pub struct ElfImage {
    filename: PathBuf,
    header: FileHeader,
    segments: Vec<Segment>,
    sections: Vec<Section>,
    string_section: Option<usize>,
    dynamic_section: Option<usize>,
    symbol_sections: Vec<usize>,
    relocation_sections: Vec<usize>,
    note_sections: Vec<usize>,
}

impl ElfImage {
    /// Open and fully parse an ELF file.
    ///
    /// The pipeline order is fixed: identity probe, file header, sections,
    /// name resolution, typed payload upcasts, segments, segment/section
    /// mapping. Name resolution must precede the upcasts (the dynamic
    /// section's own name is assigned there), and the mapping runs only once
    /// both lists exist.
    ///
    /// # Errors
    ///
    /// Fails on a missing file, a malformed identification prefix, or a
    /// truncated header record. Data-buffer capture failures are absorbed:
    /// the affected section or segment keeps an empty buffer and parsing
    /// continues.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut source = ByteSource::open(path)?;

        // Input too short to carry the identification prefix is not an ELF
        // file at all.
        let ident_bytes = match source.read_exact_at(0, EI_NIDENT) {
            Ok(bytes) => bytes,
            Err(crate::ElfError::Truncated { .. }) => return Err(crate::ElfError::BadMagic),
            Err(e) => return Err(e),
        };
        let mut prefix = [0u8; EI_NIDENT];
        prefix.copy_from_slice(&ident_bytes);
        let ident = Identity::parse(&prefix)?;
        let conv = EndianConverter::for_file(ident.encoding.is_little());

        let header = FileHeader::load(&mut source, &ident, conv)?;
        debug!(
            class = ident.class.name(),
            machine = header.machine_name(),
            sections = header.shnum,
            segments = header.phnum,
            "parsed file header"
        );

        let mut image = Self {
            filename: path.to_path_buf(),
            header,
            segments: Vec::new(),
            sections: Vec::new(),
            string_section: None,
            dynamic_section: None,
            symbol_sections: Vec::new(),
            relocation_sections: Vec::new(),
            note_sections: Vec::new(),
        };

        image.load_sections(&mut source, conv)?;
        image.resolve_names();
        image.upcast_payloads(conv);
        image.load_segments(&mut source, conv)?;
        image.map_sections_to_segments();
        Ok(image)
    }

    fn load_sections(&mut self, source: &mut ByteSource, conv: EndianConverter) -> Result<()> {
        let header = &self.header;
        for i in 0..header.shnum {
            let offset = header
                .shoff
                .saturating_add(u64::from(i) * u64::from(header.shentsize));
            let section = Section::load(source, offset, header.class, conv, i as usize)?;
            self.sections.push(section);
        }
        Ok(())
    }

    /// Assign every section its name from the header-designated string
    /// table. Runs before the payload upcasts.
    fn resolve_names(&mut self) {
        let strndx = self.header.shstrndx;
        if strndx == SHN_UNDEF {
            return;
        }
        let strndx = strndx as usize;
        if strndx >= self.sections.len() {
            return;
        }
        self.string_section = Some(strndx);

        let names: Vec<String> = self
            .sections
            .iter()
            .map(|s| {
                string_from(
                    self.sections[strndx].data(),
                    u64::from(s.name_offset),
                )
            })
            .collect();
        for (section, name) in self.sections.iter_mut().zip(names) {
            section.name = name;
        }
    }

    /// Upgrade generic sections into typed payloads by section type.
    /// Relocation sections resolve entries through the symbol table at their
    /// `sh_link`, so symbol tables are assigned in a first pass and
    /// relocations in a second.
    fn upcast_payloads(&mut self, conv: EndianConverter) {
        let is64 = self.header.is_64bit();

        let mut payloads: Vec<(usize, SectionPayload)> = Vec::new();
        for section in &self.sections {
            match section.sh_type {
                SHT_STRTAB => payloads.push((section.index, SectionPayload::Strings)),
                SHT_DYNAMIC => {
                    let table = DynamicTable::parse(section, is64, conv);
                    payloads.push((section.index, SectionPayload::Dynamic(table)));
                }
                SHT_SYMTAB | SHT_DYNSYM => {
                    let strtab_data = self
                        .sections
                        .get(section.link as usize)
                        .map(Section::data)
                        .unwrap_or_default();
                    let table = SymbolTable::parse(section, strtab_data, is64, conv);
                    payloads.push((section.index, SectionPayload::Symbols(table)));
                }
                SHT_NOTE => {
                    let entries = note::parse_notes(section.data(), conv);
                    payloads.push((section.index, SectionPayload::Notes(entries)));
                }
                _ => {}
            }
        }
        for (index, payload) in payloads {
            match &payload {
                SectionPayload::Dynamic(_) => self.dynamic_section = Some(index),
                SectionPayload::Symbols(_) => self.symbol_sections.push(index),
                SectionPayload::Notes(_) => self.note_sections.push(index),
                _ => {}
            }
            self.sections[index].payload = payload;
        }

        let mut reloc_payloads: Vec<(usize, SectionPayload)> = Vec::new();
        for section in &self.sections {
            if section.sh_type == SHT_REL || section.sh_type == SHT_RELA {
                let symtab = self
                    .sections
                    .get(section.link as usize)
                    .and_then(Section::symbols);
                let table = RelocationTable::parse(section, symtab, is64, conv);
                reloc_payloads.push((section.index, SectionPayload::Relocations(table)));
            }
        }
        for (index, payload) in reloc_payloads {
            self.relocation_sections.push(index);
            self.sections[index].payload = payload;
        }

        debug!(
            strings = self.string_section.is_some(),
            dynamic = self.dynamic_section.is_some(),
            symbol_tables = self.symbol_sections.len(),
            relocation_tables = self.relocation_sections.len(),
            note_sections = self.note_sections.len(),
            "typed section payloads assigned"
        );
    }

    fn load_segments(&mut self, source: &mut ByteSource, conv: EndianConverter) -> Result<()> {
        let header = &self.header;
        for i in 0..header.phnum {
            let offset = header
                .phoff
                .saturating_add(u64::from(i) * u64::from(header.phentsize));
            let segment = Segment::load(source, offset, header.class, conv, i as usize)?;
            self.segments.push(segment);
        }
        Ok(())
    }

    /// Associate each segment with the sections it wholly contains:
    /// allocatable sections by virtual-address range, the rest by
    /// file-offset range. Idempotent; the per-segment lists deduplicate.
    fn map_sections_to_segments(&mut self) {
        for segment in &mut self.segments {
            if segment.p_type == PT_NULL {
                continue;
            }
            let file_range = (segment.offset, segment.offset.wrapping_add(segment.filesz));
            let vaddr_range = (segment.vaddr, segment.vaddr.wrapping_add(segment.memsz));

            for section in &self.sections {
                let (base, end) = if section.is_alloc() {
                    vaddr_range
                } else {
                    file_range
                };
                let sec_base = if section.is_alloc() {
                    section.addr
                } else {
                    section.offset
                };
                let sec_end = sec_base.wrapping_add(section.size);
                if base <= sec_base && sec_end <= end {
                    segment.add_section_index(section.index);
                }
            }
        }
    }

    /// Name of the underlying file.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn class(&self) -> ElfClass {
        self.header.class
    }

    pub fn encoding(&self) -> ElfData {
        self.header.encoding
    }

    pub fn is_64bit(&self) -> bool {
        self.header.is_64bit()
    }

    pub fn is_little_endian(&self) -> bool {
        self.header.is_little_endian()
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// All sections, in header-table order; a section's index equals its
    /// position here.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All segments, in header-table order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Section at `index`, `None` past the end.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Segment at `index`, `None` past the end.
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// The header-designated section-name string table.
    pub fn string_section(&self) -> Option<&Section> {
        self.string_section.and_then(|i| self.sections.get(i))
    }

    /// The dynamic section, when the file has one.
    pub fn dynamic_section(&self) -> Option<&Section> {
        self.dynamic_section.and_then(|i| self.sections.get(i))
    }

    /// Symbol sections (`SYMTAB` and `DYNSYM`), in file order.
    pub fn symbol_sections(&self) -> impl Iterator<Item = &Section> {
        self.symbol_sections.iter().filter_map(|&i| self.sections.get(i))
    }

    /// Relocation sections (`REL` and `RELA`), in file order.
    pub fn relocation_sections(&self) -> impl Iterator<Item = &Section> {
        self.relocation_sections
            .iter()
            .filter_map(|&i| self.sections.get(i))
    }

    /// Note sections, in file order.
    pub fn note_sections(&self) -> impl Iterator<Item = &Section> {
        self.note_sections.iter().filter_map(|&i| self.sections.get(i))
    }

    /// Libraries named by `DT_NEEDED` entries, resolved through the string
    /// section the dynamic section links to. Empty when there is no dynamic
    /// section or the link is out of range.
    pub fn needed_libraries(&self) -> Vec<String> {
        let Some(dynamic) = self.dynamic_section() else {
            return Vec::new();
        };
        let Some(strtab) = self.sections.get(dynamic.link as usize) else {
            return Vec::new();
        };
        let Some(entries) = dynamic.dynamic_entries() else {
            return Vec::new();
        };
        entries
            .iter()
            .filter(|entry| entry.tag == DT_NEEDED)
            .map(|entry| strtab.string_at(entry.value))
            .collect()
    }
}

impl fmt::Display for ElfImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElfImage ({})", self.filename.display())
    }
}

/// Two images are the same when they point at the same file.
impl PartialEq for ElfImage {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename
    }
}

impl Eq for ElfImage {}
