//! Program-header records (segments).

use crate::constants::*;
use crate::endian::EndianConverter;
use crate::ident::ElfClass;
use crate::names;
use crate::source::{ByteSource, RecordReader};
use crate::Result;

/// One program-header entry plus its captured file bytes and the indices of
/// the sections it covers.
#[derive(Clone, Debug)]
pub struct Segment {
    pub index: usize,
    pub p_type: u32,
    pub flags: u32,
    pub offset: u64,
    pub vaddr: u64,
    pub paddr: u64,
    pub filesz: u64,
    pub memsz: u64,
    pub align: u64,
    data: Vec<u8>,
    /// De-duplicated, order-preserving list of contained section indices,
    /// filled by the segment/section mapping pass.
    pub section_indices: Vec<usize>,
}

impl Segment {
    /// Decode one program-header record. The two classes order their fields
    /// differently (`p_flags` moves); both layouts are handled here. A failed
    /// data capture degrades to an empty buffer and the segment reports a
    /// file size of 0.
    pub(crate) fn load(
        source: &mut ByteSource,
        record_offset: u64,
        class: ElfClass,
        conv: EndianConverter,
        index: usize,
    ) -> Result<Self> {
        let is64 = class.is_64bit();
        let record_size = if is64 { PHDR_SIZE_64 } else { PHDR_SIZE_32 };
        let buf = source.read_exact_at(record_offset, record_size)?;
        let mut r = RecordReader::new(&buf, conv);

        let (p_type, flags, offset, vaddr, paddr, mut filesz, memsz, align);
        if is64 {
            p_type = r.u32();
            flags = r.u32();
            offset = r.u64();
            vaddr = r.u64();
            paddr = r.u64();
            filesz = r.u64();
            memsz = r.u64();
            align = r.u64();
        } else {
            p_type = r.u32();
            offset = u64::from(r.u32());
            vaddr = u64::from(r.u32());
            paddr = u64::from(r.u32());
            filesz = u64::from(r.u32());
            memsz = u64::from(r.u32());
            flags = r.u32();
            align = u64::from(r.u32());
        }

        let data = if p_type != PT_NULL && filesz != 0 {
            let data = source.read_data(offset, filesz);
            // A failed capture leaves the segment flagged empty.
            if data.is_empty() {
                filesz = 0;
            }
            data
        } else {
            Vec::new()
        };

        Ok(Self {
            index,
            p_type,
            flags,
            offset,
            vaddr,
            paddr,
            filesz,
            memsz,
            align,
            data,
            section_indices: Vec::new(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn type_name(&self) -> &'static str {
        names::segment_type_name(self.p_type)
    }

    /// `"R"`, `"W"`, `"X"` concatenated for the set permission flags.
    pub fn flags_string(&self) -> String {
        let mut result = String::new();
        if self.flags & PF_R != 0 {
            result.push('R');
        }
        if self.flags & PF_W != 0 {
            result.push('W');
        }
        if self.flags & PF_X != 0 {
            result.push('X');
        }
        result
    }

    pub fn is_readonly(&self) -> bool {
        self.flags & PF_W == 0
    }

    pub fn is_executable(&self) -> bool {
        self.flags & PF_X != 0
    }

    /// Record a contained section, skipping indices already present.
    /// The list stays small enough that a linear scan beats a set.
    pub(crate) fn add_section_index(&mut self, index: usize) {
        if !self.section_indices.contains(&index) {
            self.section_indices.push(index);
        }
    }
}
