//! Failure paths of `ElfImage::open`.

mod common;

use std::io::Write;

use common::{ident, Endian, FileImage};
use relf_image::{ElfError, ElfImage};
use tempfile::NamedTempFile;

fn temp_with(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

#[test]
fn missing_file_is_reported() {
    let err = ElfImage::open("nonexistingfilename").unwrap_err();
    assert!(matches!(err, ElfError::FileNotFound(_)));
}

#[test]
fn non_elf_input_fails_with_bad_magic() {
    let fixture = temp_with(b"this is not an ELF file at all..");
    let err = ElfImage::open(fixture.path()).unwrap_err();
    assert!(matches!(err, ElfError::BadMagic));
}

#[test]
fn unknown_class_byte_is_rejected() {
    let mut bytes = ident(Endian::Little, 5, 1);
    bytes.resize(64, 0);
    let fixture = temp_with(&bytes);
    let err = ElfImage::open(fixture.path()).unwrap_err();
    assert!(matches!(err, ElfError::BadClass(5)));
}

#[test]
fn unknown_encoding_byte_is_rejected() {
    let mut bytes = ident(Endian::Little, 1, 7);
    bytes.resize(64, 0);
    let fixture = temp_with(&bytes);
    let err = ElfImage::open(fixture.path()).unwrap_err();
    assert!(matches!(err, ElfError::BadEncoding(7)));
}

#[test]
fn empty_file_fails_with_bad_magic() {
    let fixture = temp_with(&[]);
    let err = ElfImage::open(fixture.path()).unwrap_err();
    assert!(matches!(err, ElfError::BadMagic));
}

#[test]
fn short_identification_fails_with_bad_magic() {
    let fixture = temp_with(&[0x7F, b'E', b'L', b'F', 2, 1]);
    let err = ElfImage::open(fixture.path()).unwrap_err();
    assert!(matches!(err, ElfError::BadMagic));
}

#[test]
fn header_cut_short_is_truncated() {
    // Valid 64-bit identification but nothing behind it.
    let fixture = temp_with(&ident(Endian::Little, 2, 1));
    let err = ElfImage::open(fixture.path()).unwrap_err();
    assert!(matches!(err, ElfError::Truncated { .. }));
}

#[test]
fn section_data_outside_file_degrades_to_empty() {
    // A section whose data range points far past the end of the file must
    // not fail the parse; its buffer stays empty and its size is flagged 0.
    let mut file = FileImage::new();
    let mut ehdr = ident(Endian::Little, 2, 1);
    ehdr.extend_from_slice(
        &common::Record::new(Endian::Little)
            .u16(1) // e_type
            .u16(62) // e_machine
            .u32(1)
            .u64(0) // e_entry
            .u64(0) // e_phoff
            .u64(64) // e_shoff
            .u32(0)
            .u16(64)
            .u16(56)
            .u16(0) // e_phnum
            .u16(64)
            .u16(1) // e_shnum
            .u16(0) // e_shstrndx: SHN_UNDEF
            .bytes,
    );
    file.put(0, &ehdr);
    let shdr = common::Record::new(Endian::Little)
        .u32(0)
        .u32(1) // PROGBITS
        .u64(0)
        .u64(0)
        .u64(0xFFFF_0000) // sh_offset far outside the file
        .u64(0x100)
        .u32(0)
        .u32(0)
        .u64(1)
        .u64(0)
        .bytes;
    file.put(64, &shdr);

    let fixture = file.write_temp();
    let image = ElfImage::open(fixture.path()).unwrap();
    let section = image.section(0).unwrap();
    assert_eq!(section.size, 0);
    assert!(section.data().is_empty());
    assert_eq!(section.name, "");
}

#[test]
fn version_string_is_set() {
    assert!(!relf_image::VERSION.is_empty());
}
