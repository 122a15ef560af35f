//! Read-only ELF object-file parser.
//!
//! [`ElfImage::open`] ingests a file in the System V Executable and Linkable
//! Format and exposes a navigable, fully-typed object graph: file header,
//! segments, sections, and the structured section payloads (strings, symbols,
//! dynamic entries, relocations, notes). Both ELF classes (32- and 64-bit)
//! and both data encodings are handled on hosts of either endianness.
//!
//! # Example
//!
//! ```ignore
//! use relf_image::ElfImage;
//!
//! let image = ElfImage::open("program.elf")?;
//! println!("entry point: {:#x}", image.header().entry);
//! for section in image.sections() {
//!     println!("{} ({})", section.name, section.type_name());
//! }
//! ```

mod constants;
mod dynamic;
mod endian;
mod header;
mod ident;
mod image;
mod names;
mod note;
mod reloc;
mod section;
mod segment;
mod source;
mod symbol;

pub use constants::*;
pub use dynamic::{DynValueKind, DynamicEntry, DynamicTable, dyn_value_kind};
pub use endian::EndianConverter;
pub use header::FileHeader;
pub use ident::{ElfClass, ElfData, Identity};
pub use image::ElfImage;
pub use note::{NoteEntry, align_up};
pub use reloc::{RelocationEntry, RelocationTable};
pub use section::{Section, SectionPayload};
pub use segment::Segment;
pub use symbol::{Symbol, SymbolTable};

use std::path::PathBuf;

use thiserror::Error;

/// Library version, fixed at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// ELF parsing errors.
#[derive(Error, Debug)]
pub enum ElfError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ELF magic number")]
    BadMagic,
    #[error("unsupported ELF class: {0}")]
    BadClass(u8),
    #[error("unsupported ELF data encoding: {0}")]
    BadEncoding(u8),
    #[error("unexpected end of file: {wanted} bytes at offset {offset:#x}")]
    Truncated { offset: u64, wanted: usize },
}

pub type Result<T> = std::result::Result<T, ElfError>;
