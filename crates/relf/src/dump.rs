//! readelf-style table output over a parsed image.

use std::io::{self, Write};

use relf_image::ElfImage;

/// Print the file header.
pub fn print_file_header(image: &ElfImage, out: &mut impl Write) -> io::Result<()> {
    let header = image.header();
    writeln!(out, "ELF Header:")?;
    writeln!(out, "{:<39} {}", "Class:", header.class.name())?;
    writeln!(
        out,
        "{:<39} {}{}",
        "Version:",
        header.version,
        if header.version == 1 { " (current)" } else { "" }
    )?;
    writeln!(
        out,
        "{:<39} 2's complement, {}",
        "Encoding:",
        header.encoding.name()
    )?;
    writeln!(out, "{:<39} {}", "OS/ABI:", header.abi_name())?;
    writeln!(out, "{:<39} {}", "Type:", header.type_name())?;
    writeln!(out, "{:<39} {}", "Machine:", header.machine_name())?;
    writeln!(out, "{:<39} {:#X}", "Entrypoint:", header.entry)?;
    writeln!(
        out,
        "{:<39} {} (Bytes in File)",
        "Start of Program Headers:", header.phoff
    )?;
    writeln!(
        out,
        "{:<39} {} (Bytes in File)",
        "Start of Section Headers:", header.shoff
    )?;
    writeln!(out, "{:<39} {:#X}", "Flags:", header.flags)?;
    writeln!(out, "{:<39} {} (Bytes)", "Size of File Header:", header.ehsize)?;
    writeln!(
        out,
        "{:<39} {} (Bytes)",
        "Size of Program Header:", header.phentsize
    )?;
    writeln!(out, "{:<39} {}", "Number of Program Headers:", header.phnum)?;
    writeln!(
        out,
        "{:<39} {} (Bytes)",
        "Size of Section Header:", header.shentsize
    )?;
    writeln!(out, "{:<39} {}", "Number of Section Headers:", header.shnum)?;
    writeln!(
        out,
        "{:<39} {}",
        "Section Header String Table Index:", header.shstrndx
    )
}

/// Print the section-header table with the flag key readelf appends.
pub fn print_sections(image: &ElfImage, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Section Headers:")?;
    writeln!(
        out,
        " [{:<2}] {:<17} {:<17} {:<17} {:<10}",
        "No", "Name", "Type", "Address", "Offset"
    )?;
    writeln!(
        out,
        "      {:<17} {:<17} {:<17} {:<10}",
        "Size", "Entry Size", "Flags Link Info", "Align"
    )?;

    for section in image.sections() {
        writeln!(
            out,
            " [{:>2}] {:<17} {:<17} {:017X} {:08X}",
            section.index, section.name, section.type_name(), section.addr, section.offset
        )?;
        writeln!(
            out,
            "      {:017X} {:017X} {:>5} {:>5} {:>5} {:>6}",
            section.size,
            section.entsize,
            section.flags_string(),
            section.link,
            section.info,
            section.addralign
        )?;
    }
    writeln!(out, "Key to Flags:")?;
    writeln!(
        out,
        " W (write), A (alloc), X (execute), M (merge), S (strings), I (info)"
    )?;
    writeln!(
        out,
        " L (link order), O (extra OS processing required), G (group), T (TLS)"
    )
}

/// Print the program-header table and the section-to-segment mapping.
pub fn print_segments(image: &ElfImage, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Program Headers:")?;
    writeln!(
        out,
        " {:<20} {:<20} {:<20} {:<20}",
        "Type", "Offset", "Virtual Address", "Physical Address"
    )?;
    writeln!(
        out,
        " {:<20} {:<20} {:<20} {:<20}",
        "", "File Size", "Memory Size", " Flags  Align"
    )?;

    for segment in image.segments() {
        writeln!(
            out,
            " {:<20} 0x{:018X} 0x{:018X} 0x{:018X}",
            segment.type_name(),
            segment.offset,
            segment.vaddr,
            segment.paddr
        )?;
        writeln!(
            out,
            " {:<20} 0x{:018X} 0x{:018X} {:>6} {:>8X}",
            "",
            segment.filesz,
            segment.memsz,
            segment.flags_string(),
            segment.align
        )?;
    }

    writeln!(out, "Mapping of Sections on Segments:")?;
    for segment in image.segments() {
        let names: Vec<&str> = segment
            .section_indices
            .iter()
            .filter_map(|&i| image.section(i))
            .map(|s| s.name.as_str())
            .collect();
        writeln!(out, " {:02}  {}", segment.index, names.join(" "))?;
    }
    Ok(())
}

/// Print the dynamic section.
pub fn print_dynamic(image: &ElfImage, out: &mut impl Write) -> io::Result<()> {
    let Some(section) = image.dynamic_section() else {
        writeln!(out, "There is no dynamic section in this file.")?;
        return Ok(());
    };
    let entries = section.dynamic_entries().unwrap_or_default();
    writeln!(out, "Dynamic section contains {} entries:", entries.len())?;
    writeln!(out, "  {:<20} {:<20} {:<30}", "Tag", "Type", "Value")?;
    for entry in entries {
        writeln!(
            out,
            " 0x{:018X} {:<20} {}",
            entry.tag,
            entry.tag_name(),
            entry.value
        )?;
    }
    Ok(())
}

/// Print every symbol table.
pub fn print_symbols(image: &ElfImage, out: &mut impl Write) -> io::Result<()> {
    for section in image.symbol_sections() {
        let Some(table) = section.symbols() else {
            continue;
        };
        writeln!(
            out,
            "Symbol table '{}' contains {} entries:",
            section.name,
            table.len()
        )?;
        writeln!(
            out,
            "{:>6}:    {:<15} {:<5} {:<8} {:<8} {:<5} {:<25}",
            "Num", "Value", "Size", "Type", "Bind", "Ndx", "Name"
        )?;
        for (i, sym) in table.symbols.iter().enumerate() {
            let name: String = sym.name.chars().take(25).collect();
            writeln!(
                out,
                "{:>6}: {:016X} {:>5} {:<8} {:<8} {:>5} {:<25}",
                i,
                sym.value,
                sym.size,
                sym.type_name(),
                sym.binding_name(),
                sym.shndx,
                name
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print every note section.
pub fn print_notes(image: &ElfImage, out: &mut impl Write) -> io::Result<()> {
    for section in image.note_sections() {
        let Some(notes) = section.notes() else {
            continue;
        };
        writeln!(
            out,
            "Displaying notes found at file offset 0x{:08X} with length 0x{:08X}:",
            section.offset, section.size
        )?;
        writeln!(out, "{:<20} {:<12} {:<10}", "Owner", "Data size", "Type")?;
        for note in notes {
            writeln!(
                out,
                "{:<20} 0x{:08X} 0x{:08X}",
                note.name,
                note.description.len(),
                note.note_type
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print every relocation section.
pub fn print_relocations(image: &ElfImage, out: &mut impl Write) -> io::Result<()> {
    for section in image.relocation_sections() {
        let Some(table) = section.relocations() else {
            continue;
        };
        writeln!(
            out,
            "Relocation section '{}' at offset 0x{:X} contains {} entries:",
            section.name,
            section.offset,
            table.len()
        )?;
        writeln!(
            out,
            "{:<12} {:<12} {:<8} {:<16} {:<55}",
            "Offset", "Info", "Type", "Sym. Value", "Sym. Name + Addend"
        )?;
        for entry in &table.entries {
            let (sym_value, sym_name) = entry
                .symbol
                .as_ref()
                .map(|s| (s.value, s.name.as_str()))
                .unwrap_or((0, ""));
            let name: String = sym_name.chars().take(45).collect();
            writeln!(
                out,
                "{:012X} {:012X} {:08X} {:016X} {} + {:X}",
                entry.offset, entry.info, entry.reloc_type, sym_value, name, entry.addend
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}
