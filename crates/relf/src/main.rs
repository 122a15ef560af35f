//! relf - a readelf-style dumper over `relf-image`.

mod dump;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "relf")]
#[command(about = "Displays information about the contents of ELF files")]
#[command(version = relf_image::VERSION)]
struct Cli {
    /// The ELF file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Display the ELF file header
    #[arg(short = 'f', long = "file-header")]
    file_header: bool,

    /// Display the program headers and the section-to-segment mapping
    #[arg(short = 'l', long = "segments")]
    segments: bool,

    /// Display the section headers
    #[arg(short = 'S', long = "sections")]
    sections: bool,

    /// Display all the headers; equivalent to -f -l -S
    #[arg(short = 'e', long = "headers")]
    headers: bool,

    /// Display the symbol tables
    #[arg(short = 's', long = "symbols")]
    symbols: bool,

    /// Display the dynamic section
    #[arg(short = 'd', long = "dynamic")]
    dynamic: bool,

    /// Display the note sections
    #[arg(short = 'n', long = "notes")]
    notes: bool,

    /// Display the relocation sections
    #[arg(short = 'r', long = "relocs")]
    relocs: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Argument errors exit with 1; --help and --version exit with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };

    let image = match relf_image::ElfImage::open(&cli.file) {
        Ok(image) => image,
        Err(e) => {
            error!(error = %e, path = %cli.file.display(), "failed to open ELF file");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let all = cli.headers;
    let mut out = io::stdout();
    let result = (|| -> io::Result<()> {
        if cli.file_header || all {
            dump::print_file_header(&image, &mut out)?;
        }
        if cli.sections || all {
            dump::print_sections(&image, &mut out)?;
        }
        if cli.segments || all {
            dump::print_segments(&image, &mut out)?;
        }
        if cli.symbols {
            dump::print_symbols(&image, &mut out)?;
        }
        if cli.dynamic {
            dump::print_dynamic(&image, &mut out)?;
        }
        if cli.notes {
            dump::print_notes(&image, &mut out)?;
        }
        if cli.relocs {
            dump::print_relocations(&image, &mut out)?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            error!(error = %e, "failed to write output");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_combined_flags() {
        let cli = Cli::parse_from(["relf", "-f", "-l", "-S", "prog.elf"]);
        assert!(cli.file_header && cli.segments && cli.sections);
        assert!(!cli.symbols);
        assert_eq!(cli.file, PathBuf::from("prog.elf"));
    }

    #[test]
    fn parses_long_flags() {
        let cli = Cli::parse_from(["relf", "--headers", "--relocs", "prog.elf"]);
        assert!(cli.headers && cli.relocs);
    }
}
