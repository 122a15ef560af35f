//! relf-summary - one-shot summary of an ELF file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(name = "relf-summary")]
#[command(about = "Prints basic information about an ELF file")]
#[command(version = relf_image::VERSION)]
struct Cli {
    /// The ELF file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let image = match relf_image::ElfImage::open(&cli.file) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("{}: {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let header = image.header();
    println!("Basic ELF file information:");
    println!();
    println!("Filename: {}", cli.file.display());
    println!("ELF Type: {}", header.type_name());
    println!("Class: {}", header.class.name());
    println!("Encoding: {}", header.encoding.name());
    println!("Entrypoint: {} ({:#x})", header.entry, header.entry);
    println!("ABI: {}", header.abi_name());
    println!("Machine: {}", header.machine_name());
    println!("Version: {}", header.version);
    println!("Number of Segments: {}", image.segments().len());
    println!("Number of Sections: {}", image.sections().len());
    ExitCode::SUCCESS
}
