use color_print::cprintln;
use r64asm::diag::Diag;
use r64asm::dump::print_dump;
use r64asm::literal::remove_quotes;
use r64asm::{export, AsmConfig, Assembler, Format, MAX_MEMORY_SIZE, MEMORY_SIZE};
use std::path::Path;
use std::process::ExitCode;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Source file
    source: String,

    /// Output file [default: source path without extension]
    dest: Option<String>,

    /// Output format (`-raw`, `-mif` and `-coe` are accepted as well)
    #[clap(short, long, value_enum, default_value_t = Format::Raw)]
    format: Format,

    /// Dump assembled words next to their source lines
    #[clap(short, long)]
    dump: bool,

    /// Memory size in words
    #[clap(long, default_value_t = MEMORY_SIZE, value_parser = memory_size)]
    memory_size: usize,
}

fn memory_size(arg: &str) -> Result<usize, String> {
    let size: usize = arg.parse().map_err(|e| format!("{e}"))?;
    match (1..=MAX_MEMORY_SIZE).contains(&size) {
        true => Ok(size),
        false => Err(format!("must be between 1 and {MAX_MEMORY_SIZE}")),
    }
}

/// `-raw`, `-mif`, `-coe` are single-dash long options; clap would read them
/// as clusters of short flags.
fn normalize(arg: String) -> String {
    match arg.as_str() {
        "-raw" | "-mif" | "-coe" => format!("--format={}", &arg[1..]),
        _ => arg,
    }
}

fn default_dest(source: &str) -> String {
    Path::new(remove_quotes(source))
        .with_extension("")
        .display()
        .to_string()
}

fn main() -> ExitCode {
    use clap::Parser;

    let args = Args::parse_from(std::env::args().map(normalize));
    println!("R64 Assembler");

    println!("1. Assemble");
    println!("  < {}", args.source);
    let asm = Assembler::new(AsmConfig {
        memory_size: args.memory_size,
    });
    let report = match asm.assemble_file(&args.source) {
        Ok(report) => report,
        Err(err) => {
            Diag::error(err, None).print();
            return ExitCode::FAILURE;
        }
    };
    for diag in &report.diags {
        diag.print();
    }

    let Some(words) = &report.words else {
        cprintln!(
            "<r,s>Compilation failed with {} error(s)!</>",
            report.errors()
        );
        return ExitCode::FAILURE;
    };
    cprintln!("<g,s>Compilation succeeded!</>");
    if args.dump {
        print_dump(&report);
    }

    println!("2. Export");
    let dest = args.dest.unwrap_or_else(|| default_dest(&args.source));
    match export(words, &dest, args.format) {
        Ok(path) => {
            println!("  > {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            Diag::error(err, None).print();
            ExitCode::FAILURE
        }
    }
}
