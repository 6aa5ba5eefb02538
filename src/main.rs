use clap::{ArgAction, Parser};
use lc3_vm::emulator::loader::Endianness;
use lc3_vm::emulator::{Emulator, EmulatorOptions, PROGRAM_SECTION_START, dump};
use std::io;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};

/// Runs an LC-3 object file until it halts.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Raw object file, a header-less sequence of 16 bit words
    object_file: PathBuf,
    /// Base address to load the program to, decimal or 0x prefixed hex
    #[arg(long, value_parser = parse_address, default_value_t = PROGRAM_SECTION_START)]
    origin: u16,
    /// Words added to the origin for load and start address
    #[arg(long, value_parser = parse_address, default_value_t = 0)]
    offset: u16,
    /// Object file words are big endian instead of little endian
    #[arg(long)]
    big_endian: bool,
    /// Fail on RTI, the reserved opcode and the reserved trap instead of skipping them
    #[arg(long)]
    strict: bool,
    /// Print occupied memory after loading and memory plus registers after execution
    #[arg(long)]
    dump: bool,
    /// More log output on stderr, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

const fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn dump_memory(emu: &Emulator, heading: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{heading}")?;
    dump::write_nonzero_memory(&mut stdout, emu.memory())
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(log_level(args.verbose))
        .init();

    let options = EmulatorOptions {
        origin: args.origin,
        offset: args.offset,
        endianness: if args.big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        },
        strict: args.strict,
        raw_terminal: io::stdin().is_terminal(),
    };
    let mut emu = Emulator::with_options(options);
    match emu.load_file(&args.object_file) {
        Ok(report) => info!(?report, "loaded {}", args.object_file.display()),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }
    if args.dump
        && let Err(e) = dump_memory(&emu, "Occupied memory after program load:")
    {
        error!("Could not print memory: {e}");
    }

    let result = emu.execute();

    if args.dump {
        let printed =
            dump_memory(&emu, "Occupied memory after program execution:").and_then(|()| {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "Registers after program execution:")?;
                dump::write_registers(&mut stdout, emu.registers())
            });
        if let Err(e) = printed {
            error!("Could not print machine state: {e}");
        }
    }
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
