//! 8086 firmware runner binary.
//!
//! Loads a raw firmware image at 0xFE000, runs it to completion and prints
//! the machine state.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use emu_8086::{Machine, MachineConfig, RunOutcome, diagnostics, load_firmware};
use emu_core::Cpu;
use intel_8086::ExecState;
use tracing::error;
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: u8 = 1;
const EXIT_LIMIT_REACHED: u8 = 2;

/// When to print the register and firmware dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DumpMode {
    Never,
    OnFault,
    Always,
}

#[derive(Parser, Debug)]
#[command(name = "emu-8086", about = "Run a raw 8086 firmware image from 0xFE000.")]
struct Args {
    /// Firmware image (raw bytes, at most 8 KiB)
    firmware: PathBuf,

    /// Stop after this many instructions if the CPU has not halted
    #[arg(long, value_name = "N")]
    max_instructions: Option<u64>,

    /// Print the register and firmware dump after the run
    #[arg(long, value_enum, default_value_t = DumpMode::OnFault)]
    dump: DumpMode,

    /// Print the final registers as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Trace every executed instruction (unless RUST_LOG says otherwise)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(machine: &Machine, outcome: &RunOutcome, args: &Args) {
    let faulted = matches!(outcome.state, ExecState::Faulted(_));
    let dump = match args.dump {
        DumpMode::Never => false,
        DumpMode::OnFault => faulted,
        DumpMode::Always => true,
    };
    if dump {
        print!("{}", diagnostics::dump(machine.cpu()));
    }

    if args.json {
        match serde_json::to_string_pretty(&machine.cpu().registers()) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("cannot serialise registers: {e}"),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let firmware = match load_firmware(&args.firmware) {
        Ok(image) => image,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let config = MachineConfig {
        firmware,
        instruction_limit: args.max_instructions,
    };
    let mut machine = match Machine::new(&config) {
        Ok(machine) => machine,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let outcome = machine.run();
    report(&machine, &outcome, &args);

    match outcome.state {
        ExecState::Halted => ExitCode::SUCCESS,
        ExecState::Faulted(fault) => {
            error!("cpu faulted: {fault}");
            ExitCode::from(EXIT_FAILURE)
        }
        ExecState::Running => {
            error!(
                "instruction limit reached after {} instructions",
                outcome.instructions
            );
            ExitCode::from(EXIT_LIMIT_REACHED)
        }
    }
}
