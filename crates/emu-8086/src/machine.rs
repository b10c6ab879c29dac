//! Top-level machine: one 8086 core with firmware mapped at the top of memory.

use emu_core::{Observable, Value};
use intel_8086::memory::{MEMORY_SIZE, linear_address};
use intel_8086::{ExecState, I8086};
use tracing::info;

use crate::MachineConfig;
use crate::loader::{LoadError, check_size};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// CPU state when the run stopped.
    pub state: ExecState,
    /// Instructions retired during this run.
    pub instructions: u64,
    /// True if the run stopped on the instruction limit with the CPU still
    /// running.
    pub limit_reached: bool,
}

/// The 8086 machine.
#[derive(Debug)]
pub struct Machine {
    cpu: I8086,
    instruction_limit: Option<u64>,
}

impl Machine {
    /// Create a machine from `config`, with the firmware already in memory
    /// and IP at the firmware base.
    pub fn new(config: &MachineConfig) -> Result<Self, LoadError> {
        check_size(&config.firmware)?;
        let cpu = I8086::with_firmware(&config.firmware)?;
        Ok(Self {
            cpu,
            instruction_limit: config.instruction_limit,
        })
    }

    #[must_use]
    pub fn cpu(&self) -> &I8086 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut I8086 {
        &mut self.cpu
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> ExecState {
        self.cpu.step()
    }

    /// Run until the CPU halts, faults or reaches the instruction limit.
    pub fn run(&mut self) -> RunOutcome {
        let start = self.cpu.instructions();

        let limit_reached = loop {
            if self.cpu.state() != ExecState::Running {
                break false;
            }
            if let Some(limit) = self.instruction_limit
                && self.cpu.instructions() - start >= limit
            {
                break true;
            }
            self.cpu.step();
        };

        let outcome = RunOutcome {
            state: self.cpu.state(),
            instructions: self.cpu.instructions() - start,
            limit_reached,
        };
        info!(
            "run stopped after {} instructions: {:?}",
            outcome.instructions, outcome.state
        );
        outcome
    }
}

/// Parse a `memory.<address>` suffix: `segment:offset` in hex, a
/// `0x`-prefixed hex physical address, or decimal.
fn parse_address(text: &str) -> Option<u32> {
    if let Some((segment, offset)) = text.split_once(':') {
        let segment = u16::from_str_radix(segment, 16).ok()?;
        let offset = u16::from_str_radix(offset, 16).ok()?;
        return Some(linear_address(segment, offset));
    }

    let address = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        text.parse().ok()?
    };
    (address < MEMORY_SIZE as u32).then_some(address)
}

impl Observable for Machine {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            let address = parse_address(rest)?;
            self.cpu.memory().read(address).ok().map(Value::U8)
        } else {
            self.cpu.query(path)
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["cpu.<8086_paths>", "memory.<address>"]
    }
}
