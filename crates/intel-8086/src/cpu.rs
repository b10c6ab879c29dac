//! 8086 CPU implementation.
//!
//! Instruction-stepped: each `step()` fetches, decodes and executes one whole
//! instruction. Decode and execute are separate phases. The decoder produces
//! an `Instruction` without side effects, and only `execute` changes state.

mod execute;

use emu_core::Cpu;
use tracing::{debug, warn};

use crate::decode::Decoder;
use crate::memory::FIRMWARE_BASE;
use crate::registers::Segments;
use crate::{Fault, Flags, Memory, Reg, RegisterFile, Registers};

/// Execution state.
///
/// `Halted` and `Faulted` are both terminal: the fetch-decode-execute loop
/// stops and further steps do nothing until `reset()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// Fetching and executing instructions.
    Running,
    /// HLT executed.
    Halted,
    /// Stopped by a fatal condition.
    Faulted(Fault),
}

/// The Intel 8086 CPU.
///
/// Owns its registers, flags, instruction pointer and the full 1 MiB of
/// physical memory. Nothing is shared between instances.
#[derive(Debug)]
pub struct I8086 {
    regs: RegisterFile,
    flags: Flags,
    memory: Memory,

    /// Physical address of the next opcode byte.
    ip: u32,

    state: ExecState,

    /// Instructions retired since reset (for debugging).
    instructions: u64,
}

impl Default for I8086 {
    fn default() -> Self {
        Self::new(Memory::new())
    }
}

impl I8086 {
    /// Create a CPU over `memory`, at the firmware entry point.
    #[must_use]
    pub fn new(memory: Memory) -> Self {
        Self {
            regs: RegisterFile::new(),
            flags: Flags::new(),
            memory,
            ip: FIRMWARE_BASE,
            state: ExecState::Running,
            instructions: 0,
        }
    }

    /// Create a CPU with `image` loaded into the firmware region.
    pub fn with_firmware(image: &[u8]) -> Result<Self, Fault> {
        Ok(Self::new(Memory::with_firmware(image)?))
    }

    #[must_use]
    pub fn state(&self) -> ExecState {
        self.state
    }

    #[must_use]
    pub fn ip(&self) -> u32 {
        self.ip
    }

    pub fn set_ip(&mut self, ip: u32) {
        self.ip = ip;
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[must_use]
    pub fn reg(&self, reg: Reg) -> u16 {
        self.regs.read(reg)
    }

    /// Read a register by raw index. An invalid index faults the CPU.
    pub fn get_register(&mut self, index: u8) -> Result<u16, Fault> {
        self.regs.get(index).inspect_err(|&fault| self.fault(fault))
    }

    /// Write a register by raw index. An invalid index faults the CPU.
    pub fn set_register(&mut self, index: u8, value: u16) -> Result<(), Fault> {
        self.regs.set(index, value).inspect_err(|&fault| self.fault(fault))
    }

    #[must_use]
    pub fn segments(&self) -> Segments {
        self.regs.segments
    }

    pub fn segments_mut(&mut self) -> &mut Segments {
        &mut self.regs.segments
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Instructions retired since reset.
    #[must_use]
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Execute one instruction and return the resulting state.
    pub fn step(&mut self) -> ExecState {
        self.execute_next();
        self.state
    }

    /// Run until the CPU halts or faults.
    ///
    /// There is no built-in bound: a firmware image that loops forever keeps
    /// this call spinning. Callers that need a limit drive `step()`.
    pub fn run(&mut self) -> ExecState {
        while self.state == ExecState::Running {
            self.execute_next();
        }
        self.state
    }

    fn execute_next(&mut self) {
        if self.state != ExecState::Running {
            return;
        }

        let at = self.ip;
        let mut decoder = Decoder::new(&self.memory, at);
        let decoded = decoder.decode();
        self.ip = decoder.ip();

        match decoded {
            Ok(insn) => {
                debug!("{at:05X}: {insn}");
                self.execute(insn);
                self.instructions += 1;
            }
            Err(fault) => self.fault(fault),
        }
    }

    fn fault(&mut self, fault: Fault) {
        warn!("cpu fault: {fault}");
        self.state = ExecState::Faulted(fault);
    }
}

impl Cpu for I8086 {
    type Registers = Registers;

    fn step(&mut self) {
        self.execute_next();
    }

    fn pc(&self) -> u32 {
        self.ip
    }

    fn registers(&self) -> Registers {
        Registers {
            ax: self.regs.read(Reg::Ax),
            cx: self.regs.read(Reg::Cx),
            dx: self.regs.read(Reg::Dx),
            bx: self.regs.read(Reg::Bx),
            sp: self.regs.read(Reg::Sp),
            bp: self.regs.read(Reg::Bp),
            si: self.regs.read(Reg::Si),
            di: self.regs.read(Reg::Di),
            segments: self.regs.segments,
            flags: self.flags.bits(),
            ip: self.ip,
        }
    }

    fn is_halted(&self) -> bool {
        self.state == ExecState::Halted
    }

    fn is_running(&self) -> bool {
        self.state == ExecState::Running
    }

    fn reset(&mut self) {
        self.regs = RegisterFile::new();
        self.flags = Flags::new();
        self.ip = FIRMWARE_BASE;
        self.state = ExecState::Running;
        self.instructions = 0;
    }
}
