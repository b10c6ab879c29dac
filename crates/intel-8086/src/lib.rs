//! Intel 8086 real-mode CPU core.
//!
//! Implements a register-direct subset of the 8086 instruction set over a
//! flat 1 MiB address space. Each `step()` executes one whole instruction.
//! Unsupported opcodes, addressing modes and group selectors stop the CPU
//! with a `Fault`; there is no recovery.
//!
//! Segment registers exist but take no part in address computation, and only
//! CMP updates the flags.

mod cpu;
pub mod decode;
mod error;
pub mod flags;
pub mod memory;
mod observable;
mod registers;

pub use cpu::{ExecState, I8086};
pub use decode::{Decoder, Instruction};
pub use error::Fault;
pub use flags::Flags;
pub use memory::Memory;
pub use registers::{Reg, RegisterFile, Registers, Segments};
