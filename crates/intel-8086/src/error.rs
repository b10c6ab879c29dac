//! Execution faults.

use thiserror::Error;

/// A fatal condition that stops the CPU.
///
/// There is no recovery path: once a fault is raised the CPU moves to
/// `ExecState::Faulted` and stays there until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// Opcode byte not in the supported set. Carries the opcode and the
    /// address it was fetched from.
    #[error("unknown opcode {0:02X} at {1:05X}")]
    UnknownOpcode(u8, u32),

    /// ModR/M `mod` field other than register-direct (3).
    #[error("unsupported addressing mode {0}")]
    UnsupportedAddressingMode(u8),

    /// Register index outside 0..=7.
    #[error("unknown register index {0:02X}")]
    UnknownRegisterIndex(u8),

    /// Selector byte for the 0x81/0x83 immediate group outside C0-C7/E8-EF.
    #[error("unknown op extension {0:02X}")]
    UnknownGroupSelector(u8),

    /// Memory access beyond the 1 MiB address space.
    #[error("address {0:X} outside physical memory")]
    AddressOutOfRange(u32),
}
