//! CPU core trait.

/// A CPU core.
///
/// The CPU owns its memory and register state outright; nothing is shared
/// with other components. Each `step()` fetches, decodes and executes one
/// instruction. Once the CPU has stopped (halted or faulted) further steps
/// are no-ops until `reset()`.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute a single instruction.
    fn step(&mut self);

    /// Returns the current program counter.
    ///
    /// Returns `u32` so that CPUs with addresses wider than 16 bits (the
    /// 8086's 20-bit physical space) fit without truncation.
    fn pc(&self) -> u32;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU executed an explicit halt.
    fn is_halted(&self) -> bool;

    /// Returns true while the CPU will still execute instructions.
    fn is_running(&self) -> bool;

    /// Reset the CPU to its power-on state. Memory contents are kept.
    fn reset(&mut self);
}
