//! Firmware runner for the 8086 core.
//!
//! Loads a raw firmware image into the top of the address space, runs the
//! CPU until it halts, faults or hits an instruction limit, and renders the
//! machine state for inspection.

mod config;
pub mod diagnostics;
mod loader;
mod machine;

pub use config::MachineConfig;
pub use loader::{LoadError, load_firmware};
pub use machine::{Machine, RunOutcome};
