//! Core traits and types for instruction-stepped emulation.
//!
//! A CPU advances one whole instruction per `step()` and exposes every piece
//! of its state for inspection. Inspection never changes what the CPU does
//! next.

mod cpu;
mod observable;

pub use cpu::Cpu;
pub use observable::{Observable, Value};
