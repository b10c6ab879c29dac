//! Machine configuration.

/// Configuration for creating a [`Machine`](crate::Machine).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Raw firmware image, loaded at the firmware base. At most 8 KiB.
    pub firmware: Vec<u8>,
    /// Stop after this many instructions if the CPU is still running.
    pub instruction_limit: Option<u64>,
}

impl MachineConfig {
    #[must_use]
    pub fn new(firmware: Vec<u8>) -> Self {
        Self {
            firmware,
            instruction_limit: None,
        }
    }

    #[must_use]
    pub fn with_instruction_limit(mut self, limit: u64) -> Self {
        self.instruction_limit = Some(limit);
        self
    }
}
