//! 8086 status flags.
//!
//! Only four condition bits are modelled, packed into bits 0-3. This is not
//! the hardware FLAGS layout.
//! Every other bit is reserved: never set by the core, never inspected.

/// Zero flag - set if the compare result is zero.
pub const ZF: u16 = 1 << 0;

/// Carry flag - set if the compare needed an unsigned borrow.
pub const CF: u16 = 1 << 1;

/// Sign flag - set if bit 15 of the compare result is set.
pub const SF: u16 = 1 << 2;

/// Overflow flag - always cleared by CMP in this core.
pub const OF: u16 = 1 << 3;

/// Status flag word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(pub u16);

impl Flags {
    /// All flags clear.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Raw flag word.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Check if a flag is set.
    #[must_use]
    pub const fn test(self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    /// Set a flag.
    pub fn set(&mut self, flag: u16) {
        self.0 |= flag;
    }

    /// Clear a flag.
    pub fn clear(&mut self, flag: u16) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on condition.
    pub fn set_if(&mut self, flag: u16, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Recompute ZF, SF, CF and OF from `lhs - rhs`.
    ///
    /// The operands themselves are not modified by the caller; only the flag
    /// word changes. Reserved bits keep whatever value they had.
    pub fn update_compare(&mut self, lhs: u16, rhs: u16) {
        let result = lhs.wrapping_sub(rhs);
        self.set_if(ZF, result == 0);
        self.set_if(SF, result & 0x8000 != 0);
        self.set_if(CF, rhs > lhs);
        self.clear(OF);
    }
}
