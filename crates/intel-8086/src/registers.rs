//! 8086 register file.

use std::fmt;

use crate::Fault;

/// A 16-bit general-purpose register, numbered as in the ModR/M `reg` and
/// `r/m` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Ax = 0,
    Cx = 1,
    Dx = 2,
    Bx = 3,
    Sp = 4,
    Bp = 5,
    Si = 6,
    Di = 7,
}

impl Reg {
    /// All registers in encoding order.
    pub const ALL: [Reg; 8] = [
        Reg::Ax,
        Reg::Cx,
        Reg::Dx,
        Reg::Bx,
        Reg::Sp,
        Reg::Bp,
        Reg::Si,
        Reg::Di,
    ];

    /// Map a register index to a register.
    pub fn from_index(index: u8) -> Result<Self, Fault> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(Fault::UnknownRegisterIndex(index))
    }

    /// Register selected by the low three bits of `bits`.
    ///
    /// Used for opcode-embedded and ModR/M fields, which are three bits wide
    /// by construction.
    #[must_use]
    pub const fn from_low_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => Reg::Ax,
            1 => Reg::Cx,
            2 => Reg::Dx,
            3 => Reg::Bx,
            4 => Reg::Sp,
            5 => Reg::Bp,
            6 => Reg::Si,
            _ => Reg::Di,
        }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Lower-case assembler name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Reg::Ax => "ax",
            Reg::Cx => "cx",
            Reg::Dx => "dx",
            Reg::Bx => "bx",
            Reg::Sp => "sp",
            Reg::Bp => "bp",
            Reg::Si => "si",
            Reg::Di => "di",
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

/// Segment registers.
///
/// Real-mode code would combine these with offsets to form physical
/// addresses. No supported instruction does, so they are plain state kept
/// for completeness and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segments {
    pub cs: u16,
    pub ds: u16,
    pub es: u16,
    pub ss: u16,
}

/// General-purpose and segment registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: [u16; 8],
    /// Segment registers.
    pub segments: Segments,
}

impl RegisterFile {
    /// All registers zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gpr: [0; 8],
            segments: Segments {
                cs: 0,
                ds: 0,
                es: 0,
                ss: 0,
            },
        }
    }

    /// Read a register by raw index.
    pub fn get(&self, index: u8) -> Result<u16, Fault> {
        Reg::from_index(index).map(|reg| self.read(reg))
    }

    /// Write a register by raw index.
    pub fn set(&mut self, index: u8, value: u16) -> Result<(), Fault> {
        let reg = Reg::from_index(index)?;
        self.write(reg, value);
        Ok(())
    }

    #[must_use]
    pub const fn read(&self, reg: Reg) -> u16 {
        self.gpr[reg as usize]
    }

    pub fn write(&mut self, reg: Reg, value: u16) {
        self.gpr[reg as usize] = value;
    }
}

/// CPU register snapshot for observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    pub ax: u16,
    pub cx: u16,
    pub dx: u16,
    pub bx: u16,
    pub sp: u16,
    pub bp: u16,
    pub si: u16,
    pub di: u16,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub segments: Segments,
    pub flags: u16,
    /// Physical address of the next opcode byte.
    pub ip: u32,
}
