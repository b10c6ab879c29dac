//! Instruction decode.
//!
//! Decoding is a pure function of memory contents and the starting address:
//! it reads bytes, never writes them, and never touches registers. The
//! result is an `Instruction` that the execution engine matches on.

use std::fmt;

use crate::{Fault, Memory, Reg};

/// ModR/M `mod` value for register-direct operands.
pub const MODE_REGISTER: u8 = 0b11;

/// Sign-extend an 8-bit two's-complement displacement to 16 bits.
///
/// Total over all byte values: 0x00..=0x7F map to 0..=127 and 0x80..=0xFF
/// map to -128..=-1.
#[must_use]
pub const fn sign_extend(byte: u8) -> i16 {
    byte as i8 as i16
}

/// The three fields of a ModR/M byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRm {
    /// Bits 7-6: addressing mode.
    pub mode: u8,
    /// Bits 5-3: register operand.
    pub reg: u8,
    /// Bits 2-0: register or memory operand.
    pub rm: u8,
}

impl ModRm {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        Self {
            mode: byte >> 6,
            reg: (byte >> 3) & 0b111,
            rm: byte & 0b111,
        }
    }

    /// Resolve both operands as registers, returning `(rm, reg)`.
    ///
    /// Only register-direct mode is supported; memory forms fault.
    pub fn register_direct(self) -> Result<(Reg, Reg), Fault> {
        if self.mode != MODE_REGISTER {
            return Err(Fault::UnsupportedAddressingMode(self.mode));
        }
        Ok((Reg::from_low_bits(self.rm), Reg::from_low_bits(self.reg)))
    }
}

/// Two-operand ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Xor,
    Cmp,
}

impl AluOp {
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Xor => "XOR",
            AluOp::Cmp => "CMP",
        }
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `op r16, r16` (0x01 ADD, 0x31 XOR, 0x39 CMP). `dst` is the r/m
    /// operand, `src` the reg operand.
    AluReg { op: AluOp, dst: Reg, src: Reg },
    /// `op AX, imm16` (0x05 ADD, 0x2D SUB).
    AluAcc { op: AluOp, imm: u16 },
    /// `op r16, imm` from the 0x81/0x83 group. `imm8` records the encoded
    /// width; the value is already zero-extended.
    AluImm {
        op: AluOp,
        dst: Reg,
        imm: u16,
        imm8: bool,
    },
    /// INC r16 (0x40-0x47).
    Inc(Reg),
    /// DEC r16 (0x48-0x4F).
    Dec(Reg),
    /// MOV r16, imm16 (0xB8-0xBF).
    MovImm { dst: Reg, imm: u16 },
    /// JE rel8 (0x74), displacement already sign-extended.
    Je(i16),
    /// JMP rel8 (0xEB), displacement already sign-extended.
    Jmp(i16),
    /// NOP (0x90).
    Nop,
    /// HLT (0xF4).
    Hlt,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::AluReg { op, dst, src } => {
                write!(f, "{} {dst}, {src}", op.mnemonic())
            }
            Instruction::AluAcc { op, imm } => write!(f, "{} AX, {imm:04X}", op.mnemonic()),
            Instruction::AluImm {
                op,
                dst,
                imm,
                imm8: true,
            } => write!(f, "{} {dst}, {imm:02X}", op.mnemonic()),
            Instruction::AluImm { op, dst, imm, .. } => {
                write!(f, "{} {dst}, {imm:04X}", op.mnemonic())
            }
            Instruction::Inc(reg) => write!(f, "INC {reg}"),
            Instruction::Dec(reg) => write!(f, "DEC {reg}"),
            Instruction::MovImm { dst, imm } => write!(f, "MOV {dst}, {imm:04X}"),
            Instruction::Je(disp) => write!(f, "JE {disp:+}"),
            Instruction::Jmp(disp) => write!(f, "JMP {disp:+}"),
            Instruction::Nop => f.write_str("NOP"),
            Instruction::Hlt => f.write_str("HLT"),
        }
    }
}

/// Reads one instruction from memory.
///
/// `ip()` reports the address just past the last byte consumed, whether
/// decoding succeeded or not.
pub struct Decoder<'a> {
    memory: &'a Memory,
    ip: u32,
}

impl<'a> Decoder<'a> {
    #[must_use]
    pub fn new(memory: &'a Memory, ip: u32) -> Self {
        Self { memory, ip }
    }

    #[must_use]
    pub fn ip(&self) -> u32 {
        self.ip
    }

    fn fetch_u8(&mut self) -> Result<u8, Fault> {
        let byte = self.memory.read(self.ip)?;
        self.ip = self.ip.wrapping_add(1);
        Ok(byte)
    }

    fn fetch_u16(&mut self) -> Result<u16, Fault> {
        let lo = self.fetch_u8()?;
        let hi = self.fetch_u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    fn fetch_modrm(&mut self) -> Result<(Reg, Reg), Fault> {
        ModRm::from_byte(self.fetch_u8()?).register_direct()
    }

    /// Decode the instruction at the current address.
    pub fn decode(&mut self) -> Result<Instruction, Fault> {
        let at = self.ip;
        let opcode = self.fetch_u8()?;

        let insn = match opcode {
            0x01 | 0x31 | 0x39 => {
                let op = match opcode {
                    0x01 => AluOp::Add,
                    0x31 => AluOp::Xor,
                    _ => AluOp::Cmp,
                };
                let (dst, src) = self.fetch_modrm()?;
                Instruction::AluReg { op, dst, src }
            }

            0x05 => Instruction::AluAcc {
                op: AluOp::Add,
                imm: self.fetch_u16()?,
            },

            0x2D => Instruction::AluAcc {
                op: AluOp::Sub,
                imm: self.fetch_u16()?,
            },

            0x40..=0x47 => Instruction::Inc(Reg::from_low_bits(opcode)),

            0x48..=0x4F => Instruction::Dec(Reg::from_low_bits(opcode)),

            0x74 => Instruction::Je(sign_extend(self.fetch_u8()?)),

            0x81 => self.decode_group(false)?,

            0x83 => self.decode_group(true)?,

            0x90 => Instruction::Nop,

            0xB8..=0xBF => Instruction::MovImm {
                dst: Reg::from_low_bits(opcode),
                imm: self.fetch_u16()?,
            },

            0xEB => Instruction::Jmp(sign_extend(self.fetch_u8()?)),

            0xF4 => Instruction::Hlt,

            _ => return Err(Fault::UnknownOpcode(opcode, at)),
        };

        Ok(insn)
    }

    /// 0x81/0x83: selector byte, then the immediate, then the selector is
    /// classified. C0-C7 is ADD, E8-EF is SUB, low three bits pick the
    /// register.
    fn decode_group(&mut self, imm8: bool) -> Result<Instruction, Fault> {
        let selector = self.fetch_u8()?;
        let imm = if imm8 {
            u16::from(self.fetch_u8()?)
        } else {
            self.fetch_u16()?
        };

        let op = match selector {
            0xC0..=0xC7 => AluOp::Add,
            0xE8..=0xEF => AluOp::Sub,
            _ => return Err(Fault::UnknownGroupSelector(selector)),
        };

        Ok(Instruction::AluImm {
            op,
            dst: Reg::from_low_bits(selector),
            imm,
            imm8,
        })
    }
}
