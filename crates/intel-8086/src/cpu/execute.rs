//! Instruction execution for the 8086.
//!
//! Arithmetic wraps at 16 bits and never touches the flags. CMP is the only
//! instruction that computes flags.

use crate::decode::{AluOp, Instruction};
use crate::flags::ZF;
use crate::Reg;

use super::{ExecState, I8086};

impl I8086 {
    pub(super) fn execute(&mut self, insn: Instruction) {
        match insn {
            Instruction::AluReg { op, dst, src } => {
                let operand = self.regs.read(src);
                self.alu(op, dst, operand);
            }

            Instruction::AluAcc { op, imm } => self.alu(op, Reg::Ax, imm),

            Instruction::AluImm { op, dst, imm, .. } => self.alu(op, dst, imm),

            Instruction::Inc(reg) => {
                let value = self.regs.read(reg).wrapping_add(1);
                self.regs.write(reg, value);
            }

            Instruction::Dec(reg) => {
                let value = self.regs.read(reg).wrapping_sub(1);
                self.regs.write(reg, value);
            }

            Instruction::MovImm { dst, imm } => self.regs.write(dst, imm),

            Instruction::Je(disp) => {
                if self.flags.test(ZF) {
                    self.jump(disp);
                }
            }

            Instruction::Jmp(disp) => self.jump(disp),

            Instruction::Nop => {}

            Instruction::Hlt => self.state = ExecState::Halted,
        }
    }

    /// `dst = dst op operand`, or just the flags for CMP.
    fn alu(&mut self, op: AluOp, dst: Reg, operand: u16) {
        let value = self.regs.read(dst);
        match op {
            AluOp::Add => self.regs.write(dst, value.wrapping_add(operand)),
            AluOp::Sub => self.regs.write(dst, value.wrapping_sub(operand)),
            AluOp::Xor => self.regs.write(dst, value ^ operand),
            AluOp::Cmp => self.flags.update_compare(value, operand),
        }
    }

    /// Relative jump. IP already points past the displacement byte.
    fn jump(&mut self, disp: i16) {
        self.ip = self.ip.wrapping_add_signed(i32::from(disp));
    }
}

#[cfg(test)]
mod tests {
    use crate::flags::{CF, OF, SF, ZF};
    use crate::memory::FIRMWARE_BASE;
    use crate::{ExecState, I8086, Reg};

    fn run(image: &[u8]) -> I8086 {
        let mut cpu = I8086::with_firmware(image).expect("image fits");
        cpu.run();
        cpu
    }

    #[test]
    fn add_does_not_touch_flags() {
        // MOV AX,1; MOV CX,1; CMP AX,CX (ZF=1); ADD AX,0xFFFF (wraps to 0); HLT
        let cpu = run(&[
            0xB8, 0x01, 0x00, 0xB9, 0x01, 0x00, 0x39, 0xC8, 0x05, 0xFF, 0xFF, 0xF4,
        ]);
        assert_eq!(cpu.reg(Reg::Ax), 0x0000);
        assert_eq!(cpu.flags().bits(), ZF);
    }

    #[test]
    fn xor_self_clears_register_only() {
        // MOV DX,0xAAAA; XOR DX,DX; HLT
        let cpu = run(&[0xBA, 0xAA, 0xAA, 0x31, 0xD2, 0xF4]);
        assert_eq!(cpu.reg(Reg::Dx), 0);
        assert_eq!(cpu.flags().bits(), 0);
    }

    #[test]
    fn cmp_leaves_operands_alone() {
        // MOV BX,1; MOV SI,2; CMP BX,SI; HLT
        let cpu = run(&[0xBB, 0x01, 0x00, 0xBE, 0x02, 0x00, 0x39, 0xF3, 0xF4]);
        assert_eq!(cpu.reg(Reg::Bx), 1);
        assert_eq!(cpu.reg(Reg::Si), 2);
        assert_eq!(cpu.flags().bits(), CF | SF);
        assert!(!cpu.flags().test(OF));
    }

    #[test]
    fn je_not_taken_falls_through() {
        // MOV AX,1; CMP AX,CX (1 vs 0); JE +1; INC DX; HLT
        let cpu = run(&[0xB8, 0x01, 0x00, 0x39, 0xC8, 0x74, 0x01, 0x42, 0xF4]);
        assert_eq!(cpu.state(), ExecState::Halted);
        assert_eq!(cpu.reg(Reg::Dx), 1);
    }

    #[test]
    fn backward_jump_loops() {
        // MOV CX,3; loop: DEC CX; CMP CX,AX; JE +2; JMP -7; HLT
        //
        // DEC at +3, JMP ends at +10, so -7 lands back on DEC.
        let cpu = run(&[
            0xB9, 0x03, 0x00, // MOV CX,3
            0x49, // DEC CX
            0x39, 0xC1, // CMP CX,AX
            0x74, 0x02, // JE +2
            0xEB, 0xF9, // JMP -7
            0xF4, // HLT
        ]);
        assert_eq!(cpu.state(), ExecState::Halted);
        assert_eq!(cpu.reg(Reg::Cx), 0);
        // MOV + 3 * (DEC, CMP, JE) + 2 * JMP + HLT
        assert_eq!(cpu.instructions(), 1 + 9 + 2 + 1);
    }

    #[test]
    fn jump_off_the_end_of_memory_faults() {
        // JMP +127 from the last bytes of the firmware region.
        let mut cpu = I8086::default();
        cpu.memory_mut()
            .load(0xF_FFFE, &[0xEB, 0x7F])
            .expect("fits");
        cpu.set_ip(0xF_FFFE);
        assert_eq!(
            cpu.run(),
            ExecState::Faulted(crate::Fault::AddressOutOfRange(0x10_007F))
        );
    }

    #[test]
    fn mov_targets_every_register() {
        let mut image = Vec::new();
        for (i, opcode) in (0xB8u8..=0xBF).enumerate() {
            image.extend_from_slice(&[opcode, i as u8, 0x10]);
        }
        image.push(0xF4);
        let cpu = run(&image);
        for reg in Reg::ALL {
            assert_eq!(cpu.reg(reg), 0x1000 | u16::from(reg.index()));
        }
        assert_eq!(cpu.ip(), FIRMWARE_BASE + image.len() as u32);
    }
}
