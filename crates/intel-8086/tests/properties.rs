//! Property tests for the 8086 core.

use intel_8086::decode::sign_extend;
use intel_8086::flags::{CF, OF, SF, ZF};
use intel_8086::{ExecState, Fault, I8086, Reg};
use proptest::prelude::*;

/// MOV AX,lhs; MOV BX,rhs; CMP AX,BX; HLT
fn compare_image(lhs: u16, rhs: u16) -> Vec<u8> {
    let [l0, l1] = lhs.to_le_bytes();
    let [r0, r1] = rhs.to_le_bytes();
    vec![0xB8, l0, l1, 0xBB, r0, r1, 0x39, 0xD8, 0xF4]
}

proptest! {
    #[test]
    fn register_write_then_read(index in 0u8..8, value in any::<u16>()) {
        let mut cpu = I8086::default();
        prop_assert_eq!(cpu.set_register(index, value), Ok(()));
        prop_assert_eq!(cpu.get_register(index), Ok(value));
        prop_assert_eq!(cpu.state(), ExecState::Running);
    }

    #[test]
    fn register_writes_are_independent(index in 0u8..8, value in any::<u16>()) {
        let mut cpu = I8086::default();
        cpu.set_register(index, value).expect("valid index");
        for reg in Reg::ALL {
            if reg.index() != index {
                prop_assert_eq!(cpu.reg(reg), 0, "{} disturbed", reg);
            }
        }
    }

    #[test]
    fn invalid_register_index_faults(index in 8u8..=255) {
        let mut cpu = I8086::default();
        prop_assert_eq!(cpu.get_register(index), Err(Fault::UnknownRegisterIndex(index)));
        prop_assert_eq!(
            cpu.state(),
            ExecState::Faulted(Fault::UnknownRegisterIndex(index))
        );
    }

    #[test]
    fn sign_extend_is_twos_complement(byte in any::<u8>()) {
        let extended = sign_extend(byte);
        prop_assert_eq!(extended, i16::from(byte as i8));
        prop_assert!((-128..=127).contains(&extended));
        prop_assert_eq!(extended < 0, byte >= 0x80);
    }

    #[test]
    fn add_ax_wraps_modulo_2_16(start in any::<u16>(), imm in any::<u16>()) {
        let [s0, s1] = start.to_le_bytes();
        let [i0, i1] = imm.to_le_bytes();
        let mut cpu = I8086::with_firmware(&[0xB8, s0, s1, 0x05, i0, i1, 0xF4])
            .expect("image fits");

        prop_assert_eq!(cpu.run(), ExecState::Halted);
        prop_assert_eq!(cpu.reg(Reg::Ax), start.wrapping_add(imm));
        prop_assert_eq!(cpu.flags().bits(), 0);
    }

    #[test]
    fn cmp_sets_flags_from_difference(lhs in any::<u16>(), rhs in any::<u16>()) {
        let mut cpu = I8086::with_firmware(&compare_image(lhs, rhs)).expect("image fits");

        prop_assert_eq!(cpu.run(), ExecState::Halted);

        let diff = lhs.wrapping_sub(rhs);
        let flags = cpu.flags();
        prop_assert_eq!(flags.test(ZF), diff == 0);
        prop_assert_eq!(flags.test(SF), diff & 0x8000 != 0);
        prop_assert_eq!(flags.test(CF), rhs > lhs);
        prop_assert!(!flags.test(OF));

        // Operands are left untouched.
        prop_assert_eq!(cpu.reg(Reg::Ax), lhs);
        prop_assert_eq!(cpu.reg(Reg::Bx), rhs);
    }

    #[test]
    fn unknown_opcodes_fault_at_entry(opcode in any::<u8>()) {
        let supported = matches!(
            opcode,
            0x01 | 0x05 | 0x2D | 0x31 | 0x39 | 0x40..=0x4F | 0x74 | 0x81 | 0x83
                | 0x90 | 0xB8..=0xBF | 0xEB | 0xF4
        );
        prop_assume!(!supported);

        let mut cpu = I8086::with_firmware(&[opcode]).expect("image fits");
        prop_assert_eq!(
            cpu.step(),
            ExecState::Faulted(Fault::UnknownOpcode(opcode, intel_8086::memory::FIRMWARE_BASE))
        );
        prop_assert_eq!(cpu.instructions(), 0);
    }
}
