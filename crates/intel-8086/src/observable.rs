//! Observable implementation for the 8086 CPU.

use emu_core::{Observable, Value};

use crate::flags::{CF, OF, SF, ZF};
use crate::{ExecState, I8086, Reg};

/// Query paths supported by the 8086.
const I8086_QUERY_PATHS: &[&str] = &[
    "ax", "cx", "dx", "bx", "sp", "bp", "si", "di",
    "cs", "ds", "es", "ss",
    "ip",
    "flags",
    "flags.z", "flags.c", "flags.s", "flags.o",
    "halted", "faulted", "fault",
    "instructions",
];

impl Observable for I8086 {
    fn query(&self, path: &str) -> Option<Value> {
        let segments = self.segments();
        match path {
            "ax" => Some(self.reg(Reg::Ax).into()),
            "cx" => Some(self.reg(Reg::Cx).into()),
            "dx" => Some(self.reg(Reg::Dx).into()),
            "bx" => Some(self.reg(Reg::Bx).into()),
            "sp" => Some(self.reg(Reg::Sp).into()),
            "bp" => Some(self.reg(Reg::Bp).into()),
            "si" => Some(self.reg(Reg::Si).into()),
            "di" => Some(self.reg(Reg::Di).into()),
            "cs" => Some(segments.cs.into()),
            "ds" => Some(segments.ds.into()),
            "es" => Some(segments.es.into()),
            "ss" => Some(segments.ss.into()),
            "ip" => Some(Value::Addr(self.ip())),
            "flags" => Some(self.flags().bits().into()),
            "flags.z" => Some(self.flags().test(ZF).into()),
            "flags.c" => Some(self.flags().test(CF).into()),
            "flags.s" => Some(self.flags().test(SF).into()),
            "flags.o" => Some(self.flags().test(OF).into()),
            "halted" => Some((self.state() == ExecState::Halted).into()),
            "faulted" => Some(matches!(self.state(), ExecState::Faulted(_)).into()),
            "fault" => match self.state() {
                ExecState::Faulted(fault) => Some(fault.to_string().into()),
                _ => None,
            },
            "instructions" => Some(self.instructions().into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        I8086_QUERY_PATHS
    }
}
