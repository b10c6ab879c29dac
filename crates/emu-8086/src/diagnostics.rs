//! Post-mortem state dump.
//!
//! Registers are listed one per line as `name: value`, followed by a hex
//! dump of the firmware region, 16 bytes per line.

use std::fmt::{self, Write};

use emu_core::Observable;
use intel_8086::I8086;
use intel_8086::memory::{FIRMWARE_BASE, FIRMWARE_SIZE};

/// Register paths in dump order.
const DUMP_ORDER: &[&str] = &[
    "ax", "bx", "cx", "dx", "si", "di", "bp", "sp", "flags", "cs", "ds", "es", "ss", "ip",
];

const BYTES_PER_LINE: usize = 16;

/// Write the register and firmware dump for `cpu` to `out`.
pub fn write_dump(cpu: &I8086, out: &mut impl Write) -> fmt::Result {
    for path in DUMP_ORDER {
        if let Some(value) = cpu.query(path) {
            writeln!(out, "{path}: {value}")?;
        }
    }

    writeln!(out, "BIOS:")?;
    for (line, chunk) in cpu.memory().firmware().chunks(BYTES_PER_LINE).enumerate() {
        let address = FIRMWARE_BASE as usize + line * BYTES_PER_LINE;
        write!(out, "{address:05X}:")?;
        for byte in chunk {
            write!(out, " {byte:02X}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Render the dump as a string.
#[must_use]
pub fn dump(cpu: &I8086) -> String {
    let mut out = String::with_capacity(FIRMWARE_SIZE * 4);
    // Writing to a String cannot fail.
    let _ = write_dump(cpu, &mut out);
    out
}
