//! Read-only listings of machine state for inspection.
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Reg, Registers};
use std::io;
use std::io::Write;

/// Writes one `address: value` line for every cell not holding 0.
///
/// # Errors
/// - writing to `out` fails
pub fn write_nonzero_memory(out: &mut impl Write, memory: &Memory) -> io::Result<()> {
    for (address, value) in memory.occupied() {
        writeln!(out, "{address:#06X}: {value:#06X}")?;
    }
    Ok(())
}

/// Writes all general purpose registers, the program counter and the condition register.
///
/// # Errors
/// - writing to `out` fails
pub fn write_registers(out: &mut impl Write, registers: &Registers) -> io::Result<()> {
    for r in Reg::ALL {
        writeln!(out, "{r}: {:#06X}", registers.get(r))?;
    }
    writeln!(out, "PC: {:#06X}", registers.pc())?;
    writeln!(out, "COND: {}", registers.get_conditional_register())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::test_helpers::StringWriter;
    use googletest::prelude::*;

    #[gtest]
    fn test_write_nonzero_memory() {
        let mut memory = Memory::new();
        memory.load_words(0x3000, &[0xF026, 0, 0x1220]);
        let mut out = StringWriter::new();
        write_nonzero_memory(&mut out, &memory).unwrap();
        expect_that!(out.get_string(), eq("0x3000: 0xF026\n0x3002: 0x1220\n"));
    }

    #[gtest]
    fn test_write_registers() {
        let mut registers = Registers::new();
        registers.set(Reg::R0, 7);
        registers.update_conditional_register(Reg::R0);
        registers.set_pc(0x3007);
        let mut out = StringWriter::new();
        write_registers(&mut out, &registers).unwrap();
        let listing = out.get_string();
        expect_that!(listing, starts_with("R0: 0x0007\nR1: 0x0000\n"));
        expect_that!(listing, ends_with("R7: 0x0000\nPC: 0x3007\nCOND: P\n"));
    }
}
