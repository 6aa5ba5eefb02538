//! Implemented operations for the LC 3.
//!
//! Every handler runs after the program counter was already advanced past the instruction
//! being executed, so PC relative addresses are relative to the following instruction.
use crate::emulator::instruction::{JsrTarget, Operand};
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Reg, Registers};

fn operand_value(operand: Operand, r: &Registers) -> u16 {
    match operand {
        Operand::Register(sr2) => r.get(sr2),
        Operand::Immediate(imm) => imm,
    }
}

/// ADD: Mathematical addition in 2 variants
/// - DR is set with result of SR 1 + SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0001 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 + sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0001 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn add(dr: Reg, sr1: Reg, operand: Operand, r: &mut Registers) {
    r.set(dr, r.get(sr1).wrapping_add(operand_value(operand, r)));
    r.update_conditional_register(dr);
}
/// AND: bit-wise AND in 2 variants
/// - DR is set with result of SR 1 AND SR 2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0101 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set with result of SR 1 AND sign extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0101 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn and(dr: Reg, sr1: Reg, operand: Operand, r: &mut Registers) {
    r.set(dr, r.get(sr1) & operand_value(operand, r));
    r.update_conditional_register(dr);
}

/// NOT: bit-wise complement of the value in SR 1
/// ```text
///  15__12__11_9__8_6___5___0_
/// | 1001 |  DR | SR1 | 11111 |
///  --------------------------
/// ```
pub fn not(dr: Reg, sr: Reg, r: &mut Registers) {
    r.set(dr, !r.get(sr));
    r.update_conditional_register(dr);
}
/// BR: Conditional Branch
/// Adds the sign extended offset to PC if the current [`ConditionFlag`] is one of the
/// `n`, `z` or `p` bits set in the instruction. A mask of `000` never branches.
/// ```text
///  15__12__11_9___8_______0_
/// | 0000 |  nzp | PCoffset9 |
///  -------------------------
/// ```
/// [`ConditionFlag`]: crate::hardware::registers::ConditionFlag
pub fn br(nzp: u16, offset: u16, r: &mut Registers) {
    if r.get_conditional_register().bits() & nzp != 0 {
        r.set_pc(r.pc().wrapping_add(offset));
    }
}
/// JSR: Jump to Sub-Routine.
/// Two variants:
/// - JSR to `PCOffset11`
/// ```text
///  15__12__11_10_________0
/// | 0100 | 1 | PCOffset11 |
///  -----------------------
/// ```
/// - JSRR: JSR to location in `BaseR`
/// ```text
///  15__12__11_9__8___6___5____0_
/// | 0100 | 000 | BaseR | 000000 |
///  -----------------------------
/// ```
/// The former PC is saved in R7 before the target is evaluated, `JSRR R7` therefore jumps
/// to the return address it just saved.
pub fn jsr(target: JsrTarget, r: &mut Registers) {
    r.set(Reg::LINK, r.pc());
    r.set_pc(match target {
        JsrTarget::Offset(offset) => r.pc().wrapping_add(offset),
        JsrTarget::Register(base) => r.get(base),
    });
}
/// JMP or RET operation.
/// - JMP sets the PC to the value of register `BaseR`
/// ```text
///  15__12__11_9___8_6____5____0_
/// | 1100 | 000 | BaseR | 000000 |
///  -----------------------------
/// ```
/// - RET same as JMP, but special case for returning from JSR where former PC is saved in R7.
pub fn jmp_or_ret(base: Reg, r: &mut Registers) {
    r.set_pc(r.get(base));
}

fn address_by_pc_offset(offset: u16, r: &Registers) -> u16 {
    r.pc().wrapping_add(offset)
}
fn address_by_baser_offset(base: Reg, offset: u16, r: &Registers) -> u16 {
    r.get(base).wrapping_add(offset)
}

/// LD: Loads content of memory address of PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 0010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn ld(dr: Reg, offset: u16, r: &mut Registers, memory: &Memory) {
    r.set(dr, memory[address_by_pc_offset(offset, r)]);
    r.update_conditional_register(dr);
}

/// LDI: Load indirect.
/// Calculates memory address of PC + sign extended offset and reads another address from there,
/// the content of the memory at that indirectly loaded address is put into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn ldi(dr: Reg, offset: u16, r: &mut Registers, memory: &Memory) {
    let value_address = memory[address_by_pc_offset(offset, r)];
    r.set(dr, memory[value_address]);
    r.update_conditional_register(dr);
}
/// LDR: Load address from base register and adds sign extended offset to load the memory content
/// from there into DR.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0110 |  DR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn ldr(dr: Reg, base: Reg, offset: u16, r: &mut Registers, memory: &Memory) {
    r.set(dr, memory[address_by_baser_offset(base, offset, r)]);
    r.update_conditional_register(dr);
}

/// LEA: Load Effective Address loads PC + sign extended offset into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1110 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn lea(dr: Reg, offset: u16, r: &mut Registers) {
    r.set(dr, address_by_pc_offset(offset, r));
    r.update_conditional_register(dr);
}
/// ST: Store. The contents of the SR are written to memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 0011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn st(sr: Reg, offset: u16, r: &Registers, memory: &mut Memory) {
    memory[address_by_pc_offset(offset, r)] = r.get(sr);
}
/// STI: Store Indirect. The contents of the SR are written to the address which is loaded from
/// memory address PC + sign extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 1011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn sti(sr: Reg, offset: u16, r: &Registers, memory: &mut Memory) {
    let store_address = memory[address_by_pc_offset(offset, r)];
    memory[store_address] = r.get(sr);
}
/// STR: Store contents of SR to memory address of base register plus sign extended offset.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0111 |  SR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn str(sr: Reg, base: Reg, offset: u16, r: &Registers, memory: &mut Memory) {
    memory[address_by_baser_offset(base, offset, r)] = r.get(sr);
}
