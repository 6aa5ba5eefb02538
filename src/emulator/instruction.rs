use crate::hardware::registers::Reg;
use crate::numbers::sign_extend;
use std::fmt::{Debug, Formatter};

/// Wrapper for a raw LC-3 u16 instruction word with accessors for its bit fields.
/// Common format is: `OOOO_DDD_SSS_PPPPPP`
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct InstructionWord(u16);

impl InstructionWord {
    /// Gives the value of only the specified bit range.
    ///
    /// # Parameters
    /// - `from`: starting index
    /// - `to`: end index (inclusive), mut be greater or equal to `from`
    ///
    /// # Panics
    /// - asserts that to is greater or equal from and both are valid indexes
    #[must_use]
    pub fn get_bit_range(self, from: u8, to: u8) -> u16 {
        debug_assert!(
            to >= from,
            "wrong direction of from: {from:?} and to: {to:?}"
        );
        debug_assert!(
            (0..u16::BITS).contains(&u32::from(to)),
            "index: {to:?} to u16 is greater than maximum value {:?}",
            u16::BITS - 1
        );
        let width = u32::from(to - from + 1);
        let mask = u16::try_from((1u32 << width) - 1).unwrap_or(u16::MAX);
        (self.0 >> from) & mask
    }
    #[must_use]
    pub fn get_bit(self, index: u8) -> bool {
        self.get_bit_range(index, index) & 1 != 0
    }
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "only 4 bits are left after shifting"
    )]
    pub const fn op_code(self) -> u8 {
        (self.0 >> 12) as u8
    }
    #[must_use]
    pub fn dr(self) -> Reg {
        Reg::from_field(self.get_bit_range(9, 11))
    }
    #[must_use]
    pub fn sr1(self) -> Reg {
        Reg::from_field(self.get_bit_range(6, 8))
    }
    #[must_use]
    pub fn sr2(self) -> Reg {
        Reg::from_field(self.get_bit_range(0, 2))
    }
    #[must_use]
    pub fn is_immediate(self) -> bool {
        self.get_bit(5)
    }
    #[must_use]
    pub fn immediate(self) -> u16 {
        sign_extend(self.get_bit_range(0, 4), 5)
    }
    /// Sign extended offset over the lowest `len` bits, as a 16 bit two's complement value.
    #[must_use]
    pub fn offset(self, len: u8) -> u16 {
        sign_extend(self.get_bit_range(0, len - 1), len)
    }
    #[must_use]
    pub fn nzp(self) -> u16 {
        self.get_bit_range(9, 11)
    }
    #[must_use]
    #[expect(clippy::cast_possible_truncation, reason = "masked to 8 bits")]
    pub const fn trap_vector(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl Debug for InstructionWord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06X} ({:016b})", self.0, self.0)
    }
}

impl From<u16> for InstructionWord {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

/// Second operand of `ADD` and `AND`, selected by bit 5.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Register(Reg),
    /// Already sign extended `imm5`
    Immediate(u16),
}

/// Destination of `JSR` (bit 11 set) or `JSRR`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JsrTarget {
    /// Already sign extended `PCoffset11`
    Offset(u16),
    Register(Reg),
}

/// A decoded instruction, one variant per opcode.
///
/// All offsets and immediates are sign extended during decoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Br { nzp: u16, offset: u16 },
    Add { dr: Reg, sr1: Reg, operand: Operand },
    Ld { dr: Reg, offset: u16 },
    St { sr: Reg, offset: u16 },
    Jsr { target: JsrTarget },
    And { dr: Reg, sr1: Reg, operand: Operand },
    Ldr { dr: Reg, base: Reg, offset: u16 },
    Str { sr: Reg, base: Reg, offset: u16 },
    Rti,
    Not { dr: Reg, sr: Reg },
    Ldi { dr: Reg, offset: u16 },
    Sti { sr: Reg, offset: u16 },
    Jmp { base: Reg },
    Reserved,
    Lea { dr: Reg, offset: u16 },
    Trap { vector: u8 },
}

impl Instruction {
    #[must_use]
    pub fn decode(word: InstructionWord) -> Self {
        let operand = || {
            if word.is_immediate() {
                Operand::Immediate(word.immediate())
            } else {
                Operand::Register(word.sr2())
            }
        };
        match word.op_code() {
            0b0000 => Self::Br {
                nzp: word.nzp(),
                offset: word.offset(9),
            },
            0b0001 => Self::Add {
                dr: word.dr(),
                sr1: word.sr1(),
                operand: operand(),
            },
            0b0010 => Self::Ld {
                dr: word.dr(),
                offset: word.offset(9),
            },
            0b0011 => Self::St {
                sr: word.dr(),
                offset: word.offset(9),
            },
            0b0100 => Self::Jsr {
                target: if word.get_bit(11) {
                    JsrTarget::Offset(word.offset(11))
                } else {
                    JsrTarget::Register(word.sr1())
                },
            },
            0b0101 => Self::And {
                dr: word.dr(),
                sr1: word.sr1(),
                operand: operand(),
            },
            0b0110 => Self::Ldr {
                dr: word.dr(),
                base: word.sr1(),
                offset: word.offset(6),
            },
            0b0111 => Self::Str {
                sr: word.dr(),
                base: word.sr1(),
                offset: word.offset(6),
            },
            0b1000 => Self::Rti,
            0b1001 => Self::Not {
                dr: word.dr(),
                sr: word.sr1(),
            },
            0b1010 => Self::Ldi {
                dr: word.dr(),
                offset: word.offset(9),
            },
            0b1011 => Self::Sti {
                sr: word.dr(),
                offset: word.offset(9),
            },
            0b1100 => Self::Jmp { base: word.sr1() },
            0b1101 => Self::Reserved,
            0b1110 => Self::Lea {
                dr: word.dr(),
                offset: word.offset(9),
            },
            _ => Self::Trap {
                vector: word.trap_vector(),
            },
        }
    }
}

impl From<u16> for Instruction {
    fn from(bits: u16) -> Self {
        Self::decode(InstructionWord::from(bits))
    }
}

#[expect(clippy::unusual_byte_groupings)]
#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_instr_get_bit_range_valid() {
        let sut = InstructionWord::from(0b1010_101_001010101);
        expect_that!(sut.op_code(), eq(0b1010));
        expect_that!(sut.dr(), eq(Reg::R5));
        expect_that!(sut.offset(9), eq(0b0_0101_0101));

        // Add: DR: 3, SR1: 2, Immediate: false, SR2: 1
        let sut = InstructionWord::from(0b0001_011_010_0_00_001);
        expect_that!(sut.op_code(), eq(1));
        expect_that!(sut.dr(), eq(Reg::R3));
        expect_that!(sut.sr1(), eq(Reg::R2));
        expect_that!(sut.sr2(), eq(Reg::R1));
        expect_that!(sut.is_immediate(), eq(false));

        // Add: DR: 7, SR1: 0, Immediate: true, imm5: 14
        let sut = InstructionWord::from(0b0001_111_000_1_01110);
        expect_that!(sut.dr(), eq(Reg::R7));
        expect_that!(sut.sr1(), eq(Reg::R0));
        expect_that!(sut.is_immediate(), eq(true));
        expect_that!(sut.immediate(), eq(14));
        expect_that!(sut.get_bit_range(0, 15), eq(0b0001_111_000_1_01110));
    }
    #[gtest]
    #[should_panic(expected = "wrong direction of from: 2 and to: 1")]
    pub fn test_instr_get_bit_range_wrong_order() {
        let sut = InstructionWord::from(0b1010_101_101010101);
        let _ = sut.get_bit_range(2, 1);
    }
    #[gtest]
    #[should_panic(expected = "index: 16 to u16 is greater than maximum value 15")]
    pub fn test_instr_get_bit_range_index_too_large() {
        let sut = InstructionWord::from(0b1010_101_101010101);
        let _ = sut.get_bit_range(2, 16);
    }
    #[gtest]
    pub fn test_decode_operand_modes() {
        expect_that!(
            Instruction::from(0b0001_010_000_0_00_001),
            eq(Instruction::Add {
                dr: Reg::R2,
                sr1: Reg::R0,
                operand: Operand::Register(Reg::R1)
            })
        );
        // imm5 -2
        expect_that!(
            Instruction::from(0b0101_011_010_1_11110),
            eq(Instruction::And {
                dr: Reg::R3,
                sr1: Reg::R2,
                operand: Operand::Immediate(0xFFFE)
            })
        );
    }
    #[gtest]
    pub fn test_decode_offsets_are_sign_extended() {
        expect_that!(
            Instruction::from(0b0000_111_111111111),
            eq(Instruction::Br {
                nzp: 0b111,
                offset: 0xFFFF
            })
        );
        expect_that!(
            Instruction::from(0b0110_010_110_100000),
            eq(Instruction::Ldr {
                dr: Reg::R2,
                base: Reg::R6,
                offset: 0xFFE0
            })
        );
        expect_that!(
            Instruction::from(0b0100_1_10000000000),
            eq(Instruction::Jsr {
                target: JsrTarget::Offset(0xFC00)
            })
        );
        expect_that!(
            Instruction::from(0b0100_0_00_011_000000),
            eq(Instruction::Jsr {
                target: JsrTarget::Register(Reg::R3)
            })
        );
    }
    #[gtest]
    pub fn test_decode_every_opcode() {
        let decoded: Vec<Instruction> = (0u16..16).map(|op| Instruction::from(op << 12)).collect();
        expect_that!(decoded[0b1000], eq(Instruction::Rti));
        expect_that!(decoded[0b1101], eq(Instruction::Reserved));
        expect_that!(decoded[0b1100], eq(Instruction::Jmp { base: Reg::R0 }));
        expect_that!(decoded[0b1111], eq(Instruction::Trap { vector: 0 }));
        expect_that!(
            Instruction::from(0xF025),
            eq(Instruction::Trap { vector: 0x25 })
        );
    }
}
