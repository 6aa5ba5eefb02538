use std::fmt::{Display, Formatter};

/// General purpose register id as encoded in a 3 bit instruction field.
#[repr(u8)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Reg {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    /// R0 doubles as operand and result register of the trap routines.
    pub const IO: Self = Self::R0;
    /// R7 receives the return address of `JSR`/`JSRR`.
    pub const LINK: Self = Self::R7;
    pub const ALL: [Self; 8] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    /// Decodes the lowest 3 bits of `bits`, every value is a valid register.
    #[must_use]
    pub const fn from_field(bits: u16) -> Self {
        Self::ALL[(bits & 0b111) as usize]
    }
}

impl Display for Reg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", *self as u8)
    }
}

/// The register file: eight general purpose registers, the program counter and the
/// condition register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    general_purpose: [u16; 8],
    pc: u16,
    cond: ConditionFlag,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub const fn new() -> Self {
        Self {
            general_purpose: [0u16; 8],
            pc: 0,
            cond: ConditionFlag::Zero,
        }
    }

    pub const fn get(&self, r: Reg) -> u16 {
        self.general_purpose[r as usize]
    }
    pub const fn set(&mut self, r: Reg, value: u16) {
        self.general_purpose[r as usize] = value;
    }
    pub const fn pc(&self) -> u16 {
        self.pc
    }
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }
    /// Advances the program counter past the instruction just fetched.
    pub const fn increment_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    pub const fn get_conditional_register(&self) -> ConditionFlag {
        self.cond
    }
    /// Overwrites the condition register according to the current value of `r`.
    pub fn update_conditional_register(&mut self, r: Reg) {
        self.cond = ConditionFlag::from(self.get(r));
    }
}

/// Exactly one of these is held by the condition register at any time.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    Pos = 1 << 0, // Positive
    Zero = 1 << 1,
    Neg = 1 << 2, // Negative
}

impl ConditionFlag {
    /// Bit representation matching the `nzp` mask of the `BR` instruction.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self as u16
    }
}

impl From<u16> for ConditionFlag {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Zero
        } else if value >> 15 == 1 {
            // leftmost bit is 1 for negative numbers
            Self::Neg
        } else {
            Self::Pos
        }
    }
}

impl Display for ConditionFlag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pos => "P",
            Self::Zero => "Z",
            Self::Neg => "N",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use yare::parameterized;

    #[parameterized(
        zero = { 0, ConditionFlag::Zero },
        one = { 1, ConditionFlag::Pos },
        largest_positive = { 0x7FFF, ConditionFlag::Pos },
        smallest_negative = { 0x8000, ConditionFlag::Neg },
        minus_one = { 0xFFFF, ConditionFlag::Neg },
    )]
    fn test_condition_flag_from_value(value: u16, expected: ConditionFlag) {
        let mut regs = Registers::new();
        regs.set(Reg::R3, value);
        regs.update_conditional_register(Reg::R3);
        assert_that!(regs.get_conditional_register(), eq(expected));
        assert_that!(regs.get_conditional_register().bits().count_ones(), eq(1));
    }

    #[gtest]
    fn test_new_registers_hold_zero_flag() {
        let regs = Registers::new();
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Zero));
        expect_that!(regs.pc(), eq(0));
        for r in Reg::ALL {
            expect_that!(regs.get(r), eq(0));
        }
    }

    #[gtest]
    fn test_register_from_field_uses_lowest_bits() {
        expect_that!(Reg::from_field(0b000), eq(Reg::R0));
        expect_that!(Reg::from_field(0b101), eq(Reg::R5));
        expect_that!(Reg::from_field(0b1111), eq(Reg::R7));
        for (idx, r) in Reg::ALL.into_iter().enumerate() {
            expect_that!(Reg::from_field(u16::try_from(idx).unwrap() | 0b1000), eq(r));
        }
    }

    #[gtest]
    fn test_increment_pc_wraps() {
        let mut regs = Registers::new();
        regs.set_pc(0xFFFF);
        regs.increment_pc();
        expect_that!(regs.pc(), eq(0));
    }
}
