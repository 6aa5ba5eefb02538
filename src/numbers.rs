/// Implements sign extension as described at [Sign extension](https://en.wikipedia.org/wiki/Sign_extension).
///
/// `bits` is treated as a `valid_bits` wide two's complement field, anything above that
/// width is masked off before extending.
#[must_use]
pub const fn sign_extend(bits: u16, valid_bits: u8) -> u16 {
    debug_assert!(valid_bits > 0 && valid_bits <= 16);
    if valid_bits >= 16 {
        return bits;
    }
    let field = bits & ((1 << valid_bits) - 1);
    let most_significant_bit = field >> (valid_bits - 1);
    if most_significant_bit == 1 {
        // negative: 1-extend
        field | (0xFFFF << valid_bits)
    } else {
        // positive, already 0-extended
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use yare::parameterized;

    #[parameterized(
        imm5 = { 5 },
        offset6 = { 6 },
        pc_offset9 = { 9 },
        pc_offset11 = { 11 },
    )]
    fn test_sign_extend_positive_fields_unchanged(width: u8) {
        for v in 0..(1u16 << (width - 1)) {
            assert_that!(sign_extend(v, width), eq(v));
        }
    }

    #[parameterized(
        imm5 = { 5 },
        offset6 = { 6 },
        pc_offset9 = { 9 },
        pc_offset11 = { 11 },
    )]
    fn test_sign_extend_negative_fields(width: u8) {
        for v in (1u16 << (width - 1))..(1u16 << width) {
            let expected = i32::from(v) - (1 << width);
            assert_that!(
                i32::from(sign_extend(v, width).cast_signed()),
                eq(expected),
                "width {width}, field {v:#b}"
            );
        }
    }

    #[gtest]
    fn test_sign_extend_ignores_bits_above_field() {
        expect_that!(sign_extend(0b1110_0000_0001_1111, 5), eq(0xFFFF));
        expect_that!(sign_extend(0b1111_1111_1100_0001, 6), eq(1));
    }
}
