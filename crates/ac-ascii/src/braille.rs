/// Braille base codepoint (U+2800).
const BRAILLE_BASE: u32 = 0x2800;

/// Bit of each dot, indexed `[row][col]`.
///
/// Braille dot numbering (column-major, dots 7 and 8 added last):
/// ```text
///  1 4
///  2 5
///  3 6
///  7 8
/// ```
/// Dot `n` sets bit `n - 1`.
pub const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Pack a 2×4 dot block into its 8-bit mask.
///
/// # Example
/// ```
/// use ac_ascii::braille::dot_mask;
/// assert_eq!(dot_mask(&[[false; 2]; 4]), 0x00);
/// assert_eq!(dot_mask(&[[false, true]; 4]), 0xB8);
/// ```
#[must_use]
pub fn dot_mask(dots: &[[bool; 2]; 4]) -> u8 {
    let mut mask = 0u8;
    for (row, bits) in dots.iter().zip(DOT_BITS) {
        for (&on, bit) in row.iter().zip(bits) {
            if on {
                mask |= bit;
            }
        }
    }
    mask
}

/// Encode a 2×4 dot block into a Braille Unicode character.
///
/// # Example
/// ```
/// use ac_ascii::braille::encode_braille;
/// assert_eq!(encode_braille(&[[false; 2]; 4]), '\u{2800}'); // empty
/// assert_eq!(encode_braille(&[[true; 2]; 4]), '\u{28FF}'); // full
/// ```
#[must_use]
pub fn encode_braille(dots: &[[bool; 2]; 4]) -> char {
    char::from_u32(BRAILLE_BASE + u32::from(dot_mask(dots))).unwrap_or(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_dot_has_its_own_bit() {
        let mut seen = 0u8;
        for row in 0..4 {
            for col in 0..2 {
                let mut dots = [[false; 2]; 4];
                dots[row][col] = true;
                let mask = dot_mask(&dots);
                assert_eq!(mask.count_ones(), 1);
                assert_eq!(seen & mask, 0);
                seen |= mask;
            }
        }
        assert_eq!(seen, 0xFF);
    }

    #[test]
    fn left_column_is_dots_1_2_3_7() {
        assert_eq!(encode_braille(&[[true, false]; 4]), '\u{2847}');
    }

    #[test]
    fn all_256_patterns_are_distinct() {
        let mut chars = std::collections::HashSet::new();
        for mask in 0..=255u8 {
            let mut dots = [[false; 2]; 4];
            for (row, bits) in dots.iter_mut().zip(DOT_BITS) {
                for (dot, bit) in row.iter_mut().zip(bits) {
                    *dot = mask & bit != 0;
                }
            }
            assert_eq!(dot_mask(&dots), mask);
            chars.insert(encode_braille(&dots));
        }
        assert_eq!(chars.len(), 256);
    }
}
