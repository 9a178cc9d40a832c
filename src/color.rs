//! The six ink colors and their packing into image bytes.
//!
//! Image data is 4 bits per pixel. Each byte carries two horizontally adjacent pixels: the high
//! nibble is the even (left) pixel and the low nibble the odd (right) pixel.

use core::convert::TryFrom;

use itertools::Itertools;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0x0,
    White = 0x1,
    Yellow = 0x2,
    Red = 0x3,
    Blue = 0x4,
    Green = 0x5,
}

impl Color {
    /// Every color, in code order.
    pub const ALL: [Color; 6] = [
        Color::Black,
        Color::White,
        Color::Yellow,
        Color::Red,
        Color::Blue,
        Color::Green,
    ];

    /// The 4-bit code the controller expects for this color.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// A byte with this color in both pixels.
    pub fn packed(self) -> u8 {
        pack(self, self)
    }
}

/// A nibble value that is not one of the six color codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidColor(pub u8);

impl TryFrom<u8> for Color {
    type Error = InvalidColor;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Color::ALL
            .get(code as usize)
            .cloned()
            .ok_or(InvalidColor(code))
    }
}

/// Pack a left (even x) and right (odd x) pixel into one byte.
pub fn pack(left: Color, right: Color) -> u8 {
    left.code() << 4 | right.code()
}

/// Split a packed byte into its left and right nibbles.
pub fn unpack(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

/// Replace one pixel of a packed byte, keeping the other nibble.
pub fn with_pixel(byte: u8, odd: bool, color: Color) -> u8 {
    if odd {
        (byte & 0xF0) | color.code()
    } else {
        (byte & 0x0F) | color.code() << 4
    }
}

/// Pack a run of pixels, two per byte, into `out`. Returns the number of bytes written, which is
/// the smaller of `out.len()` and `colors.len() / 2`. A trailing odd pixel is dropped.
pub fn pack_row(colors: &[Color], out: &mut [u8]) -> usize {
    let mut written = 0;
    for (slot, (l, r)) in out.iter_mut().zip(colors.iter().tuples::<(_, _)>()) {
        *slot = pack(*l, *r);
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn codes() {
        let codes: Vec<u8> = Color::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn packed_single_color_both_nibbles() {
        for c in Color::ALL.iter() {
            let b = c.packed();
            assert_eq!(unpack(b), (c.code(), c.code()));
        }
        assert_eq!(Color::Green.packed(), 0x55);
        assert_eq!(Color::White.packed(), 0x11);
    }

    #[test]
    fn left_pixel_is_high_nibble() {
        assert_eq!(pack(Color::Red, Color::Blue), 0x34);
    }

    #[test]
    fn try_from_rejects_undefined_codes() {
        assert_eq!(Color::try_from(2), Ok(Color::Yellow));
        assert_eq!(Color::try_from(6), Err(InvalidColor(6)));
        assert_eq!(Color::try_from(0xF), Err(InvalidColor(0xF)));
    }

    #[test]
    fn with_pixel_keeps_neighbor() {
        let b = Color::Black.packed();
        assert_eq!(with_pixel(b, false, Color::White), 0x10);
        assert_eq!(with_pixel(b, true, Color::White), 0x01);
        assert_eq!(with_pixel(0x23, true, Color::Green), 0x25);
    }

    #[test]
    fn pack_row_pairs() {
        let mut out = [0xFFu8; 3];
        let n = pack_row(
            &[Color::Black, Color::White, Color::Yellow, Color::Red, Color::Blue],
            &mut out,
        );
        assert_eq!(n, 2);
        assert_eq!(out, [0x01, 0x23, 0xFF]);
    }

    fn any_color() -> impl Strategy<Value = Color> {
        (0u8..6).prop_map(|c| Color::ALL[c as usize])
    }

    proptest! {
        #[test]
        fn pack_unpack(l in any_color(), r in any_color()) {
            prop_assert_eq!(unpack(pack(l, r)), (l.code(), r.code()));
        }

        #[test]
        fn packed_nibbles_stay_in_range(l in any_color(), r in any_color()) {
            let (hi, lo) = unpack(pack(l, r));
            prop_assert!(hi <= 5 && lo <= 5);
        }
    }
}
