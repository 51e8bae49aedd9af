//! Index ↔ color codec for the pick surface.

use crate::shapes::Rgb8;

/// Encode a registry index as a pick color.
///
/// The stored value is `index + 1` spread over the 24-bit RGB channels, so
/// index 0 maps to a non-black color and black stays reserved for misses.
/// Indices must fit in 24 bits minus the offset.
pub fn index_to_color(index: usize) -> Rgb8 {
    let value = index as u32 + 1;
    debug_assert!(value < (1 << 24), "pick index out of range: {index}");
    Rgb8::from_packed(value)
}

/// Decode a sampled pick color back to a registry index.
///
/// Black decodes to `None` (no shape under the pointer).
pub fn color_to_index(color: Rgb8) -> Option<usize> {
    let value = color.packed();
    if value == 0 {
        None
    } else {
        Some((value - 1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for index in [0, 1, 255, 256, 65535, 65536, (1 << 24) - 2] {
            assert_eq!(color_to_index(index_to_color(index)), Some(index));
        }
    }

    #[test]
    fn test_black_is_reserved() {
        assert_eq!(color_to_index(Rgb8::black()), None);
        assert_ne!(index_to_color(0), Rgb8::black());
    }

    #[test]
    fn test_channel_layout() {
        // Index 255 encodes as value 256 = green channel 1.
        assert_eq!(index_to_color(255), Rgb8::new(0, 1, 0));
    }
}
