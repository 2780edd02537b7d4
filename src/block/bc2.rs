//! The explicit 4-bit alpha codec (BC2, also known as DXT3).
//!
//! A 16-byte block is 8 bytes of alpha nibbles followed by a [`Bc1`] color record.
//! Each alpha byte holds two horizontally adjacent pixels, the even pixel in the high nibble.
//! Alpha is narrowed to its high nibble like [`rescale_bits`](crate::scale::rescale_bits)
//! does, so the encoder output matches other shift-based encoders bit for bit.

use super::{
    bc1::{Bc1, Bc1Block},
    load_rgba8, store_rgba8, BlockCodec,
};
use crate::ColorSample;
use palette::Srgba;
use std::array;

/// Packs 16 row-major alpha values into 8 bytes of nibbles.
fn encode_alpha(colors: &[Srgba<u8>; 16], block: &mut [u8]) {
    for (byte, pair) in block.iter_mut().zip(colors.chunks_exact(2)) {
        *byte = (pair[0].alpha & 0xF0) | pair[1].alpha >> 4;
    }
}

/// Expands 8 bytes of nibbles into 16 row-major alpha values.
fn decode_alpha(block: &[u8]) -> [u8; 16] {
    array::from_fn(|i| {
        let byte = block[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0F };
        nibble * 17
    })
}

/// The explicit 4-bit alpha codec.
///
/// The color half is always encoded in 4-color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bc2;

impl Bc2 {
    /// Creates a new [`Bc2`] codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BlockCodec for Bc2 {
    const BLOCK_WIDTH: usize = 4;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 16;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let alpha = decode_alpha(&block[..8]);
        let mut colors = Bc1Block::read_le(&block[8..]).colors();
        for (color, a) in colors.iter_mut().zip(alpha) {
            color.alpha = a;
        }
        store_rgba8(&colors, 4, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let colors = load_rgba8::<C, 16>(source, stride, 4);
        encode_alpha(&colors, &mut block[..8]);
        Bc1::opaque().encode_colors(&colors).write_le(&mut block[8..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgba32;

    #[test]
    fn nibble_layout() {
        let colors = array::from_fn(|i| {
            #[allow(clippy::cast_possible_truncation)]
            let alpha = (i as u8) << 4 | 0x0F;
            Srgba::new(0, 0, 0, alpha)
        });
        let mut block = [0; 8];
        encode_alpha(&colors, &mut block);
        assert_eq!(block, [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);

        let alpha = decode_alpha(&block);
        assert_eq!(alpha[0], 0);
        assert_eq!(alpha[1], 17);
        assert_eq!(alpha[15], 255);
    }

    #[test]
    fn alpha_narrowing_truncates() {
        let mut colors = [Srgba::new(0, 0, 0, 0x7F); 16];
        colors[1].alpha = 0x80;
        let mut block = [0; 8];
        encode_alpha(&colors, &mut block);
        assert_eq!(block[0], 0x78);
        assert_eq!(&decode_alpha(&block)[..2], &[119, 136]);
    }

    #[test]
    fn alpha_is_independent_of_color() {
        let source: [Rgba32; 16] = array::from_fn(|i| {
            #[allow(clippy::cast_possible_truncation)]
            let alpha = (i as u8) * 17;
            Rgba32::new(0, 130, 0, alpha)
        });

        let mut block = [0; 16];
        Bc2::new().encode_block(&source, 4, &mut block);
        let mut decoded = [Rgba32::default(); 16];
        Bc2::new().decode_block(&block, &mut decoded, 4);

        assert_eq!(decoded, source);
        let record = Bc1Block::read_le(&block[8..]);
        assert!(record.color0 > record.color1);
    }
}
