//! The interpolated alpha codec (BC3, also known as DXT5).
//!
//! A 16-byte block is a gradient alpha record (see [`bc4`](super::bc4)) followed by
//! a [`Bc1`] color record in 4-color mode.

use super::{
    bc1::{Bc1, Bc1Block},
    bc4::{GradientBlock, GRADIENT_RESCUE_THRESHOLD},
    load_rgba8, store_rgba8, BlockCodec,
};
use crate::ColorSample;

/// The interpolated alpha codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bc3 {
    /// The rescue threshold of the alpha half.
    threshold: u8,
}

impl Bc3 {
    /// Creates a codec with the default alpha rescue threshold.
    #[must_use]
    pub const fn new() -> Self {
        Self { threshold: GRADIENT_RESCUE_THRESHOLD }
    }

    /// Sets the rescue threshold of the alpha half.
    #[must_use]
    pub const fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }
}

impl Default for Bc3 {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockCodec for Bc3 {
    const BLOCK_WIDTH: usize = 4;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 16;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let alpha = GradientBlock::read(&block[..8]).values();
        let mut colors = Bc1Block::read_le(&block[8..]).colors();
        for (color, a) in colors.iter_mut().zip(alpha) {
            color.alpha = a;
        }
        store_rgba8(&colors, 4, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let colors = load_rgba8::<C, 16>(source, stride, 4);
        GradientBlock::encode(&colors.map(|c| c.alpha), self.threshold).write(&mut block[..8]);
        Bc1::opaque().encode_colors(&colors).write_le(&mut block[8..]);
    }
}
