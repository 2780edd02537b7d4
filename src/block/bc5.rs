//! The dual-channel gradient codec (BC5).
//!
//! A 16-byte block is two independent [`bc4`](super::bc4) gradient records over the
//! same pixels: the alpha view first, then the intensity view.

use super::{
    bc4::{Bc4, GradientBlock, GradientChannel},
    load_rgba8, store_rgba8, BlockCodec,
};
use crate::ColorSample;
use palette::Srgba;
use std::array;

/// The dual-channel gradient codec.
///
/// Decodes to gray with the stored intensity and alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bc5 {
    /// The first half.
    alpha: Bc4,
    /// The second half.
    intensity: Bc4,
}

impl Bc5 {
    /// Creates a codec with the default rescue threshold on both halves.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            alpha: Bc4::new(GradientChannel::Alpha),
            intensity: Bc4::new(GradientChannel::Intensity),
        }
    }

    /// Sets the rescue threshold of both halves.
    #[must_use]
    pub const fn threshold(self, threshold: u8) -> Self {
        Self {
            alpha: self.alpha.threshold(threshold),
            intensity: self.intensity.threshold(threshold),
        }
    }
}

impl Default for Bc5 {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockCodec for Bc5 {
    const BLOCK_WIDTH: usize = 4;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 16;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let alpha = GradientBlock::read(&block[..8]).values();
        let intensity = GradientBlock::read(&block[8..]).values();
        let colors: [Srgba<u8>; 16] =
            array::from_fn(|i| Srgba::new(intensity[i], intensity[i], intensity[i], alpha[i]));
        store_rgba8(&colors, 4, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let colors = load_rgba8::<C, 16>(source, stride, 4);
        self.alpha.encode_colors(&colors).write(&mut block[..8]);
        self.intensity.encode_colors(&colors).write(&mut block[8..]);
    }
}
