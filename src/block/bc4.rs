//! The single-channel gradient codec (BC4), also used for the alpha of BC3 and both halves of BC5.
//!
//! Each 4×4 block stores two 8-bit reference values and a 3-bit level index per pixel.
//! The order of the references selects the levels:
//! - `left > right`: the references and six interpolants at sevenths.
//! - `left <= right`: the references, four interpolants at fifths, then `0` and `255`.
//!
//! A block is one little-endian `u64`: `left` in bits 0-7, `right` in bits 8-15,
//! and pixel `i` (row-major) in bits `16 + 3i..16 + 3i + 3`.

use super::{load_rgba8, store_rgba8, BlockCodec};
use crate::{color::luma_709_8, ColorSample};
use bitvec::prelude::*;
use palette::Srgba;
use std::array;

/// Values at or inside this distance of `0` or `255` are treated as outliers by the rescue heuristic.
///
/// Kept for bit-compatibility with existing encoders.
pub const GRADIENT_RESCUE_TOLERANCE: u8 = 5;

/// The default distance from `0` and `255` a value must exceed to be part of the rescued range.
///
/// Kept for bit-compatibility with existing encoders.
pub const GRADIENT_RESCUE_THRESHOLD: u8 = 16;

/// The eight reconstruction levels of a block.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn levels(left: u8, right: u8) -> [u8; 8] {
    let (l, r) = (u16::from(left), u16::from(right));
    if left > right {
        let mix = |i: u16| (((7 - i) * l + i * r + 3) / 7) as u8;
        [left, right, mix(1), mix(2), mix(3), mix(4), mix(5), mix(6)]
    } else {
        let mix = |i: u16| (((5 - i) * l + i * r + 2) / 5) as u8;
        [left, right, mix(1), mix(2), mix(3), mix(4), 0, u8::MAX]
    }
}

/// One gradient record: two references and a level index per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct GradientBlock {
    /// The first reference value.
    pub(crate) left: u8,
    /// The second reference value.
    pub(crate) right: u8,
    /// The 3-bit level index of each pixel, row-major.
    pub(crate) indices: [u8; 16],
}

impl GradientBlock {
    /// Chooses references and indices for 16 row-major values.
    ///
    /// Normally the block spans `max..=min` in 8-level mode. When the block reaches
    /// within [`GRADIENT_RESCUE_TOLERANCE`] of both `0` and `255` and has values strictly
    /// between `threshold` and `255 - threshold`, the references become the range of those
    /// mid values instead, in 6-level mode, where `0` and `255` are still exact levels.
    pub(crate) fn encode(values: &[u8; 16], threshold: u8) -> Self {
        let (mut min, mut max) = (u8::MAX, u8::MIN);
        let mut inner: Option<(u8, u8)> = None;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            if threshold < v && v < u8::MAX - threshold {
                inner = Some(inner.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))));
            }
        }

        let (left, right) = match inner {
            Some((lo, hi))
                if min <= GRADIENT_RESCUE_TOLERANCE && max >= u8::MAX - GRADIENT_RESCUE_TOLERANCE =>
            {
                (lo, hi)
            }
            _ => (max, min),
        };

        let levels = levels(left, right);
        #[allow(clippy::cast_possible_truncation)]
        let indices = values.map(|v| {
            levels
                .iter()
                .enumerate()
                .min_by_key(|&(_, &level)| level.abs_diff(v))
                .map_or(0, |(i, _)| i as u8)
        });

        Self { left, right, indices }
    }

    /// Reads a record from 8 bytes.
    pub(crate) fn read(block: &[u8]) -> Self {
        let bits = block[2..8].view_bits::<Lsb0>();
        Self {
            left: block[0],
            right: block[1],
            indices: array::from_fn(|i| bits[3 * i..3 * i + 3].load_le()),
        }
    }

    /// Writes a record to 8 bytes.
    pub(crate) fn write(&self, block: &mut [u8]) {
        block[0] = self.left;
        block[1] = self.right;
        let bits = block[2..8].view_bits_mut::<Lsb0>();
        for (chunk, &index) in bits.chunks_exact_mut(3).zip(&self.indices) {
            chunk.store_le(index);
        }
    }

    /// The 16 decoded values.
    pub(crate) fn values(&self) -> [u8; 16] {
        let levels = levels(self.left, self.right);
        self.indices.map(|i| levels[usize::from(i)])
    }
}

/// The channel a gradient codec reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GradientChannel {
    /// Alpha. Decodes to black with the stored alpha.
    Alpha,
    /// BT.709 luminance. Decodes to opaque gray.
    #[default]
    Intensity,
    /// Red. Decodes to opaque red.
    Red,
    /// Green. Decodes to opaque green.
    Green,
}

impl GradientChannel {
    /// Projects a color onto this channel.
    pub(crate) fn project(self, color: Srgba<u8>) -> u8 {
        match self {
            Self::Alpha => color.alpha,
            Self::Intensity => luma_709_8(color.red, color.green, color.blue),
            Self::Red => color.red,
            Self::Green => color.green,
        }
    }

    /// The color a decoded value stands for.
    pub(crate) fn unproject(self, value: u8) -> Srgba<u8> {
        match self {
            Self::Alpha => Srgba::new(0, 0, 0, value),
            Self::Intensity => Srgba::new(value, value, value, u8::MAX),
            Self::Red => Srgba::new(value, 0, 0, u8::MAX),
            Self::Green => Srgba::new(0, value, 0, u8::MAX),
        }
    }
}

/// The single-channel gradient codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bc4 {
    /// The channel that is stored.
    channel: GradientChannel,
    /// See [`GRADIENT_RESCUE_THRESHOLD`].
    threshold: u8,
}

impl Bc4 {
    /// Creates a codec over `channel` with the default rescue threshold.
    #[must_use]
    pub const fn new(channel: GradientChannel) -> Self {
        Self { channel, threshold: GRADIENT_RESCUE_THRESHOLD }
    }

    /// Sets the rescue threshold.
    #[must_use]
    pub const fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// The channel this codec stores.
    #[must_use]
    pub const fn channel(&self) -> GradientChannel {
        self.channel
    }

    /// Encodes one channel of 16 row-major colors.
    pub(crate) fn encode_colors(&self, colors: &[Srgba<u8>; 16]) -> GradientBlock {
        GradientBlock::encode(&colors.map(|c| self.channel.project(c)), self.threshold)
    }
}

impl Default for Bc4 {
    fn default() -> Self {
        Self::new(GradientChannel::default())
    }
}

impl BlockCodec for Bc4 {
    const BLOCK_WIDTH: usize = 4;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 8;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let colors = GradientBlock::read(block).values().map(|v| self.channel.unproject(v));
        store_rgba8(&colors, 4, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        self.encode_colors(&load_rgba8::<C, 16>(source, stride, 4)).write(block);
    }
}
