//! The uncompressed GameCube/Wii tile formats.
//!
//! These only reorder bits: each tile is stored row-major with no interpolation.
//! Intensity is the BT.709 luminance of the source color, and 4-bit values are the
//! high nibble of the 8-bit value, expanded back by `nibble * 17`. Narrowing truncates
//! rather than rounds, which keeps tiles byte-identical to other shift-based encoders.
//!
//! | Codec           | Tile | Bytes | Pixel layout                         |
//! |-----------------|------|-------|--------------------------------------|
//! | [`I4`]          | 8×1  | 4     | intensity nibbles, even pixel high   |
//! | [`I8`]          | 8×4  | 32    | intensity byte                       |
//! | [`Ia4`]         | 8×4  | 32    | alpha nibble high, intensity low     |
//! | [`Ia8`]         | 4×4  | 32    | alpha byte, intensity byte           |
//! | [`Rgba32Split`] | 4×4  | 64    | `AR` pairs, then `GB` pairs          |

use super::{load_rgba8, store_rgba8, BlockCodec};
use crate::{color::luma_709_8, ColorSample};
use palette::Srgba;
use std::array;

/// The high nibble of an 8-bit value.
#[inline]
const fn narrow_4(value: u8) -> u8 {
    value >> 4
}

/// Expands a nibble to 8 bits by replication.
#[inline]
const fn widen_4(nibble: u8) -> u8 {
    (nibble & 0x0F) * 17
}

/// The BT.709 luminance of a color.
#[inline]
fn intensity(color: Srgba<u8>) -> u8 {
    luma_709_8(color.red, color.green, color.blue)
}

/// A gray color.
#[inline]
const fn gray(intensity: u8, alpha: u8) -> Srgba<u8> {
    Srgba::new(intensity, intensity, intensity, alpha)
}

/// 4-bit intensity, two pixels per byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I4;

impl BlockCodec for I4 {
    const BLOCK_WIDTH: usize = 8;
    const BLOCK_HEIGHT: usize = 1;
    const BYTES_PER_BLOCK: usize = 4;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let colors: [Srgba<u8>; 8] = array::from_fn(|i| {
            let byte = block[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte };
            gray(widen_4(nibble), u8::MAX)
        });
        store_rgba8(&colors, 8, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let colors = load_rgba8::<C, 8>(source, stride, 8);
        for (byte, pair) in block.iter_mut().zip(colors.chunks_exact(2)) {
            *byte = narrow_4(intensity(pair[0])) << 4 | narrow_4(intensity(pair[1]));
        }
    }
}

/// 8-bit intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I8;

impl BlockCodec for I8 {
    const BLOCK_WIDTH: usize = 8;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 32;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let colors: [Srgba<u8>; 32] = array::from_fn(|i| gray(block[i], u8::MAX));
        store_rgba8(&colors, 8, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let colors = load_rgba8::<C, 32>(source, stride, 8);
        for (byte, color) in block.iter_mut().zip(colors) {
            *byte = intensity(color);
        }
    }
}

/// 4-bit alpha and 4-bit intensity in one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ia4;

impl BlockCodec for Ia4 {
    const BLOCK_WIDTH: usize = 8;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 32;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let colors: [Srgba<u8>; 32] =
            array::from_fn(|i| gray(widen_4(block[i]), widen_4(block[i] >> 4)));
        store_rgba8(&colors, 8, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let colors = load_rgba8::<C, 32>(source, stride, 8);
        for (byte, color) in block.iter_mut().zip(colors) {
            *byte = narrow_4(color.alpha) << 4 | narrow_4(intensity(color));
        }
    }
}

/// 8-bit alpha followed by 8-bit intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ia8;

impl BlockCodec for Ia8 {
    const BLOCK_WIDTH: usize = 4;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 32;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let colors: [Srgba<u8>; 16] = array::from_fn(|i| gray(block[2 * i + 1], block[2 * i]));
        store_rgba8(&colors, 4, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let colors = load_rgba8::<C, 16>(source, stride, 4);
        for (pair, color) in block.chunks_exact_mut(2).zip(colors) {
            pair[0] = color.alpha;
            pair[1] = intensity(color);
        }
    }
}

/// 32-bit RGBA split over two planes: alpha/red pairs for the whole tile, then green/blue pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba32Split;

impl BlockCodec for Rgba32Split {
    const BLOCK_WIDTH: usize = 4;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 64;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        let (ar, gb) = block.split_at(32);
        let colors: [Srgba<u8>; 16] = array::from_fn(|i| {
            Srgba::new(ar[2 * i + 1], gb[2 * i], gb[2 * i + 1], ar[2 * i])
        });
        store_rgba8(&colors, 4, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let colors = load_rgba8::<C, 16>(source, stride, 4);
        let (ar, gb) = block.split_at_mut(32);
        for ((ar, gb), color) in ar.chunks_exact_mut(2).zip(gb.chunks_exact_mut(2)).zip(colors) {
            ar.copy_from_slice(&[color.alpha, color.red]);
            gb.copy_from_slice(&[color.green, color.blue]);
        }
    }
}
