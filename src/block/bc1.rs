//! The bounding-box 4-color codec (BC1, also known as DXT1).
//!
//! Each 4×4 block stores two 5-6-5 endpoint colors and a 2-bit palette index per pixel.
//! The numeric order of the endpoints selects the palette:
//! - `color0 > color1`: four opaque colors, the endpoints plus two interpolants at thirds.
//! - `color0 <= color1`: three opaque colors, the endpoints plus their midpoint,
//!   and a fully transparent fourth entry.
//!
//! Blocks are `[color0: u16][color1: u16][indices: u32]`, all little-endian,
//! with pixel `i` (row-major) in bits `2i..2i + 2` of the index word.

use super::{load_rgba8, store_rgba8, BlockCodec};
use crate::{scale, ColorSample};
use bitvec::prelude::*;
use palette::Srgba;
use std::array;

/// The fully transparent palette entry of 3-color mode.
pub(crate) const TRANSPARENT: Srgba<u8> = Srgba::new(0, 0, 0, 0);

/// The palette index reserved for [`TRANSPARENT`] in 3-color mode.
const TRANSPARENT_INDEX: u8 = 3;

/// Expands a 5-6-5 color to 8 bits per channel by bit replication.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn expand_565(color: u16) -> [u8; 3] {
    let color = color as u64;
    [
        scale::rescale_bits(color >> 11, 5, 8) as u8,
        scale::rescale_bits(color >> 5 & 0x3F, 6, 8) as u8,
        scale::rescale_bits(color & 0x1F, 5, 8) as u8,
    ]
}

/// Quantizes an 8-bit color to the nearest 5-6-5 color.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn quantize_565([red, green, blue]: [u8; 3]) -> u16 {
    let channel = |value: u8, bits| {
        scale::from_scaled_bits(scale::to_scaled_bits(value.into(), 8), bits) as u16
    };
    channel(red, 5) << 11 | channel(green, 6) << 5 | channel(blue, 5)
}

/// Builds the 4-entry palette selected by the endpoint order.
pub(crate) fn palette(color0: u16, color1: u16) -> [Srgba<u8>; 4] {
    let c0 = expand_565(color0).map(u16::from);
    let c1 = expand_565(color1).map(u16::from);
    #[allow(clippy::cast_possible_truncation)]
    let mix = |w0: u16, w1: u16| {
        let [r, g, b]: [u8; 3] =
            array::from_fn(|i| ((w0 * c0[i] + w1 * c1[i]) / (w0 + w1)) as u8);
        Srgba::new(r, g, b, u8::MAX)
    };

    let p0 = mix(1, 0);
    let p1 = mix(0, 1);
    if color0 > color1 {
        [p0, p1, mix(2, 1), mix(1, 2)]
    } else {
        [p0, p1, mix(1, 1), TRANSPARENT]
    }
}

/// The squared RGB distance between two colors.
#[inline]
fn distance(a: Srgba<u8>, b: Srgba<u8>) -> u32 {
    let d = |x: u8, y: u8| u32::from(x.abs_diff(y)).pow(2);
    d(a.red, b.red) + d(a.green, b.green) + d(a.blue, b.blue)
}

/// The index of the opaque palette entry closest to `color`, preferring lower indices on ties.
#[allow(clippy::cast_possible_truncation)]
fn nearest(palette: &[Srgba<u8>; 4], color: Srgba<u8>) -> (u8, u32) {
    palette
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.alpha == u8::MAX)
        .map(|(i, &entry)| (i as u8, distance(entry, color)))
        .min_by_key(|&(_, d)| d)
        .unwrap_or((0, 0))
}

/// A decoded view of one bounding-box record: two endpoints and one palette index per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Bc1Block {
    /// The first 5-6-5 endpoint.
    pub(crate) color0: u16,
    /// The second 5-6-5 endpoint.
    pub(crate) color1: u16,
    /// The 2-bit palette index of each pixel, row-major.
    pub(crate) indices: [u8; 16],
}

impl Bc1Block {
    /// Reads a little-endian record.
    pub(crate) fn read_le(block: &[u8]) -> Self {
        let bits = block[4..8].view_bits::<Lsb0>();
        Self {
            color0: u16::from_le_bytes([block[0], block[1]]),
            color1: u16::from_le_bytes([block[2], block[3]]),
            indices: array::from_fn(|i| bits[2 * i..2 * i + 2].load_le()),
        }
    }

    /// Writes a little-endian record.
    pub(crate) fn write_le(&self, block: &mut [u8]) {
        block[0..2].copy_from_slice(&self.color0.to_le_bytes());
        block[2..4].copy_from_slice(&self.color1.to_le_bytes());
        let bits = block[4..8].view_bits_mut::<Lsb0>();
        for (chunk, &index) in bits.chunks_exact_mut(2).zip(&self.indices) {
            chunk.store_le(index);
        }
    }

    /// Reads a big-endian record, with pixel 0 in the top bits of the index word.
    pub(crate) fn read_be(block: &[u8]) -> Self {
        let bits = block[4..8].view_bits::<Msb0>();
        Self {
            color0: u16::from_be_bytes([block[0], block[1]]),
            color1: u16::from_be_bytes([block[2], block[3]]),
            indices: array::from_fn(|i| bits[2 * i..2 * i + 2].load_be()),
        }
    }

    /// Writes a big-endian record.
    pub(crate) fn write_be(&self, block: &mut [u8]) {
        block[0..2].copy_from_slice(&self.color0.to_be_bytes());
        block[2..4].copy_from_slice(&self.color1.to_be_bytes());
        let bits = block[4..8].view_bits_mut::<Msb0>();
        for (chunk, &index) in bits.chunks_exact_mut(2).zip(&self.indices) {
            chunk.store_be(index);
        }
    }

    /// The 16 decoded colors.
    pub(crate) fn colors(&self) -> [Srgba<u8>; 16] {
        let palette = palette(self.color0, self.color1);
        self.indices.map(|i| palette[usize::from(i)])
    }
}

/// Orders two endpoints for the requested mode and builds the block for `pixels`.
///
/// Returns the block and its total squared error over the opaque pixels.
fn fit(
    pixels: &[Srgba<u8>; 16],
    transparent: &[bool; 16],
    endpoints: (u16, u16),
) -> (Bc1Block, u32) {
    let (hi, lo) = if endpoints.0 >= endpoints.1 { endpoints } else { (endpoints.1, endpoints.0) };
    let has_transparent = transparent.contains(&true);

    let (color0, color1) = if has_transparent {
        (lo, hi)
    } else if hi > lo {
        (hi, lo)
    } else if hi > 0 {
        // equal endpoints would select 3-color mode
        (hi, hi - 1)
    } else {
        (1, 0)
    };

    let palette = palette(color0, color1);
    let mut error = 0;
    let indices = array::from_fn(|i| {
        if transparent[i] {
            TRANSPARENT_INDEX
        } else {
            let (index, d) = nearest(&palette, pixels[i]);
            error += d;
            index
        }
    });

    (Bc1Block { color0, color1, indices }, error)
}

/// The bounding-box 4-color codec.
///
/// Pixels whose alpha is below the alpha threshold are stored as the transparent
/// palette entry and do not contribute to the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bc1 {
    /// Pixels with alpha strictly below this are transparent.
    alpha_threshold: u8,
}

impl Bc1 {
    /// The alpha threshold used by [`Bc1::new`].
    pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

    /// Creates a codec with the default alpha threshold of `128`.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_alpha_threshold(Self::DEFAULT_ALPHA_THRESHOLD)
    }

    /// Creates a codec with the given alpha threshold.
    #[must_use]
    pub const fn with_alpha_threshold(alpha_threshold: u8) -> Self {
        Self { alpha_threshold }
    }

    /// Creates a codec that treats every pixel as opaque and never selects 3-color mode.
    #[must_use]
    pub const fn opaque() -> Self {
        Self::with_alpha_threshold(0)
    }

    /// The alpha threshold of this codec.
    #[must_use]
    pub const fn alpha_threshold(&self) -> u8 {
        self.alpha_threshold
    }

    /// Chooses endpoints and indices for 16 row-major pixels.
    ///
    /// Two endpoint candidates are tried: the corners of the per-channel bounding box
    /// of the opaque pixels, and the two opaque pixels at the extremes of the channel
    /// with the widest range. The one with the smaller total squared error wins,
    /// the bounding box on ties.
    pub(crate) fn encode_colors(&self, pixels: &[Srgba<u8>; 16]) -> Bc1Block {
        let transparent = pixels.map(|p| p.alpha < self.alpha_threshold);
        let opaque = || pixels.iter().zip(&transparent).filter(|&(_, &t)| !t).map(|(&p, _)| p);

        let Some(first) = opaque().next() else {
            return Bc1Block {
                color0: 0,
                color1: 0,
                indices: [TRANSPARENT_INDEX; 16],
            };
        };

        let channels = |p: Srgba<u8>| [p.red, p.green, p.blue];
        let (mut min, mut max) = (channels(first), channels(first));
        for p in opaque() {
            for ((lo, hi), c) in min.iter_mut().zip(&mut max).zip(channels(p)) {
                *lo = (*lo).min(c);
                *hi = (*hi).max(c);
            }
        }

        let mut axis = 0;
        for c in 1..3 {
            if max[c] - min[c] > max[axis] - min[axis] {
                axis = c;
            }
        }
        let low = opaque().find(|&p| channels(p)[axis] == min[axis]).unwrap_or(first);
        let high = opaque().find(|&p| channels(p)[axis] == max[axis]).unwrap_or(first);

        let (boxed, box_error) =
            fit(pixels, &transparent, (quantize_565(max), quantize_565(min)));
        let (extremes, extreme_error) = fit(
            pixels,
            &transparent,
            (quantize_565(channels(high)), quantize_565(channels(low))),
        );

        if extreme_error < box_error {
            extremes
        } else {
            boxed
        }
    }
}

impl Default for Bc1 {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockCodec for Bc1 {
    const BLOCK_WIDTH: usize = 4;
    const BLOCK_HEIGHT: usize = 4;
    const BYTES_PER_BLOCK: usize = 8;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        store_rgba8(&Bc1Block::read_le(block).colors(), 4, target, stride);
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        let pixels = load_rgba8::<C, 16>(source, stride, 4);
        self.encode_colors(&pixels).write_le(block);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        block::{decode_image, encode_image},
        surface::PixelBuffer,
        tests::test_image,
        Bgr565, Rgba32,
    };

    const RED: Srgba<u8> = Srgba::new(255, 0, 0, 255);
    const BLUE: Srgba<u8> = Srgba::new(0, 0, 255, 255);

    fn round_trip(codec: &Bc1, pixels: &[Srgba<u8>; 16]) -> ([u8; 8], [Srgba<u8>; 16]) {
        let source = pixels.map(Rgba32::from);
        let mut block = [0; 8];
        codec.encode_block(&source, 4, &mut block);
        let mut decoded = [Rgba32::default(); 16];
        codec.decode_block(&block, &mut decoded, 4);
        (block, decoded.map(Srgba::from))
    }

    #[test]
    fn byte_layout() {
        let block = [0x00, 0xF8, 0x1F, 0x00, 0b1110_0100, 0, 0, 0xFF];
        let record = Bc1Block::read_le(&block);
        assert_eq!(record.color0, 0xF800);
        assert_eq!(record.color1, 0x001F);
        assert_eq!(&record.indices[..4], &[0, 1, 2, 3]);
        assert_eq!(&record.indices[12..], &[3, 3, 3, 3]);

        let mut written = [0; 8];
        record.write_le(&mut written);
        assert_eq!(written, block);
    }

    #[test]
    fn four_color_palette() {
        let palette = palette(0xF800, 0x001F);
        assert_eq!(palette[0], RED);
        assert_eq!(palette[1], BLUE);
        assert_eq!(palette[2], Srgba::new(170, 0, 85, 255));
        assert_eq!(palette[3], Srgba::new(85, 0, 170, 255));
    }

    #[test]
    fn three_color_palette() {
        let palette = palette(0x001F, 0xF800);
        assert_eq!(palette[2], Srgba::new(127, 0, 127, 255));
        assert_eq!(palette[3], TRANSPARENT);
    }

    #[test]
    fn flat_blocks_are_exact() {
        for packed in [0x0000, 0xFFFF, 0x8410, 0x07E0, 0x1234, 0xF81F] {
            let [r, g, b] = expand_565(packed);
            let color = Srgba::new(r, g, b, 255);
            let (block, decoded) = round_trip(&Bc1::new(), &[color; 16]);
            assert_eq!(decoded, [color; 16], "{packed:#06x}");

            let record = Bc1Block::read_le(&block);
            assert!(record.color0 > record.color1);
        }
    }

    #[test]
    fn flat_blocks_decode_to_one_color() {
        let (_, decoded) = round_trip(&Bc1::new(), &[Srgba::new(100, 150, 200, 255); 16]);
        assert!(decoded.iter().all(|&c| c == decoded[0]));
        assert!(decoded[0].red.abs_diff(100) <= 4);
        assert!(decoded[0].green.abs_diff(150) <= 2);
        assert!(decoded[0].blue.abs_diff(200) <= 4);
    }

    #[test]
    fn transparent_pixels_select_three_color_mode() {
        let mut pixels = [Srgba::new(40, 80, 120, 255); 16];
        pixels[5] = Srgba::new(255, 255, 255, 10);

        let (block, decoded) = round_trip(&Bc1::with_alpha_threshold(32), &pixels);
        let record = Bc1Block::read_le(&block);
        assert!(record.color0 <= record.color1);
        assert_eq!(record.indices[5], TRANSPARENT_INDEX);
        assert_eq!(decoded[5], TRANSPARENT);
        assert!(decoded.iter().enumerate().all(|(i, c)| i == 5 || c.alpha == 255));

        let (block, _) = round_trip(&Bc1::with_alpha_threshold(5), &pixels);
        assert!(Bc1Block::read_le(&block).color0 > Bc1Block::read_le(&block).color1);
    }

    #[test]
    fn opaque_blocks_never_select_three_color_mode() {
        let codec = Bc1::opaque();
        let image = test_image::<Rgba32>(32, 32);
        let data = encode_image(&codec, &image);
        for block in data.chunks_exact(8) {
            let record = Bc1Block::read_le(block);
            assert!(record.color0 > record.color1);
        }

        let (block, _) = round_trip(&codec, &[Srgba::new(0, 0, 0, 0); 16]);
        assert_eq!(&block[..4], &[1, 0, 0, 0]);
    }

    #[test]
    fn fully_transparent_block() {
        let (block, decoded) = round_trip(&Bc1::new(), &[Srgba::new(9, 9, 9, 0); 16]);
        assert_eq!(block, [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(decoded, [TRANSPARENT; 16]);
    }

    #[test]
    fn red_and_blue_end_to_end() {
        let pixels = array::from_fn(|i| if i % 2 == 0 { RED } else { BLUE });
        let codec = Bc1::with_alpha_threshold(32);

        let (block, decoded) = round_trip(&codec, &pixels);
        let record = Bc1Block::read_le(&block);
        assert_eq!(record.color0, u16::from(Bgr565::from_rgba8(RED)));
        assert_eq!(record.color1, u16::from(Bgr565::from_rgba8(BLUE)));
        assert_eq!(decoded, pixels);

        let (again, _) = round_trip(&codec, &decoded);
        assert_eq!(again, block);
    }

    #[test]
    fn flat_block_images_are_exact() {
        let mut image = PixelBuffer::<Rgba32>::new(10, 6);
        for y in 0..6 {
            for x in 0..10 {
                #[allow(clippy::cast_possible_truncation)]
                let packed = (0x9E37 * (x / 4 + 3 * (y / 4) + 1)) as u16;
                let [r, g, b] = expand_565(packed);
                image.set(x, y, Rgba32::new(r, g, b, 255)).unwrap();
            }
        }

        let data = encode_image(&Bc1::new(), &image);
        let decoded: PixelBuffer<Rgba32> = decode_image(&Bc1::new(), &data, 10, 6).unwrap();
        assert_eq!(decoded.cropped(), image);
    }
}
