//! The GameCube/Wii compressed texture codec (CMPR).
//!
//! An 8×8 block is four 4×4 sub-blocks, stored top-left, top-right, bottom-left,
//! bottom-right. Each sub-block is an 8-byte [`Bc1`] record with every field
//! big-endian, and pixel 0 in the top two bits of the index word.

use super::{
    bc1::{Bc1, Bc1Block},
    load_rgba8, store_rgba8, BlockCodec,
};
use crate::ColorSample;

/// The offsets of the four sub-blocks within a block, in storage order.
const fn sub_blocks(stride: usize) -> [usize; 4] {
    [0, 4, 4 * stride, 4 * stride + 4]
}

/// The GameCube/Wii compressed texture codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cmpr {
    /// The color codec of each sub-block.
    color: Bc1,
}

impl Cmpr {
    /// Creates a codec with the default alpha threshold of `128`.
    #[must_use]
    pub const fn new() -> Self {
        Self { color: Bc1::new() }
    }

    /// Creates a codec with the given alpha threshold.
    ///
    /// See [`Bc1::with_alpha_threshold`].
    #[must_use]
    pub const fn with_alpha_threshold(alpha_threshold: u8) -> Self {
        Self { color: Bc1::with_alpha_threshold(alpha_threshold) }
    }

    /// The alpha threshold of this codec.
    #[must_use]
    pub const fn alpha_threshold(&self) -> u8 {
        self.color.alpha_threshold()
    }
}

impl BlockCodec for Cmpr {
    const BLOCK_WIDTH: usize = 8;
    const BLOCK_HEIGHT: usize = 8;
    const BYTES_PER_BLOCK: usize = 32;

    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize) {
        for (record, offset) in block.chunks_exact(8).zip(sub_blocks(stride)) {
            let colors = Bc1Block::read_be(record).colors();
            store_rgba8(&colors, 4, &mut target[offset..], stride);
        }
    }

    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]) {
        for (record, offset) in block.chunks_exact_mut(8).zip(sub_blocks(stride)) {
            let colors = load_rgba8::<C, 16>(&source[offset..], stride, 4);
            self.color.encode_colors(&colors).write_be(record);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        block::{bc1::expand_565, decode_image, encode_image},
        surface::PixelBuffer,
        Rgba32,
    };
    use palette::Srgba;

    fn quadrant_color(packed: u16) -> Rgba32 {
        let [r, g, b] = expand_565(packed);
        Rgba32::new(r, g, b, 255)
    }

    #[test]
    fn big_endian_layout() {
        let record = [0xF8, 0x00, 0x00, 0x1F, 0b0001_1011, 0, 0, 0b0000_0011];
        let block = Bc1Block::read_be(&record);
        assert_eq!(block.color0, 0xF800);
        assert_eq!(block.color1, 0x001F);
        assert_eq!(&block.indices[..4], &[0, 1, 2, 3]);
        assert_eq!(&block.indices[12..], &[0, 0, 0, 3]);

        let mut written = [0; 8];
        block.write_be(&mut written);
        assert_eq!(written, record);
    }

    #[test]
    fn sub_block_order() {
        let quadrants = [0xF800, 0x07E0, 0x001F, 0xFFFF];
        let mut source = [Rgba32::default(); 64];
        for y in 0..8 {
            for x in 0..8 {
                source[y * 8 + x] = quadrant_color(quadrants[y / 4 * 2 + x / 4]);
            }
        }

        let mut block = [0; 32];
        Cmpr::new().encode_block(&source, 8, &mut block);
        for (record, packed) in block.chunks_exact(8).zip(quadrants) {
            let record = Bc1Block::read_be(record);
            assert!(record.color0 > record.color1);
            assert_eq!(record.colors()[0], Srgba::from(quadrant_color(packed)));
        }

        let mut decoded = [Rgba32::default(); 64];
        Cmpr::new().decode_block(&block, &mut decoded, 8);
        assert_eq!(decoded, source);
    }

    #[test]
    fn transparent_pixels() {
        let mut image = PixelBuffer::<Rgba32>::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                image.set(x, y, quadrant_color(0x8410)).unwrap();
            }
        }
        image.set(5, 6, Rgba32::new(0, 0, 0, 100)).unwrap();

        let data = encode_image(&Cmpr::new(), &image);
        let decoded: PixelBuffer<Rgba32> = decode_image(&Cmpr::new(), &data, 8, 8).unwrap();
        assert_eq!(decoded.get(5, 6).unwrap(), Rgba32::new(0, 0, 0, 0));
        assert_eq!(decoded.get(4, 6).unwrap(), quadrant_color(0x8410));

        let data = encode_image(&Cmpr::with_alpha_threshold(50), &image);
        let decoded: PixelBuffer<Rgba32> = decode_image(&Cmpr::new(), &data, 8, 8).unwrap();
        assert_eq!(decoded.get(5, 6).unwrap().a, 255);
    }

    #[test]
    fn partial_blocks() {
        let mut image = PixelBuffer::<Rgba32>::new(9, 3);
        for y in 0..3 {
            for x in 0..9 {
                image.set(x, y, quadrant_color(0x1234)).unwrap();
            }
        }

        let data = encode_image(&Cmpr::new(), &image);
        assert_eq!(data.len(), 2 * 32);

        let decoded: PixelBuffer<Rgba32> = decode_image(&Cmpr::new(), &data, 9, 3).unwrap();
        assert_eq!(decoded.cropped(), image);
    }
}
