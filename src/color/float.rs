use super::ColorSample;
use crate::{
    scale::scale_bits, ChannelDescriptor as Ch, ColorSpaceTag, NumericClass,
    PixelFormatDescriptor,
};
use half::f16;
use palette::Srgba;
use std::hash::{Hash, Hasher};

/// 64-bit RGBA with a half precision float per channel.
///
/// Normalized values pass through unclamped; only the integer conversions clamp to `[0, 1]`.
/// Equality and hashing compare the bit patterns of each channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbaHalf {
    /// Red.
    pub r: f16,
    /// Green.
    pub g: f16,
    /// Blue.
    pub b: f16,
    /// Alpha.
    pub a: f16,
}

impl RgbaHalf {
    /// Creates a new [`RgbaHalf`].
    #[must_use]
    pub const fn new(r: f16, g: f16, b: f16, a: f16) -> Self {
        Self { r, g, b, a }
    }

    /// The raw bit patterns of the channels in red, green, blue, alpha order.
    #[must_use]
    pub const fn to_bits(self) -> [u16; 4] {
        [self.r.to_bits(), self.g.to_bits(), self.b.to_bits(), self.a.to_bits()]
    }
}

impl PartialEq for RgbaHalf {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for RgbaHalf {}

impl Hash for RgbaHalf {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl ColorSample for RgbaHalf {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        64,
        [Ch::new(16, 0), Ch::new(16, 16), Ch::new(16, 32), Ch::new(16, 48)],
        NumericClass::Float,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        [self.r.to_f32(), self.g.to_f32(), self.b.to_f32(), self.a.to_f32()]
    }

    fn from_scaled_vector4([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(
            f16::from_f32(r),
            f16::from_f32(g),
            f16::from_f32(b),
            f16::from_f32(a),
        )
    }

    fn to_rgba8(self) -> Srgba<u8> {
        Srgba::new(
            scale_bits(self.r),
            scale_bits(self.g),
            scale_bits(self.b),
            scale_bits(self.a),
        )
    }

    fn from_rgba8(color: Srgba<u8>) -> Self {
        let (r, g, b, a) = color.into_components();
        Self::new(scale_bits(r), scale_bits(g), scale_bits(b), scale_bits(a))
    }

    fn to_rgba16(self) -> Srgba<u16> {
        Srgba::new(
            scale_bits(self.r),
            scale_bits(self.g),
            scale_bits(self.b),
            scale_bits(self.a),
        )
    }

    fn from_rgba16(color: Srgba<u16>) -> Self {
        let (r, g, b, a) = color.into_components();
        Self::new(scale_bits(r), scale_bits(g), scale_bits(b), scale_bits(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn integer_paths_clamp() {
        let color = RgbaHalf::from_scaled_vector4([2.0, -1.0, 0.5, 1.0]);
        assert_eq!(color.to_rgba8(), Srgba::new(255, 0, 128, 255));
        assert_eq!(color.to_scaled_vector4(), [2.0, -1.0, 0.5, 1.0]);
        assert_eq!(
            RgbaHalf::from_rgba8(Srgba::new(0, 255, 0, 255)).to_bits(),
            [0, f16::ONE.to_bits(), 0, f16::ONE.to_bits()]
        );
    }

    #[test]
    fn eight_bit_values_survive() {
        for value in u8::MIN..=u8::MAX {
            let color = RgbaHalf::from_rgba8(Srgba::new(value, value, value, value));
            assert_eq!(color.to_rgba8(), Srgba::new(value, value, value, value));
        }
    }

    #[test]
    fn equality_is_bitwise() {
        let zero = RgbaHalf::default();
        let negative = RgbaHalf::new(f16::NEG_ZERO, f16::ZERO, f16::ZERO, f16::ZERO);
        assert_ne!(zero, negative);
        let nan = RgbaHalf::new(f16::NAN, f16::NAN, f16::NAN, f16::NAN);
        assert_eq!(nan, nan);
    }
}
