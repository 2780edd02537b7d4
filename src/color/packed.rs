//! Formats that pack several sub-byte channels into a single `u16`.

use super::ColorSample;
use crate::{ChannelDescriptor as Ch, ColorSpaceTag, NumericClass, PixelFormatDescriptor};
use palette::Srgba;

macro_rules! packed_u16_format {
    ($(#[$meta:meta])* $name:ident, [$red:expr, $green:expr, $blue:expr, $alpha:expr]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub u16);

        impl From<u16> for $name {
            #[inline]
            fn from(packed: u16) -> Self {
                Self(packed)
            }
        }

        impl From<$name> for u16 {
            #[inline]
            fn from(color: $name) -> Self {
                color.0
            }
        }

        impl ColorSample for $name {
            const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
                16,
                [$red, $green, $blue, $alpha],
                NumericClass::Unsigned,
                ColorSpaceTag::Rgb,
            );

            #[inline]
            fn to_scaled_vector4(self) -> [f32; 4] {
                Self::FORMAT.unpack_scaled(self.0.into())
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_scaled_vector4(vector: [f32; 4]) -> Self {
                Self(Self::FORMAT.pack_scaled(vector) as u16)
            }

            #[inline]
            fn to_rgba8(self) -> Srgba<u8> {
                Self::FORMAT.unpack_rgba8(self.0.into())
            }

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_rgba8(color: Srgba<u8>) -> Self {
                Self(Self::FORMAT.pack_rgba8(color) as u16)
            }
        }
    };
}

packed_u16_format!(
    /// 5-6-5 RGB with red in the high bits and no alpha.
    Bgr565,
    [Ch::new(5, 11), Ch::new(6, 5), Ch::new(5, 0), Ch::ABSENT]
);

packed_u16_format!(
    /// 5-5-5 RGB with a 1-bit alpha in the most significant bit.
    Bgra5551,
    [Ch::new(5, 10), Ch::new(5, 5), Ch::new(5, 0), Ch::new(1, 15)]
);

packed_u16_format!(
    /// 4-4-4-4 RGBA with alpha in the high nibble and blue in the low nibble.
    Bgra4444,
    [Ch::new(4, 8), Ch::new(4, 4), Ch::new(4, 0), Ch::new(4, 12)]
);
