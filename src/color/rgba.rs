//! Formats that store each red, green, blue, and alpha channel in its own integer.

use super::{native, scaled, ColorSample};
use crate::{
    scale::scale_bits, ChannelDescriptor as Ch, ColorSpaceTag, NumericClass,
    PixelFormatDescriptor,
};
use palette::Srgba;

/// 32-bit RGBA with 8 unsigned bits per channel, red in the lowest byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba32 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba32 {
    /// Creates a new [`Rgba32`].
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<u32> for Rgba32 {
    fn from(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Self { r, g, b, a }
    }
}

impl From<Rgba32> for u32 {
    fn from(Rgba32 { r, g, b, a }: Rgba32) -> Self {
        u32::from_le_bytes([r, g, b, a])
    }
}

impl From<Srgba<u8>> for Rgba32 {
    fn from(color: Srgba<u8>) -> Self {
        let (r, g, b, a) = color.into_components();
        Self { r, g, b, a }
    }
}

impl From<Rgba32> for Srgba<u8> {
    fn from(Rgba32 { r, g, b, a }: Rgba32) -> Self {
        Srgba::new(r, g, b, a)
    }
}

impl ColorSample for Rgba32 {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        32,
        [Ch::new(8, 0), Ch::new(8, 8), Ch::new(8, 16), Ch::new(8, 24)],
        NumericClass::Unsigned,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        [scaled(self.r), scaled(self.g), scaled(self.b), scaled(self.a)]
    }

    fn from_scaled_vector4([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(native(r), native(g), native(b), native(a))
    }

    #[inline]
    fn to_rgba8(self) -> Srgba<u8> {
        self.into()
    }

    #[inline]
    fn from_rgba8(color: Srgba<u8>) -> Self {
        color.into()
    }
}

/// 32-bit BGRA with 8 unsigned bits per channel, blue in the lowest byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bgra32 {
    /// Blue.
    pub b: u8,
    /// Green.
    pub g: u8,
    /// Red.
    pub r: u8,
    /// Alpha.
    pub a: u8,
}

impl Bgra32 {
    /// Creates a new [`Bgra32`].
    #[must_use]
    pub const fn new(b: u8, g: u8, r: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }
}

impl From<u32> for Bgra32 {
    fn from(packed: u32) -> Self {
        let [b, g, r, a] = packed.to_le_bytes();
        Self { b, g, r, a }
    }
}

impl From<Bgra32> for u32 {
    fn from(Bgra32 { b, g, r, a }: Bgra32) -> Self {
        u32::from_le_bytes([b, g, r, a])
    }
}

impl ColorSample for Bgra32 {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        32,
        [Ch::new(8, 16), Ch::new(8, 8), Ch::new(8, 0), Ch::new(8, 24)],
        NumericClass::Unsigned,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        [scaled(self.r), scaled(self.g), scaled(self.b), scaled(self.a)]
    }

    fn from_scaled_vector4([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(native(b), native(g), native(r), native(a))
    }

    fn to_rgba8(self) -> Srgba<u8> {
        Srgba::new(self.r, self.g, self.b, self.a)
    }

    fn from_rgba8(color: Srgba<u8>) -> Self {
        let (r, g, b, a) = color.into_components();
        Self::new(b, g, r, a)
    }
}

/// 24-bit RGB with 8 unsigned bits per channel and no alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb24 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb24 {
    /// Creates a new [`Rgb24`].
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl ColorSample for Rgb24 {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        24,
        [Ch::new(8, 0), Ch::new(8, 8), Ch::new(8, 16), Ch::ABSENT],
        NumericClass::Unsigned,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        [scaled(self.r), scaled(self.g), scaled(self.b), 1.0]
    }

    fn from_scaled_vector4([r, g, b, _]: [f32; 4]) -> Self {
        Self::new(native(r), native(g), native(b))
    }

    fn to_rgba8(self) -> Srgba<u8> {
        Srgba::new(self.r, self.g, self.b, u8::MAX)
    }

    fn from_rgba8(color: Srgba<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

/// 32-bit RGBA with 8 signed bits per channel.
///
/// The signed range is remapped over the full normalized range,
/// so `-128` is `0.0` and `127` is `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba32Signed {
    /// Red.
    pub r: i8,
    /// Green.
    pub g: i8,
    /// Blue.
    pub b: i8,
    /// Alpha.
    pub a: i8,
}

impl Rgba32Signed {
    /// Creates a new [`Rgba32Signed`].
    #[must_use]
    pub const fn new(r: i8, g: i8, b: i8, a: i8) -> Self {
        Self { r, g, b, a }
    }
}

impl ColorSample for Rgba32Signed {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        32,
        [Ch::new(8, 0), Ch::new(8, 8), Ch::new(8, 16), Ch::new(8, 24)],
        NumericClass::Signed,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        [scaled(self.r), scaled(self.g), scaled(self.b), scaled(self.a)]
    }

    fn from_scaled_vector4([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(native(r), native(g), native(b), native(a))
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

/// 64-bit RGBA with 16 unsigned bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba64 {
    /// Red.
    pub r: u16,
    /// Green.
    pub g: u16,
    /// Blue.
    pub b: u16,
    /// Alpha.
    pub a: u16,
}

impl Rgba64 {
    /// Creates a new [`Rgba64`].
    #[must_use]
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }
}

impl From<u64> for Rgba64 {
    #[allow(clippy::cast_possible_truncation)]
    fn from(packed: u64) -> Self {
        Self::new(
            packed as u16,
            (packed >> 16) as u16,
            (packed >> 32) as u16,
            (packed >> 48) as u16,
        )
    }
}

impl From<Rgba64> for u64 {
    fn from(Rgba64 { r, g, b, a }: Rgba64) -> Self {
        u64::from(r) | u64::from(g) << 16 | u64::from(b) << 32 | u64::from(a) << 48
    }
}

impl ColorSample for Rgba64 {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        64,
        [Ch::new(16, 0), Ch::new(16, 16), Ch::new(16, 32), Ch::new(16, 48)],
        NumericClass::Unsigned,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        [scaled(self.r), scaled(self.g), scaled(self.b), scaled(self.a)]
    }

    fn from_scaled_vector4([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(native(r), native(g), native(b), native(a))
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
        Srgba::new(self.r, self.g, self.b, self.a)
    }

    fn from_rgba16(color: Srgba<u16>) -> Self {
        let (r, g, b, a) = color.into_components();
        Self::new(r, g, b, a)
    }
}
