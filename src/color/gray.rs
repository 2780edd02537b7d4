//! Intensity and alpha-only formats.
//!
//! Intensity formats store the BT.709 luminance of incoming colors
//! and expand back to gray with `r = g = b`.

use super::{luma_709_16, luma_709_8, luminance_709, native, scaled, ColorSample};
use crate::{
    scale::{narrow_16_to_8, scale_bits, widen_8_to_16},
    ChannelDescriptor as Ch, ColorSpaceTag, NumericClass, PixelFormatDescriptor,
};
use palette::Srgba;
use std::hash::{Hash, Hasher};

/// 8-bit intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct L8(pub u8);

impl ColorSample for L8 {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        8,
        [Ch::new(8, 0), Ch::new(8, 0), Ch::new(8, 0), Ch::ABSENT],
        NumericClass::Unsigned,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        let l = scaled(self.0);
        [l, l, l, 1.0]
    }

    fn from_scaled_vector4([r, g, b, _]: [f32; 4]) -> Self {
        Self(native(luminance_709(r, g, b)))
    }

    #[inline]
    fn to_rgba8(self) -> Srgba<u8> {
        Srgba::new(self.0, self.0, self.0, u8::MAX)
    }

    #[inline]
    fn from_rgba8(color: Srgba<u8>) -> Self {
        Self(luma_709_8(color.red, color.green, color.blue))
    }
}

/// 16-bit intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct L16(pub u16);

impl ColorSample for L16 {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        16,
        [Ch::new(16, 0), Ch::new(16, 0), Ch::new(16, 0), Ch::ABSENT],
        NumericClass::Unsigned,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        let l = scaled(self.0);
        [l, l, l, 1.0]
    }

    fn from_scaled_vector4([r, g, b, _]: [f32; 4]) -> Self {
        Self(native(luminance_709(r, g, b)))
    }

    fn to_rgba8(self) -> Srgba<u8> {
        let l = narrow_16_to_8(self.0);
        Srgba::new(l, l, l, u8::MAX)
    }

    fn from_rgba8(color: Srgba<u8>) -> Self {
        Self(widen_8_to_16(luma_709_8(color.red, color.green, color.blue)))
    }

    fn to_rgba16(self) -> Srgba<u16> {
        Srgba::new(self.0, self.0, self.0, u16::MAX)
    }

    fn from_rgba16(color: Srgba<u16>) -> Self {
        Self(luma_709_16(color.red, color.green, color.blue))
    }
}

/// 8-bit alpha with no color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct A8(pub u8);

impl ColorSample for A8 {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        8,
        [Ch::ABSENT, Ch::ABSENT, Ch::ABSENT, Ch::new(8, 0)],
        NumericClass::Unsigned,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        [0.0, 0.0, 0.0, scaled(self.0)]
    }

    fn from_scaled_vector4([.., a]: [f32; 4]) -> Self {
        Self(native(a))
    }

    #[inline]
    fn to_rgba8(self) -> Srgba<u8> {
        Srgba::new(0, 0, 0, self.0)
    }

    #[inline]
    fn from_rgba8(color: Srgba<u8>) -> Self {
        Self(color.alpha)
    }
}

/// 8-bit intensity followed by 8-bit alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct La16 {
    /// Intensity.
    pub l: u8,
    /// Alpha.
    pub a: u8,
}

impl La16 {
    /// Creates a new [`La16`].
    #[must_use]
    pub const fn new(l: u8, a: u8) -> Self {
        Self { l, a }
    }
}

impl ColorSample for La16 {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        16,
        [Ch::new(8, 0), Ch::new(8, 0), Ch::new(8, 0), Ch::new(8, 8)],
        NumericClass::Unsigned,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        let l = scaled(self.l);
        [l, l, l, scaled(self.a)]
    }

    fn from_scaled_vector4([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(native(luminance_709(r, g, b)), native(a))
    }

    fn to_rgba8(self) -> Srgba<u8> {
        Srgba::new(self.l, self.l, self.l, self.a)
    }

    fn from_rgba8(color: Srgba<u8>) -> Self {
        Self::new(luma_709_8(color.red, color.green, color.blue), color.alpha)
    }
}

/// 32-bit floating point intensity.
///
/// Equality and hashing compare the bit patterns, so `NaN == NaN` and `0.0 != -0.0`.
#[derive(Debug, Clone, Copy, Default)]
#[repr(transparent)]
pub struct L32Float(pub f32);

impl PartialEq for L32Float {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for L32Float {}

impl Hash for L32Float {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl ColorSample for L32Float {
    const FORMAT: PixelFormatDescriptor = PixelFormatDescriptor::new(
        32,
        [Ch::new(32, 0), Ch::new(32, 0), Ch::new(32, 0), Ch::ABSENT],
        NumericClass::Float,
        ColorSpaceTag::Rgb,
    );

    fn to_scaled_vector4(self) -> [f32; 4] {
        [self.0, self.0, self.0, 1.0]
    }

    fn from_scaled_vector4([r, g, b, _]: [f32; 4]) -> Self {
        Self(luminance_709(r, g, b))
    }

    fn to_rgba8(self) -> Srgba<u8> {
        let l = scale_bits(self.0);
        Srgba::new(l, l, l, u8::MAX)
    }

    fn from_rgba8(color: Srgba<u8>) -> Self {
        Self(scale_bits(luma_709_8(color.red, color.green, color.blue)))
    }

    fn to_rgba16(self) -> Srgba<u16> {
        let l = scale_bits(self.0);
        Srgba::new(l, l, l, u16::MAX)
    }

    fn from_rgba16(color: Srgba<u16>) -> Self {
        Self(scale_bits(luma_709_16(color.red, color.green, color.blue)))
    }
}
