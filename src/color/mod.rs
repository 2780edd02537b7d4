//! The [`ColorSample`] contract and the concrete pixel formats that implement it.

mod float;
mod gray;
mod packed;
mod rgba;

pub use float::RgbaHalf;
pub use gray::{L16, L32Float, L8, La16, A8};
pub use packed::{Bgr565, Bgra4444, Bgra5551};
pub use rgba::{Bgra32, Rgb24, Rgba32, Rgba32Signed, Rgba64};

use crate::{scale, PixelFormatDescriptor, ScalarChannel};
use palette::{Srgb, Srgba, WithAlpha};
use std::fmt::Debug;

/// The conversion surface every concrete pixel format implements.
///
/// Block codecs and the palette quantizer only talk to pixels through this trait,
/// so they work over any format without special cases.
///
/// The 8-bit and 16-bit conversions are the fast paths: they rescale each channel
/// with [`scale::scale_bits`] and never go through floats for integer formats.
///
/// Equality is bit-exact on the native channel values.
pub trait ColorSample: Copy + PartialEq + Default + Debug + Send + Sync + 'static {
    /// The layout of this format.
    const FORMAT: PixelFormatDescriptor;

    /// Converts to a normalized `[r, g, b, a]` vector.
    ///
    /// Intensity formats repeat the intensity in `r`, `g`, and `b`.
    /// Alpha-only formats have `r = g = b = 0`.
    /// Formats without alpha have `a = 1`.
    fn to_scaled_vector4(self) -> [f32; 4];

    /// Converts from a normalized `[r, g, b, a]` vector.
    ///
    /// Intensity formats store the BT.709 luminance of `r`, `g`, and `b`.
    fn from_scaled_vector4(vector: [f32; 4]) -> Self;

    /// Converts to 8-bit RGBA.
    fn to_rgba8(self) -> Srgba<u8>;

    /// Converts from 8-bit RGBA.
    fn from_rgba8(color: Srgba<u8>) -> Self;

    /// Converts from 8-bit RGB, treating the color as opaque.
    #[inline]
    fn from_rgb8(color: Srgb<u8>) -> Self {
        Self::from_rgba8(color.with_alpha(u8::MAX))
    }

    /// Converts to 16-bit RGBA.
    ///
    /// The default widens [`ColorSample::to_rgba8`], which is exact for formats
    /// with at most 8 bits per channel.
    #[inline]
    fn to_rgba16(self) -> Srgba<u16> {
        widen_rgba8(self.to_rgba8())
    }

    /// Converts from 16-bit RGBA.
    ///
    /// The default narrows to 8-bit RGBA first, which is exact for formats
    /// with at most 8 bits per channel.
    #[inline]
    fn from_rgba16(color: Srgba<u16>) -> Self {
        Self::from_rgba8(narrow_rgba16(color))
    }

    /// Converts from 16-bit RGB, treating the color as opaque.
    #[inline]
    fn from_rgb16(color: Srgb<u16>) -> Self {
        Self::from_rgba16(color.with_alpha(u16::MAX))
    }
}

/// BT.709 luminance of a normalized color.
#[must_use]
#[inline]
#[allow(clippy::float_cmp)]
pub(crate) fn luminance_709(red: f32, green: f32, blue: f32) -> f32 {
    // gray stays exact
    if red == green && green == blue {
        red
    } else {
        0.2126 * red + 0.7152 * green + 0.0722 * blue
    }
}

/// BT.709 luminance of an 8-bit color, rounded to nearest.
///
/// The weights sum to exactly `10_000`, so gray inputs come back unchanged.
#[must_use]
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn luma_709_8(red: u8, green: u8, blue: u8) -> u8 {
    ((2126 * u32::from(red) + 7152 * u32::from(green) + 722 * u32::from(blue) + 5000) / 10_000)
        as u8
}

/// BT.709 luminance of a 16-bit color, rounded to nearest.
#[must_use]
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn luma_709_16(red: u16, green: u16, blue: u16) -> u16 {
    ((2126 * u64::from(red) + 7152 * u64::from(green) + 722 * u64::from(blue) + 5000) / 10_000)
        as u16
}

/// A channel value as a normalized `f32`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn scaled<T: ScalarChannel>(value: T) -> f32 {
    scale::to_scaled_float(value) as f32
}

/// A normalized `f32` as a channel value.
#[inline]
fn native<T: ScalarChannel>(value: f32) -> T {
    scale::from_scaled_float(value.into())
}

/// Widens every channel of an 8-bit color by bit replication.
#[inline]
fn widen_rgba8(color: Srgba<u8>) -> Srgba<u16> {
    let (red, green, blue, alpha) = color.into_components();
    Srgba::new(
        scale::widen_8_to_16(red),
        scale::widen_8_to_16(green),
        scale::widen_8_to_16(blue),
        scale::widen_8_to_16(alpha),
    )
}

/// Narrows every channel of a 16-bit color to its high byte.
#[inline]
fn narrow_rgba16(color: Srgba<u16>) -> Srgba<u8> {
    let (red, green, blue, alpha) = color.into_components();
    Srgba::new(
        scale::narrow_16_to_8(red),
        scale::narrow_16_to_8(green),
        scale::narrow_16_to_8(blue),
        scale::narrow_16_to_8(alpha),
    )
}
