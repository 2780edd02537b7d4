//! Descriptors for channel layouts and pixel formats.

use crate::{color::luma_709_8, scale, CodecError, ColorSample};
use palette::Srgba;

/// The numeric class of a pixel format's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericClass {
    /// Unsigned fixed point, `0` is `0.0` and the maximum value is `1.0`.
    Unsigned,
    /// Signed fixed point with a full-range remap onto `[0, 1]`.
    Signed,
    /// IEEE floating point.
    Float,
    /// Decided per value, e.g. formats whose channels mix classes.
    Dynamic,
}

/// The color model a pixel format's channels are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpaceTag {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Luma and two chroma differences.
    Yuv,
    /// Cyan, magenta, yellow, black.
    Cmyk,
}

/// The width and position of one channel inside a packed integer of up to 64 bits.
///
/// A zero-width descriptor ([`ChannelDescriptor::ABSENT`]) marks a channel the format does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelDescriptor {
    /// The number of bits in the channel.
    bit_depth: u8,
    /// The bit position of the channel's least significant bit.
    shift: u8,
    /// `((1 << bit_depth) - 1) << shift`
    mask: u64,
}

impl ChannelDescriptor {
    /// The descriptor of a channel that is not present.
    pub const ABSENT: Self = Self { bit_depth: 0, shift: 0, mask: 0 };

    /// Creates a new [`ChannelDescriptor`] from a bit depth and shift.
    ///
    /// # Panics
    /// Panics if `bit_depth + shift > 64`. In a `const` context this is a compile error;
    /// use [`ChannelDescriptor::try_new`] for runtime input.
    #[must_use]
    pub const fn new(bit_depth: u8, shift: u8) -> Self {
        assert!(
            bit_depth as u16 + shift as u16 <= 64,
            "channel does not fit in 64 bits"
        );
        if bit_depth == 0 {
            return Self::ABSENT;
        }
        Self {
            bit_depth,
            shift,
            mask: scale::max_value(bit_depth) << shift,
        }
    }

    /// Creates a new [`ChannelDescriptor`] from a bit depth and shift,
    /// returning an error if the channel would not fit in 64 bits.
    pub fn try_new(bit_depth: u8, shift: u8) -> Result<Self, CodecError> {
        let end = u16::from(bit_depth) + u16::from(shift);
        if end > 64 {
            Err(CodecError::OutOfRange {
                what: "channel end bit",
                value: end.into(),
                bound: 65,
            })
        } else {
            Ok(Self::new(bit_depth, shift))
        }
    }

    /// Derives a descriptor from a channel mask.
    ///
    /// The shift is the mask's trailing zero count and the depth is its population count.
    /// Masks whose set bits are not contiguous are rejected.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_mask(mask: u64) -> Result<Self, CodecError> {
        if mask == 0 {
            return Ok(Self::ABSENT);
        }
        let shift = mask.trailing_zeros() as u8;
        let bit_depth = mask.count_ones() as u8;
        let channel = Self::new(bit_depth, shift);
        if channel.mask == mask {
            Ok(channel)
        } else {
            Err(CodecError::UnsupportedFormat("channel mask bits are not contiguous"))
        }
    }

    /// The number of bits in the channel.
    #[must_use]
    pub const fn bit_depth(&self) -> u8 {
        self.bit_depth
    }

    /// The bit position of the channel's least significant bit.
    #[must_use]
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    /// The mask selecting the channel's bits.
    #[must_use]
    pub const fn mask(&self) -> u64 {
        self.mask
    }

    /// Whether the channel is present (has a nonzero width).
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.bit_depth != 0
    }

    /// The bit one past the channel's most significant bit.
    #[must_use]
    pub const fn end(&self) -> u16 {
        self.bit_depth as u16 + self.shift as u16
    }

    /// Reads this channel's raw value out of a packed pixel.
    #[must_use]
    #[inline]
    pub const fn extract(&self, packed: u64) -> u64 {
        (packed & self.mask) >> self.shift
    }

    /// Writes a raw value into this channel of a packed pixel, leaving other bits untouched.
    #[must_use]
    #[inline]
    pub const fn insert(&self, packed: u64, value: u64) -> u64 {
        (packed & !self.mask) | ((value << self.shift) & self.mask)
    }

    /// Reads this channel from a packed pixel and rescales it to `bits` bits.
    #[must_use]
    #[inline]
    pub const fn extract_scaled(&self, packed: u64, bits: u8) -> u64 {
        scale::rescale_bits(self.extract(packed), self.bit_depth, bits)
    }

    /// Rescales a `bits`-bit value to this channel's depth and writes it into a packed pixel.
    #[must_use]
    #[inline]
    pub const fn insert_scaled(&self, packed: u64, value: u64, bits: u8) -> u64 {
        self.insert(packed, scale::rescale_bits(value, bits, self.bit_depth))
    }
}

/// Static metadata describing a pixel format: its width, channel layout, and numeric class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormatDescriptor {
    /// The total width of one pixel in bits.
    bits_per_pixel: u8,
    /// The red channel (or the intensity channel for grayscale formats).
    red: ChannelDescriptor,
    /// The green channel.
    green: ChannelDescriptor,
    /// The blue channel.
    blue: ChannelDescriptor,
    /// The alpha channel.
    alpha: ChannelDescriptor,
    /// The numeric class shared by the channels.
    numeric_class: NumericClass,
    /// The color model.
    color_space: ColorSpaceTag,
}

/// Whether a float channel has a width the scale engine can express.
const fn float_width_supported(channel: ChannelDescriptor) -> bool {
    matches!(channel.bit_depth, 0 | 16 | 32 | 64)
}

impl PixelFormatDescriptor {
    /// Creates a new [`PixelFormatDescriptor`].
    ///
    /// # Panics
    /// Panics on any layout [`PixelFormatDescriptor::try_new`] would reject.
    /// Per-type descriptors are `const`, so a malformed one fails to compile.
    #[must_use]
    pub const fn new(
        bits_per_pixel: u8,
        [red, green, blue, alpha]: [ChannelDescriptor; 4],
        numeric_class: NumericClass,
        color_space: ColorSpaceTag,
    ) -> Self {
        let format = Self {
            bits_per_pixel,
            red,
            green,
            blue,
            alpha,
            numeric_class,
            color_space,
        };
        assert!(format.validate().is_none(), "invalid pixel format descriptor");
        format
    }

    /// Creates a new [`PixelFormatDescriptor`], rejecting channels that overrun the pixel
    /// and float channels that are not 16, 32, or 64 bits wide.
    pub fn try_new(
        bits_per_pixel: u8,
        channels: [ChannelDescriptor; 4],
        numeric_class: NumericClass,
        color_space: ColorSpaceTag,
    ) -> Result<Self, CodecError> {
        let [red, green, blue, alpha] = channels;
        let format = Self {
            bits_per_pixel,
            red,
            green,
            blue,
            alpha,
            numeric_class,
            color_space,
        };
        match format.validate() {
            None => Ok(format),
            Some(reason) => Err(CodecError::UnsupportedFormat(reason)),
        }
    }

    /// Returns the reason the layout is invalid, if any.
    const fn validate(&self) -> Option<&'static str> {
        let channels = self.channels();
        let mut i = 0;
        while i < channels.len() {
            let channel = channels[i];
            if channel.end() > self.bits_per_pixel as u16 {
                return Some("channel extends past the end of the pixel");
            }
            if matches!(self.numeric_class, NumericClass::Float) && !float_width_supported(channel)
            {
                return Some("float channels must be 16, 32, or 64 bits wide");
            }
            i += 1;
        }
        None
    }

    /// The total width of one pixel in bits.
    #[must_use]
    pub const fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    /// The red (or intensity) channel.
    #[must_use]
    pub const fn red(&self) -> ChannelDescriptor {
        self.red
    }

    /// The green channel.
    #[must_use]
    pub const fn green(&self) -> ChannelDescriptor {
        self.green
    }

    /// The blue channel.
    #[must_use]
    pub const fn blue(&self) -> ChannelDescriptor {
        self.blue
    }

    /// The alpha channel.
    #[must_use]
    pub const fn alpha(&self) -> ChannelDescriptor {
        self.alpha
    }

    /// The channels in red, green, blue, alpha order.
    #[must_use]
    pub const fn channels(&self) -> [ChannelDescriptor; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// The numeric class of the channels.
    #[must_use]
    pub const fn numeric_class(&self) -> NumericClass {
        self.numeric_class
    }

    /// The color model of the channels.
    #[must_use]
    pub const fn color_space(&self) -> ColorSpaceTag {
        self.color_space
    }

    /// Whether the format has an alpha channel.
    #[must_use]
    pub const fn has_alpha(&self) -> bool {
        self.alpha.is_present()
    }

    /// Whether the format has any of the red, green, or blue channels.
    #[must_use]
    pub const fn has_color(&self) -> bool {
        self.red.is_present() || self.green.is_present() || self.blue.is_present()
    }

    /// Whether the red, green, and blue channels are co-located,
    /// i.e. a single intensity channel stands in for all three.
    #[must_use]
    pub const fn is_grayscale(&self) -> bool {
        self.red.shift == self.green.shift && self.green.shift == self.blue.shift
    }

    /// Unpacks a packed unsigned pixel into 8-bit RGBA.
    ///
    /// Missing color channels read as `0` and a missing alpha channel reads as opaque.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn unpack_rgba8(&self, packed: u64) -> Srgba<u8> {
        let channel = |c: ChannelDescriptor, absent: u8| {
            if c.is_present() {
                c.extract_scaled(packed, 8) as u8
            } else {
                absent
            }
        };
        Srgba::new(
            channel(self.red, 0),
            channel(self.green, 0),
            channel(self.blue, 0),
            channel(self.alpha, u8::MAX),
        )
    }

    /// Packs 8-bit RGBA into a packed unsigned pixel.
    ///
    /// Grayscale formats store the BT.709 luminance of the color.
    #[must_use]
    pub fn pack_rgba8(&self, color: Srgba<u8>) -> u64 {
        let (red, green, blue, alpha) = color.into_components();
        let mut packed = 0;
        if self.has_color() && self.is_grayscale() {
            let luma = luma_709_8(red, green, blue);
            packed = self.red.insert_scaled(packed, luma.into(), 8);
        } else {
            packed = self.red.insert_scaled(packed, red.into(), 8);
            packed = self.green.insert_scaled(packed, green.into(), 8);
            packed = self.blue.insert_scaled(packed, blue.into(), 8);
        }
        self.alpha.insert_scaled(packed, alpha.into(), 8)
    }

    /// Unpacks a packed unsigned pixel into a normalized `[r, g, b, a]` vector.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn unpack_scaled(&self, packed: u64) -> [f32; 4] {
        let channel = |c: ChannelDescriptor, absent: f32| {
            if c.is_present() {
                scale::to_scaled_bits(c.extract(packed), c.bit_depth) as f32
            } else {
                absent
            }
        };
        [
            channel(self.red, 0.0),
            channel(self.green, 0.0),
            channel(self.blue, 0.0),
            channel(self.alpha, 1.0),
        ]
    }

    /// Packs a normalized `[r, g, b, a]` vector into a packed unsigned pixel.
    #[must_use]
    pub fn pack_scaled(&self, [red, green, blue, alpha]: [f32; 4]) -> u64 {
        let channel = |packed: u64, c: ChannelDescriptor, value: f32| {
            c.insert(packed, scale::from_scaled_bits(value.into(), c.bit_depth))
        };
        let mut packed = 0;
        if self.has_color() && self.is_grayscale() {
            packed = channel(packed, self.red, crate::color::luminance_709(red, green, blue));
        } else {
            packed = channel(packed, self.red, red);
            packed = channel(packed, self.green, green);
            packed = channel(packed, self.blue, blue);
        }
        channel(packed, self.alpha, alpha)
    }
}

/// Returns the format descriptor of a color type.
#[must_use]
pub const fn descriptor_of<C: ColorSample>() -> PixelFormatDescriptor {
    C::FORMAT
}
