use crate::{scale, NumericClass};
use half::f16;
use num_traits::{AsPrimitive, Bounded};
use std::fmt::Debug;

/// A native numeric representation for a single color channel.
///
/// Each implementation pins down how values of the type map onto the normalized `[0, 1]` range
/// and onto an unsigned "offset" bit pattern of [`ScalarChannel::BITS`] bits.
/// Signed integers use a full-range remap: the minimum value maps to `0.0` (offset `0`)
/// and the maximum value maps to `1.0` (offset `2^BITS - 1`).
/// This lets [`scale::scale_bits`] rescale between any two integer kinds
/// with shifts and bit replication alone.
///
/// Floating point kinds are passed through unchanged when converted to a scaled value.
pub trait ScalarChannel: Copy + PartialOrd + Default + Debug + Send + Sync + 'static {
    /// The numeric class of this channel type.
    const CLASS: NumericClass;

    /// The width of this channel type in bits.
    const BITS: u8;

    /// Converts a native value into a normalized value.
    ///
    /// Integer kinds map onto `[0, 1]`. Floating kinds are returned as-is.
    fn to_scaled(self) -> f64;

    /// Converts a normalized value into a native value.
    ///
    /// Integer kinds clamp the input to `[0, 1]` and round to the nearest value.
    /// Floating kinds are not clamped.
    fn from_scaled(scaled: f64) -> Self;

    /// The value as an unsigned offset bit pattern of [`ScalarChannel::BITS`] bits.
    fn to_offset_bits(self) -> u64;

    /// Creates a value from an unsigned offset bit pattern of [`ScalarChannel::BITS`] bits.
    fn from_offset_bits(bits: u64) -> Self;
}

macro_rules! impl_unsigned_channel {
    ($($ty:ty),*) => {$(
        impl ScalarChannel for $ty {
            const CLASS: NumericClass = NumericClass::Unsigned;
            #[allow(clippy::cast_possible_truncation)]
            const BITS: u8 = <$ty>::BITS as u8;

            #[inline]
            fn to_scaled(self) -> f64 {
                scale::to_scaled_bits(self.to_offset_bits(), <Self as ScalarChannel>::BITS)
            }

            #[inline]
            fn from_scaled(scaled: f64) -> Self {
                Self::from_offset_bits(scale::from_scaled_bits(scaled, <Self as ScalarChannel>::BITS))
            }

            #[inline]
            fn to_offset_bits(self) -> u64 {
                self.as_()
            }

            #[inline]
            fn from_offset_bits(bits: u64) -> Self {
                bits.as_()
            }
        }
    )*};
}

macro_rules! impl_signed_channel {
    ($($ty:ty),*) => {$(
        impl ScalarChannel for $ty {
            const CLASS: NumericClass = NumericClass::Signed;
            #[allow(clippy::cast_possible_truncation)]
            const BITS: u8 = <$ty>::BITS as u8;

            #[inline]
            fn to_scaled(self) -> f64 {
                scale::to_scaled_bits(self.to_offset_bits(), <Self as ScalarChannel>::BITS)
            }

            #[inline]
            fn from_scaled(scaled: f64) -> Self {
                Self::from_offset_bits(scale::from_scaled_bits(scaled, <Self as ScalarChannel>::BITS))
            }

            #[inline]
            #[allow(clippy::cast_sign_loss)]
            fn to_offset_bits(self) -> u64 {
                let value: i64 = self.as_();
                let min: i64 = <$ty as Bounded>::min_value().as_();
                (value - min) as u64
            }

            #[inline]
            #[allow(clippy::cast_possible_wrap)]
            fn from_offset_bits(bits: u64) -> Self {
                let min: i64 = <$ty as Bounded>::min_value().as_();
                ((bits & scale::max_value(<Self as ScalarChannel>::BITS)) as i64 + min).as_()
            }
        }
    )*};
}

impl_unsigned_channel!(u8, u16, u32);
impl_signed_channel!(i8, i16, i32);

impl ScalarChannel for f32 {
    const CLASS: NumericClass = NumericClass::Float;
    const BITS: u8 = 32;

    #[inline]
    fn to_scaled(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_scaled(scaled: f64) -> Self {
        scaled as f32
    }

    fn to_offset_bits(self) -> u64 {
        scale::from_scaled_bits(self.to_scaled(), <Self as ScalarChannel>::BITS)
    }

    fn from_offset_bits(bits: u64) -> Self {
        Self::from_scaled(scale::to_scaled_bits(bits, <Self as ScalarChannel>::BITS))
    }
}

impl ScalarChannel for f16 {
    const CLASS: NumericClass = NumericClass::Float;
    const BITS: u8 = 16;

    #[inline]
    fn to_scaled(self) -> f64 {
        self.to_f64()
    }

    #[inline]
    fn from_scaled(scaled: f64) -> Self {
        f16::from_f64(scaled)
    }

    fn to_offset_bits(self) -> u64 {
        scale::from_scaled_bits(self.to_scaled(), <Self as ScalarChannel>::BITS)
    }

    fn from_offset_bits(bits: u64) -> Self {
        Self::from_scaled(scale::to_scaled_bits(bits, <Self as ScalarChannel>::BITS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_offset_bits_flip_the_sign_bit() {
        assert_eq!(i8::MIN.to_offset_bits(), 0);
        assert_eq!(0i8.to_offset_bits(), 128);
        assert_eq!(i8::MAX.to_offset_bits(), 255);
        assert_eq!(i16::from_offset_bits(0), i16::MIN);
        assert_eq!(i32::from_offset_bits(u64::from(u32::MAX)), i32::MAX);

        for value in i8::MIN..=i8::MAX {
            assert_eq!(i8::from_offset_bits(value.to_offset_bits()), value);
        }
    }

    #[test]
    fn bit_widths() {
        assert_eq!(<u8 as ScalarChannel>::BITS, 8);
        assert_eq!(<i16 as ScalarChannel>::BITS, 16);
        assert_eq!(<u32 as ScalarChannel>::BITS, 32);
        assert_eq!(<f16 as ScalarChannel>::BITS, 16);
        assert_eq!(<f32 as ScalarChannel>::CLASS, NumericClass::Float);
        assert_eq!(<i32 as ScalarChannel>::CLASS, NumericClass::Signed);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn floats_pass_through() {
        assert_eq!(1.5f32.to_scaled(), 1.5);
        assert_eq!(f32::from_scaled(-0.25), -0.25);
        assert_eq!(f16::from_f32(2.0).to_scaled(), 2.0);
        assert_eq!(f16::from_scaled(0.5), f16::from_f32(0.5));
    }
}
