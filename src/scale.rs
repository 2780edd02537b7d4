//! Exact conversion between native channel values, normalized values, and other bit depths.
//!
//! There are two layers here:
//! - runtime-width functions over raw unsigned bit patterns of `1..=64` bits
//!   ([`to_scaled_bits`], [`from_scaled_bits`], [`rescale_bits`]), used for packed channels
//!   like the 5-bit red of a 5-6-5 pixel, and
//! - generic functions over [`ScalarChannel`] types ([`to_scaled_float`],
//!   [`from_scaled_float`], [`scale_bits`]) for channels stored in their own integer or float.
//!
//! Widening always replicates the input bits into the low bits of the output instead of
//! zero-filling, so that the maximum input maps to the maximum output.

use crate::{NumericClass, ScalarChannel};

/// The largest value representable in `bits` bits.
#[must_use]
#[inline]
pub const fn max_value(bits: u8) -> u64 {
    match bits {
        0 => 0,
        64.. => u64::MAX,
        _ => (1 << bits) - 1,
    }
}

/// Maps an unsigned value of the given width onto `[0, 1]`.
#[must_use]
#[inline]
#[allow(clippy::cast_precision_loss)]
pub fn to_scaled_bits(value: u64, bits: u8) -> f64 {
    let max = max_value(bits);
    if max == 0 {
        0.0
    } else {
        (value & max) as f64 / max as f64
    }
}

/// Maps a normalized value onto an unsigned value of the given width.
///
/// The input is clamped to `[0, 1]` and rounded to the nearest representable value.
#[must_use]
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn from_scaled_bits(scaled: f64, bits: u8) -> u64 {
    let max = max_value(bits);
    (scaled.clamp(0.0, 1.0) * max as f64).round() as u64
}

/// Rescales an unsigned value from one bit width to another without leaving the integer domain.
///
/// Narrowing drops the low bits. Widening repeats the input bit pattern downward until
/// the output is filled, e.g. 8 to 16 bits is `v << 8 | v` and 5 to 8 bits is `v << 3 | v >> 2`.
#[must_use]
#[inline]
pub const fn rescale_bits(value: u64, from: u8, to: u8) -> u64 {
    if from == 0 || to == 0 {
        return 0;
    }

    let value = value & max_value(from);
    if from >= to {
        return value >> (from - to);
    }

    let from = from as u32;
    let mut remaining = to as u32 - from;
    let mut out = value << remaining;
    while remaining > 0 {
        if remaining >= from {
            remaining -= from;
            out |= value << remaining;
        } else {
            out |= value >> (from - remaining);
            remaining = 0;
        }
    }
    out
}

/// Widens an 8-bit value to 16 bits by replicating the byte into both halves.
#[must_use]
#[inline]
pub const fn widen_8_to_16(value: u8) -> u16 {
    (value as u16) << 8 | value as u16
}

/// Narrows a 16-bit value to 8 bits by keeping the high byte.
#[must_use]
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn narrow_16_to_8(value: u16) -> u8 {
    (value >> 8) as u8
}

/// Converts a native channel value into a normalized value.
#[must_use]
#[inline]
pub fn to_scaled_float<T: ScalarChannel>(value: T) -> f64 {
    value.to_scaled()
}

/// Converts a normalized value into a native channel value.
#[must_use]
#[inline]
pub fn from_scaled_float<T: ScalarChannel>(scaled: f64) -> T {
    T::from_scaled(scaled)
}

/// Converts a value from one channel representation to another.
///
/// Integer to integer conversions stay in the integer domain (see [`rescale_bits`]),
/// with signed values realigned through their offset representation,
/// i.e. half of the output range is added or subtracted when signedness differs.
/// Anything involving a floating point kind goes through the normalized value instead.
#[must_use]
#[inline]
pub fn scale_bits<TIn: ScalarChannel, TOut: ScalarChannel>(value: TIn) -> TOut {
    if TIn::CLASS == NumericClass::Float || TOut::CLASS == NumericClass::Float {
        TOut::from_scaled(value.to_scaled())
    } else {
        TOut::from_offset_bits(rescale_bits(value.to_offset_bits(), TIn::BITS, TOut::BITS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn exhaustive_round_trip_up_to_16_bits() {
        for bits in 1..=16 {
            for value in 0..=max_value(bits) {
                assert_eq!(from_scaled_bits(to_scaled_bits(value, bits), bits), value);
            }
        }
    }

    #[test]
    fn boundary_round_trip_for_wider_channels() {
        for bits in 17..=52 {
            let max = max_value(bits);
            for value in [0, 1, 2, max / 2, max / 2 + 1, max - 1, max] {
                assert_eq!(from_scaled_bits(to_scaled_bits(value, bits), bits), value);
            }
        }

        for value in [u32::MIN, 1, u32::MAX / 2, u32::MAX - 1, u32::MAX] {
            assert_eq!(from_scaled_float::<u32>(to_scaled_float(value)), value);
        }
        for value in [i32::MIN, -1, 0, 1, i32::MAX - 1, i32::MAX] {
            assert_eq!(from_scaled_float::<i32>(to_scaled_float(value)), value);
        }
    }

    #[test]
    fn native_round_trip() {
        for value in u8::MIN..=u8::MAX {
            assert_eq!(from_scaled_float::<u8>(to_scaled_float(value)), value);
        }
        for value in i8::MIN..=i8::MAX {
            assert_eq!(from_scaled_float::<i8>(to_scaled_float(value)), value);
        }
        for value in u16::MIN..=u16::MAX {
            assert_eq!(from_scaled_float::<u16>(to_scaled_float(value)), value);
        }
        for value in i16::MIN..=i16::MAX {
            assert_eq!(from_scaled_float::<i16>(to_scaled_float(value)), value);
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn unsigned_8_bit_scaling() {
        assert_eq!(to_scaled_float(0u8), 0.0);
        assert_eq!(to_scaled_float(255u8), 1.0);
        assert!((0.49..0.51).contains(&to_scaled_float(127u8)));
        assert!((0.49..0.51).contains(&to_scaled_float(128u8)));
    }

    #[test]
    fn signed_full_range_remap() {
        assert_eq!(from_scaled_float::<i8>(0.0), -128);
        assert_eq!(from_scaled_float::<i8>(1.0), 127);
        assert_eq!(from_scaled_float::<i16>(0.0), i16::MIN);
        assert_eq!(from_scaled_float::<i16>(1.0), i16::MAX);
    }

    #[test]
    fn integer_inputs_are_clamped() {
        assert_eq!(from_scaled_float::<u8>(-3.0), 0);
        assert_eq!(from_scaled_float::<u8>(7.5), 255);
        assert_eq!(from_scaled_float::<i8>(1.5), 127);
    }

    #[test]
    fn widening_replicates_bits() {
        assert_eq!(scale_bits::<u8, u16>(0xFF), 0xFFFF);
        assert_eq!(scale_bits::<u8, u16>(0x00), 0x0000);
        assert_eq!(scale_bits::<u8, u16>(0x12), 0x1212);
        assert_eq!(scale_bits::<u8, u32>(0xAB), 0xABAB_ABAB);
        assert_eq!(scale_bits::<u16, u32>(0xFFFF), u32::MAX);

        for value in u8::MIN..=u8::MAX {
            assert_eq!(scale_bits::<u8, u16>(value), widen_8_to_16(value));
            assert_eq!(u16::from(value) << 8 | u16::from(value), widen_8_to_16(value));
        }

        assert_eq!(rescale_bits(0b11111, 5, 8), 0xFF);
        assert_eq!(rescale_bits(0b10000, 5, 8), 0b1000_0100);
        assert_eq!(rescale_bits(0b100000, 6, 8), 0b1000_0010);
        assert_eq!(rescale_bits(1, 1, 8), 0xFF);
        assert_eq!(rescale_bits(0xF, 4, 8), 0xFF);
        assert_eq!(rescale_bits(0x9, 4, 8), 0x99);
    }

    #[test]
    fn narrowing_shifts_right() {
        assert_eq!(scale_bits::<u16, u8>(0xFFFF), 0xFF);
        assert_eq!(scale_bits::<u16, u8>(0x12FF), 0x12);
        assert_eq!(rescale_bits(0xFF, 8, 5), 0x1F);
        assert_eq!(rescale_bits(0x84, 8, 5), 0x10);
        for value in u8::MIN..=u8::MAX {
            assert_eq!(narrow_16_to_8(widen_8_to_16(value)), value);
        }
    }

    #[test]
    fn signedness_realigns_zero_points() {
        assert_eq!(scale_bits::<i8, u8>(i8::MIN), 0);
        assert_eq!(scale_bits::<i8, u8>(0), 128);
        assert_eq!(scale_bits::<u8, i8>(255), i8::MAX);
        assert_eq!(scale_bits::<i8, i16>(i8::MAX), i16::MAX);
        assert_eq!(scale_bits::<i16, i8>(i16::MIN), i8::MIN);
        assert_eq!(scale_bits::<i8, u16>(0), 0x8080);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn floats_use_the_scaled_round_trip() {
        assert_eq!(scale_bits::<f32, u8>(1.0), 255);
        assert_eq!(scale_bits::<f32, u8>(2.0), 255);
        assert_eq!(scale_bits::<u8, f16>(255), f16::from_f32(1.0));
        assert_eq!(scale_bits::<u16, f32>(0), 0.0);
        assert_eq!(scale_bits::<f16, f32>(f16::from_f32(1.5)), 1.5);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn zero_width_channels() {
        assert_eq!(max_value(0), 0);
        assert_eq!(to_scaled_bits(5, 0), 0.0);
        assert_eq!(from_scaled_bits(1.0, 0), 0);
        assert_eq!(rescale_bits(5, 0, 8), 0);
        assert_eq!(rescale_bits(5, 8, 0), 0);
        assert_eq!(max_value(64), u64::MAX);
    }
}
