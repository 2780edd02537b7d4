//! A library of pixel formats and texture codecs.
//!
//! `texblock` has three layers:
//! - Pixel format descriptors ([`PixelFormatDescriptor`], [`ChannelDescriptor`]) and the
//!   [`scale`] engine, which rescales channel values between bit depths and numeric kinds exactly.
//! - Concrete pixel formats implementing [`ColorSample`], from [`Rgba32`] and [`Bgr565`]
//!   to [`L16`] and [`RgbaHalf`].
//! - Algorithms over any [`ColorSample`]: the fixed-rate [`block`] texture codecs
//!   (BC1 to BC5, GameCube/Wii CMPR and tile formats) and the adaptive [`palette`](crate::palette) quantizer.
//!
//! # Features
//! `texblock` has the following `cargo` features, both enabled by default:
//! - `threads`: exposes parallel versions of the image-level block functions via [`rayon`].
//! - `image`: enables conversions between [`surface::PixelBuffer`] and the [`image`] crate's `RgbaImage`.
//!
//! # Example
//! ```
//! # use texblock::{block::{self, bc3::Bc3}, surface::PixelBuffer, Rgba32};
//! # fn main() -> Result<(), texblock::CodecError> {
//! let image = PixelBuffer::from_pixels(2, 2, vec![Rgba32::new(0, 0, 255, 128); 4])?;
//!
//! let data = block::encode_image(&Bc3::new(), &image);
//! let decoded = block::decode_image::<_, Rgba32>(&Bc3::new(), &data, 2, 2)?;
//! assert_eq!(decoded.cropped(), image);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod color;
mod error;
mod format;
mod traits;

pub mod block;
pub mod palette;
pub mod scale;
pub mod surface;

pub use color::*;
pub use error::CodecError;
pub use format::*;
pub use traits::*;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{surface::PixelBuffer, ColorSample};
    use palette::Srgba;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    /// A `width × height` buffer of random colors, the same for every call with the same size.
    pub fn test_image<C: ColorSample>(width: usize, height: usize) -> PixelBuffer<C> {
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
        let mut image = PixelBuffer::new(width, height);
        for pixel in image.pixels_mut() {
            let [r, g, b, a] = rng.gen::<[u8; 4]>();
            *pixel = C::from_rgba8(Srgba::new(r, g, b, a));
        }
        image
    }
}
