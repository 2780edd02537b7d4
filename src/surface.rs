//! The boundary between the codecs and whatever holds the pixels.
//!
//! Block codecs read from a [`PixelSource`] and write to a [`PixelSurface`].
//! Only row access is required; a surface that can also lend out its memory as one
//! strided slice lets the codecs skip their per-row scratch buffers.
//! [`PixelBuffer`] is the crate's own minimal owned implementation.

use crate::{CodecError, ColorSample};
#[cfg(feature = "image")]
use {crate::Rgba32, image::RgbaImage};

/// Read access to a rectangle of pixels.
pub trait PixelSource<C> {
    /// The number of meaningful pixels per row.
    fn width(&self) -> usize;

    /// The number of meaningful rows.
    fn height(&self) -> usize;

    /// Row `y` of the surface, holding at least [`PixelSource::width`] pixels.
    ///
    /// Callers only ask for `y < height`.
    fn row(&self, y: usize) -> &[C];

    /// The pixels as one slice with the distance between consecutive rows in pixels.
    ///
    /// The slice holds at least `stride * (height - 1) + width` pixels.
    fn contiguous(&self) -> Option<(&[C], usize)> {
        None
    }
}

/// Write access to a rectangle of pixels.
pub trait PixelSurface<C>: PixelSource<C> {
    /// Row `y` of the surface, holding at least [`PixelSource::width`] pixels.
    fn row_mut(&mut self, y: usize) -> &mut [C];

    /// The mutable counterpart of [`PixelSource::contiguous`].
    ///
    /// Every pixel of the returned slice belongs to the surface. Block decoders write whole
    /// blocks in place, so the pixels right of `width` and below `height` are used as scratch
    /// space and may be overwritten. Views into a larger image must return `None`.
    fn contiguous_mut(&mut self) -> Option<(&mut [C], usize)> {
        None
    }
}

/// An owned, row-major pixel buffer that may carry padding to the right and below the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer<C> {
    /// The number of meaningful pixels per row.
    width: usize,
    /// The number of meaningful rows.
    height: usize,
    /// The number of allocated pixels per row.
    stride: usize,
    /// The number of allocated rows.
    rows: usize,
    /// `stride * rows` pixels.
    pixels: Vec<C>,
}

impl<C: ColorSample> PixelBuffer<C> {
    /// Creates a buffer of default pixels without padding.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::padded(width, height, width, height)
    }

    /// Creates a buffer of default pixels with `stride` pixels per row and `rows` rows.
    ///
    /// Returns an error if `stride < width` or `rows < height`.
    pub fn with_padding(
        width: usize,
        height: usize,
        stride: usize,
        rows: usize,
    ) -> Result<Self, CodecError> {
        CodecError::check_size("buffer stride", width, stride)?;
        CodecError::check_size("buffer rows", height, rows)?;
        Ok(Self::padded(width, height, stride, rows))
    }

    /// Creates a padded buffer from sizes already known to be consistent.
    pub(crate) fn padded(width: usize, height: usize, stride: usize, rows: usize) -> Self {
        Self {
            width,
            height,
            stride,
            rows,
            pixels: vec![C::default(); stride * rows],
        }
    }
}

impl<C> PixelBuffer<C> {
    /// Wraps a row-major vector of exactly `width * height` pixels.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<C>) -> Result<Self, CodecError> {
        let expected = width * height;
        if pixels.len() == expected {
            Ok(Self { width, height, stride: width, rows: height, pixels })
        } else {
            Err(CodecError::SizeMismatch {
                what: "pixel vector",
                expected,
                actual: pixels.len(),
            })
        }
    }

    /// The number of meaningful pixels per row.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The number of meaningful rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The number of allocated pixels per row.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// The number of allocated rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// All allocated pixels, padding included.
    #[must_use]
    pub fn pixels(&self) -> &[C] {
        &self.pixels
    }

    /// All allocated pixels, padding included.
    pub fn pixels_mut(&mut self) -> &mut [C] {
        &mut self.pixels
    }

    /// Consumes the buffer, returning all allocated pixels.
    #[must_use]
    pub fn into_pixels(self) -> Vec<C> {
        self.pixels
    }

    /// Returns the flat index of `(x, y)` if it lies inside the image.
    fn index_of(&self, x: usize, y: usize) -> Result<usize, CodecError> {
        CodecError::check_range("x coordinate", x, self.width)?;
        CodecError::check_range("y coordinate", y, self.height)?;
        Ok(y * self.stride + x)
    }
}

impl<C: Copy> PixelBuffer<C> {
    /// The pixel at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<C, CodecError> {
        let i = self.index_of(x, y)?;
        Ok(self.pixels[i])
    }

    /// Overwrites the pixel at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, color: C) -> Result<(), CodecError> {
        let i = self.index_of(x, y)?;
        self.pixels[i] = color;
        Ok(())
    }

    /// Copies the meaningful pixels into a new buffer without padding.
    #[must_use]
    pub fn cropped(&self) -> Self {
        let pixels = if self.width == 0 {
            Vec::new()
        } else {
            self.pixels
                .chunks(self.stride)
                .take(self.height)
                .flat_map(|row| &row[..self.width])
                .copied()
                .collect()
        };
        Self {
            width: self.width,
            height: self.height,
            stride: self.width,
            rows: self.height,
            pixels,
        }
    }
}

impl<C: ColorSample> PixelBuffer<C> {
    /// Converts every pixel to another format through 16-bit RGBA.
    #[must_use]
    pub fn convert<D: ColorSample>(&self) -> PixelBuffer<D> {
        PixelBuffer {
            width: self.width,
            height: self.height,
            stride: self.stride,
            rows: self.rows,
            pixels: self
                .pixels
                .iter()
                .map(|&color| D::from_rgba16(color.to_rgba16()))
                .collect(),
        }
    }
}

impl<C> PixelSource<C> for PixelBuffer<C> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn row(&self, y: usize) -> &[C] {
        let start = y * self.stride;
        &self.pixels[start..start + self.stride]
    }

    fn contiguous(&self) -> Option<(&[C], usize)> {
        Some((&self.pixels, self.stride))
    }
}

impl<C> PixelSurface<C> for PixelBuffer<C> {
    fn row_mut(&mut self, y: usize) -> &mut [C] {
        let start = y * self.stride;
        &mut self.pixels[start..start + self.stride]
    }

    fn contiguous_mut(&mut self) -> Option<(&mut [C], usize)> {
        Some((&mut self.pixels, self.stride))
    }
}

#[cfg(feature = "image")]
impl PixelBuffer<Rgba32> {
    /// Copies an [`RgbaImage`] into a new buffer without padding.
    #[must_use]
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let pixels = image
            .as_raw()
            .chunks_exact(4)
            .map(|p| Rgba32::new(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            stride: image.width() as usize,
            rows: image.height() as usize,
            pixels,
        }
    }

    /// Copies the meaningful pixels into a new [`RgbaImage`].
    ///
    /// Returns an error if either dimension does not fit in a `u32`.
    pub fn to_rgba_image(&self) -> Result<RgbaImage, CodecError> {
        let dimension = |what, value: usize| {
            u32::try_from(value).map_err(|_| CodecError::OutOfRange {
                what,
                value: value as u64,
                bound: u64::from(u32::MAX) + 1,
            })
        };
        let width = dimension("image width", self.width)?;
        let height = dimension("image height", self.height)?;

        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let Rgba32 { r, g, b, a } = self.pixels[y as usize * self.stride + x as usize];
            image::Rgba([r, g, b, a])
        }))
    }
}

/// A surface that only exposes rows, for exercising the scratch-buffer paths.
#[cfg(test)]
pub(crate) struct RowsOnly<C>(pub(crate) PixelBuffer<C>);

#[cfg(test)]
impl<C> PixelSource<C> for RowsOnly<C> {
    fn width(&self) -> usize {
        self.0.width
    }

    fn height(&self) -> usize {
        self.0.height
    }

    fn row(&self, y: usize) -> &[C] {
        self.0.row(y)
    }
}

#[cfg(test)]
impl<C> PixelSurface<C> for RowsOnly<C> {
    fn row_mut(&mut self, y: usize) -> &mut [C] {
        self.0.row_mut(y)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Rgba32, L8};

    #[test]
    fn out_of_range_access() {
        let mut buffer = PixelBuffer::<L8>::new(3, 2);
        assert_eq!(
            buffer.get(3, 0),
            Err(CodecError::OutOfRange { what: "x coordinate", value: 3, bound: 3 })
        );
        assert_eq!(
            buffer.set(0, 2, L8(1)),
            Err(CodecError::OutOfRange { what: "y coordinate", value: 2, bound: 2 })
        );
        buffer.set(2, 1, L8(7)).unwrap();
        assert_eq!(buffer.get(2, 1).unwrap(), L8(7));
    }

    #[test]
    fn padding_is_validated() {
        assert!(PixelBuffer::<L8>::with_padding(4, 4, 3, 4).is_err());
        assert!(PixelBuffer::<L8>::with_padding(4, 4, 4, 3).is_err());

        let buffer = PixelBuffer::<L8>::with_padding(3, 3, 4, 4).unwrap();
        assert_eq!(buffer.pixels().len(), 16);
        assert_eq!(buffer.row(1).len(), 4);
    }

    #[test]
    fn from_pixels_checks_length() {
        assert_eq!(
            PixelBuffer::from_pixels(2, 2, vec![L8(0); 3]),
            Err(CodecError::SizeMismatch { what: "pixel vector", expected: 4, actual: 3 })
        );
        let buffer = PixelBuffer::from_pixels(2, 1, vec![L8(1), L8(2)]).unwrap();
        assert_eq!(buffer.get(1, 0).unwrap(), L8(2));
    }

    #[test]
    fn cropping_drops_padding() {
        let mut buffer = PixelBuffer::<L8>::with_padding(2, 2, 4, 4).unwrap();
        buffer.pixels_mut().iter_mut().enumerate().for_each(|(i, p)| {
            #[allow(clippy::cast_possible_truncation)]
            {
                *p = L8(i as u8);
            }
        });
        let cropped = buffer.cropped();
        assert_eq!(cropped.pixels(), &[L8(0), L8(1), L8(4), L8(5)]);
        assert_eq!(cropped.stride(), 2);
    }

    #[test]
    fn conversion_keeps_geometry() {
        let mut buffer = PixelBuffer::<Rgba32>::new(2, 1);
        buffer.set(0, 0, Rgba32::new(255, 255, 255, 255)).unwrap();
        let gray = buffer.convert::<L8>();
        assert_eq!(gray.width(), 2);
        assert_eq!(gray.get(0, 0).unwrap(), L8(255));
        assert_eq!(gray.get(1, 0).unwrap(), L8(0));
    }

    #[test]
    #[cfg(feature = "image")]
    #[allow(clippy::cast_possible_truncation)]
    fn image_round_trip() {
        let image = RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8, y as u8, 7, 255]));
        let buffer = PixelBuffer::from_rgba_image(&image);
        assert_eq!(buffer.get(2, 1).unwrap(), Rgba32::new(2, 1, 7, 255));
        assert_eq!(buffer.to_rgba_image().unwrap(), image);
    }
}
