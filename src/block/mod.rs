//! Fixed-rate block texture codecs and the machinery to run them over whole images.
//!
//! A block codec turns a `BLOCK_WIDTH × BLOCK_HEIGHT` tile of pixels into exactly
//! `BYTES_PER_BLOCK` bytes and back. Images are processed one block row at a time:
//! the pixel rows are padded up to whole blocks, and the encoded blocks are stored
//! left to right, top to bottom.
//!
//! # Examples
//! ```
//! # use texblock::{block::{self, bc1::Bc1}, surface::PixelBuffer, Rgba32};
//! # fn main() -> Result<(), texblock::CodecError> {
//! let mut image = PixelBuffer::<Rgba32>::new(6, 5);
//! image.set(0, 0, Rgba32::new(255, 0, 0, 255))?;
//!
//! let data = block::encode_image(&Bc1::new(), &image);
//! assert_eq!(data.len(), 2 * 2 * 8);
//!
//! let decoded = block::decode_image::<_, Rgba32>(&Bc1::new(), &data, 6, 5)?;
//! assert_eq!(decoded.get(0, 0)?, Rgba32::new(255, 0, 0, 255));
//! # Ok(())
//! # }
//! ```

pub mod bc1;
pub mod bc2;
pub mod bc3;
pub mod bc4;
pub mod bc5;
pub mod cmpr;
pub mod gx;

use crate::{
    surface::{PixelBuffer, PixelSource, PixelSurface},
    CodecError, ColorSample,
};
use palette::Srgba;
use std::array;
use tracing::{debug, trace};

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// A fixed-rate codec over rectangular pixel blocks.
///
/// `target` and `source` start at the block's top-left pixel and rows are `stride`
/// pixels apart, so each slice holds at least
/// `(BLOCK_HEIGHT - 1) * stride + BLOCK_WIDTH` pixels.
/// `block` is exactly `BYTES_PER_BLOCK` bytes long.
/// Sizes are checked by the image-level functions before any block is touched.
pub trait BlockCodec {
    /// The width of a block in pixels.
    const BLOCK_WIDTH: usize;
    /// The height of a block in pixels.
    const BLOCK_HEIGHT: usize;
    /// The size of an encoded block in bytes.
    const BYTES_PER_BLOCK: usize;

    /// Decodes one block into `target`.
    fn decode_block<C: ColorSample>(&self, block: &[u8], target: &mut [C], stride: usize);

    /// Encodes one block of `source` into `block`.
    fn encode_block<C: ColorSample>(&self, source: &[C], stride: usize, block: &mut [u8]);
}

/// The block grid covering an image of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGeometry {
    /// The image width in pixels.
    pub width: usize,
    /// The image height in pixels.
    pub height: usize,
    /// The block width in pixels.
    pub block_width: usize,
    /// The block height in pixels.
    pub block_height: usize,
    /// The encoded size of one block in bytes.
    pub bytes_per_block: usize,
    /// `ceil(width / block_width)`
    pub blocks_per_row: usize,
    /// `ceil(height / block_height)`
    pub blocks_per_column: usize,
}

impl BlockGeometry {
    /// Computes the block grid for `codec` over a `width × height` image.
    #[must_use]
    pub const fn of<B: BlockCodec>(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            block_width: B::BLOCK_WIDTH,
            block_height: B::BLOCK_HEIGHT,
            bytes_per_block: B::BYTES_PER_BLOCK,
            blocks_per_row: width.div_ceil(B::BLOCK_WIDTH),
            blocks_per_column: height.div_ceil(B::BLOCK_HEIGHT),
        }
    }

    /// Pixels per padded row.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.blocks_per_row * self.block_width
    }

    /// The number of padded rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.blocks_per_column * self.block_height
    }

    /// The number of encoded bytes in one block row.
    #[must_use]
    pub const fn row_bytes(&self) -> usize {
        self.blocks_per_row * self.bytes_per_block
    }

    /// The number of padded pixels in one block row.
    #[must_use]
    pub const fn row_pixels(&self) -> usize {
        self.stride() * self.block_height
    }

    /// The total encoded size in bytes.
    #[must_use]
    pub const fn data_size(&self) -> usize {
        self.row_bytes() * self.blocks_per_column
    }

    /// Whether the image has no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether block row `by` lies entirely inside the image.
    const fn is_full_row(&self, by: usize) -> bool {
        self.width % self.block_width == 0 && (by + 1) * self.block_height <= self.height
    }

    /// The number of image rows inside block row `by`.
    fn rows_in(&self, by: usize) -> usize {
        self.block_height.min(self.height - by * self.block_height)
    }
}

/// Decodes one block row whose pixels start at `pixels` with the given stride.
fn decode_block_row<B: BlockCodec, C: ColorSample>(
    codec: &B,
    row_data: &[u8],
    pixels: &mut [C],
    stride: usize,
) {
    for (bx, block) in row_data.chunks_exact(B::BYTES_PER_BLOCK).enumerate() {
        codec.decode_block(block, &mut pixels[bx * B::BLOCK_WIDTH..], stride);
    }
}

/// Encodes one block row whose pixels start at `pixels` with the given stride.
fn encode_block_row<B: BlockCodec, C: ColorSample>(
    codec: &B,
    pixels: &[C],
    stride: usize,
    row_data: &mut [u8],
) {
    for (bx, block) in row_data.chunks_exact_mut(B::BYTES_PER_BLOCK).enumerate() {
        codec.encode_block(&pixels[bx * B::BLOCK_WIDTH..], stride, block);
    }
}

/// Encodes block row `by` of `source`, going through `scratch` unless the row can be read in place.
fn encode_source_row<B, C, S>(
    codec: &B,
    source: &S,
    geometry: &BlockGeometry,
    by: usize,
    scratch: &mut Vec<C>,
    row_data: &mut [u8],
) where
    B: BlockCodec,
    C: ColorSample,
    S: PixelSource<C> + ?Sized,
{
    let y0 = by * B::BLOCK_HEIGHT;

    if geometry.is_full_row(by) {
        if let Some((pixels, stride)) = source.contiguous() {
            encode_block_row(codec, &pixels[y0 * stride..], stride, row_data);
            return;
        }
    }

    let stride = geometry.stride();
    scratch.clear();
    scratch.resize(geometry.row_pixels(), C::default());
    for (y, line) in scratch.chunks_exact_mut(stride).take(geometry.rows_in(by)).enumerate() {
        line[..geometry.width].copy_from_slice(&source.row(y0 + y)[..geometry.width]);
    }
    encode_block_row(codec, scratch, stride, row_data);
}

/// Decodes `data` into a new buffer padded to whole blocks.
///
/// The returned buffer reports `width × height`; the padding pixels hold whatever the
/// codec decoded there.
///
/// # Errors
/// Returns [`CodecError::SizeMismatch`] if `data` is shorter than the encoded size of the image.
pub fn decode_image<B: BlockCodec, C: ColorSample>(
    codec: &B,
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<PixelBuffer<C>, CodecError> {
    let geometry = BlockGeometry::of::<B>(width, height);
    CodecError::check_size("block data", geometry.data_size(), data.len())?;
    debug!(?geometry, "decoding block image");

    let mut buffer = PixelBuffer::padded(width, height, geometry.stride(), geometry.rows());
    if !geometry.is_empty() {
        let stride = geometry.stride();
        for (row_data, pixels) in data
            .chunks_exact(geometry.row_bytes())
            .zip(buffer.pixels_mut().chunks_exact_mut(geometry.row_pixels()))
        {
            decode_block_row(codec, row_data, pixels, stride);
        }
    }

    Ok(buffer)
}

/// Decodes `data` into an existing surface of the image's size.
///
/// Surfaces that expose contiguous memory with room for the padded block grid are written
/// in place, padding pixels included. Anything else is decoded one block row at a time
/// into a scratch buffer, and only the pixels inside the image are copied out.
/// Bytes past the encoded size of the surface are ignored.
///
/// # Errors
/// Returns [`CodecError::SizeMismatch`] if `data` is shorter than the encoded size of the surface.
pub fn decode_into<B, C, S>(codec: &B, data: &[u8], surface: &mut S) -> Result<(), CodecError>
where
    B: BlockCodec,
    C: ColorSample,
    S: PixelSurface<C> + ?Sized,
{
    let geometry = BlockGeometry::of::<B>(surface.width(), surface.height());
    CodecError::check_size("block data", geometry.data_size(), data.len())?;
    debug!(?geometry, "decoding block image into surface");

    if geometry.is_empty() {
        return Ok(());
    }

    let data = &data[..geometry.data_size()];
    if let Some((pixels, stride)) = surface.contiguous_mut() {
        if fits_padded(&geometry, pixels.len(), stride) {
            for (row_data, pixels) in data
                .chunks_exact(geometry.row_bytes())
                .zip(pixels.chunks_mut(stride * B::BLOCK_HEIGHT))
            {
                decode_block_row(codec, row_data, pixels, stride);
            }
            return Ok(());
        }
    }

    trace!("surface cannot hold the padded block grid, decoding through scratch rows");
    let stride = geometry.stride();
    let mut scratch = vec![C::default(); geometry.row_pixels()];
    for (by, row_data) in data.chunks_exact(geometry.row_bytes()).enumerate() {
        decode_block_row(codec, row_data, &mut scratch, stride);
        copy_out_row(&geometry, by, &scratch, surface);
    }

    Ok(())
}

/// Whether a contiguous surface of `len` pixels with `stride` can take whole decoded block rows.
const fn fits_padded(geometry: &BlockGeometry, len: usize, stride: usize) -> bool {
    stride >= geometry.stride() && len >= stride * (geometry.rows() - 1) + geometry.stride()
}

/// Copies the in-image part of decoded block row `by` from `scratch` to `surface`.
fn copy_out_row<C, S>(geometry: &BlockGeometry, by: usize, scratch: &[C], surface: &mut S)
where
    C: ColorSample,
    S: PixelSurface<C> + ?Sized,
{
    let y0 = by * geometry.block_height;
    for (y, line) in scratch.chunks_exact(geometry.stride()).take(geometry.rows_in(by)).enumerate() {
        surface.row_mut(y0 + y)[..geometry.width].copy_from_slice(&line[..geometry.width]);
    }
}

/// Encodes a whole image.
///
/// Pixels beyond the image's right and bottom edges are encoded as [`Default`] (zero) pixels.
pub fn encode_image<B, C, S>(codec: &B, source: &S) -> Vec<u8>
where
    B: BlockCodec,
    C: ColorSample,
    S: PixelSource<C> + ?Sized,
{
    let geometry = BlockGeometry::of::<B>(source.width(), source.height());
    let mut data = vec![0; geometry.data_size()];
    encode_rows(codec, source, &geometry, &mut data);
    data
}

/// Encodes a whole image into `data`.
///
/// # Errors
/// Returns [`CodecError::SizeMismatch`] if `data` is shorter than the encoded size of the image.
pub fn encode_into<B, C, S>(codec: &B, source: &S, data: &mut [u8]) -> Result<(), CodecError>
where
    B: BlockCodec,
    C: ColorSample,
    S: PixelSource<C> + ?Sized,
{
    let geometry = BlockGeometry::of::<B>(source.width(), source.height());
    CodecError::check_size("block data", geometry.data_size(), data.len())?;
    encode_rows(codec, source, &geometry, &mut data[..geometry.data_size()]);
    Ok(())
}

/// Encodes every block row of `source` into `data`, which is exactly `data_size` bytes long.
fn encode_rows<B, C, S>(codec: &B, source: &S, geometry: &BlockGeometry, data: &mut [u8])
where
    B: BlockCodec,
    C: ColorSample,
    S: PixelSource<C> + ?Sized,
{
    debug!(?geometry, "encoding block image");

    if geometry.is_empty() {
        return;
    }
    if source.contiguous().is_none() {
        trace!("source is not contiguous, encoding through scratch rows");
    }

    let mut scratch = Vec::new();
    for (by, row_data) in data.chunks_exact_mut(geometry.row_bytes()).enumerate() {
        encode_source_row(codec, source, geometry, by, &mut scratch, row_data);
    }
}

#[cfg(feature = "threads")]
/// Decodes `data` into a new buffer, processing block rows in parallel.
///
/// The output is identical to [`decode_image`].
///
/// # Errors
/// Returns [`CodecError::SizeMismatch`] if `data` is shorter than the encoded size of the image.
pub fn decode_image_par<B, C>(
    codec: &B,
    data: &[u8],
    width: usize,
    height: usize,
) -> Result<PixelBuffer<C>, CodecError>
where
    B: BlockCodec + Sync,
    C: ColorSample,
{
    let geometry = BlockGeometry::of::<B>(width, height);
    CodecError::check_size("block data", geometry.data_size(), data.len())?;
    debug!(?geometry, "decoding block image in parallel");

    let mut buffer = PixelBuffer::padded(width, height, geometry.stride(), geometry.rows());
    if !geometry.is_empty() {
        let stride = geometry.stride();
        data[..geometry.data_size()]
            .par_chunks_exact(geometry.row_bytes())
            .zip(buffer.pixels_mut().par_chunks_exact_mut(geometry.row_pixels()))
            .for_each(|(row_data, pixels)| decode_block_row(codec, row_data, pixels, stride));
    }

    Ok(buffer)
}

#[cfg(feature = "threads")]
/// Decodes `data` into an existing surface, processing block rows in parallel.
///
/// Surfaces without suitable contiguous memory are decoded into a temporary buffer
/// in parallel and then copied row by row.
///
/// # Errors
/// Returns [`CodecError::SizeMismatch`] if `data` is shorter than the encoded size of the surface.
pub fn decode_into_par<B, C, S>(codec: &B, data: &[u8], surface: &mut S) -> Result<(), CodecError>
where
    B: BlockCodec + Sync,
    C: ColorSample,
    S: PixelSurface<C> + ?Sized,
{
    let geometry = BlockGeometry::of::<B>(surface.width(), surface.height());
    CodecError::check_size("block data", geometry.data_size(), data.len())?;

    if geometry.is_empty() {
        return Ok(());
    }

    if let Some((pixels, stride)) = surface.contiguous_mut() {
        if fits_padded(&geometry, pixels.len(), stride) {
            debug!(?geometry, "decoding block image into surface in parallel");
            data[..geometry.data_size()]
                .par_chunks_exact(geometry.row_bytes())
                .zip(pixels.par_chunks_mut(stride * B::BLOCK_HEIGHT))
                .for_each(|(row_data, pixels)| decode_block_row(codec, row_data, pixels, stride));
            return Ok(());
        }
    }

    trace!("surface cannot hold the padded block grid, decoding through a temporary buffer");
    let decoded = decode_image_par::<B, C>(codec, data, geometry.width, geometry.height)?;
    for (by, rows) in decoded.pixels().chunks_exact(geometry.row_pixels()).enumerate() {
        copy_out_row(&geometry, by, rows, surface);
    }

    Ok(())
}

#[cfg(feature = "threads")]
/// Encodes a whole image, processing block rows in parallel.
///
/// The output is identical to [`encode_image`].
pub fn encode_image_par<B, C, S>(codec: &B, source: &S) -> Vec<u8>
where
    B: BlockCodec + Sync,
    C: ColorSample,
    S: PixelSource<C> + Sync + ?Sized,
{
    let geometry = BlockGeometry::of::<B>(source.width(), source.height());
    let mut data = vec![0; geometry.data_size()];
    encode_rows_par(codec, source, &geometry, &mut data);
    data
}

#[cfg(feature = "threads")]
/// Encodes a whole image into `data`, processing block rows in parallel.
///
/// # Errors
/// Returns [`CodecError::SizeMismatch`] if `data` is shorter than the encoded size of the image.
pub fn encode_into_par<B, C, S>(codec: &B, source: &S, data: &mut [u8]) -> Result<(), CodecError>
where
    B: BlockCodec + Sync,
    C: ColorSample,
    S: PixelSource<C> + Sync + ?Sized,
{
    let geometry = BlockGeometry::of::<B>(source.width(), source.height());
    CodecError::check_size("block data", geometry.data_size(), data.len())?;
    encode_rows_par(codec, source, &geometry, &mut data[..geometry.data_size()]);
    Ok(())
}

#[cfg(feature = "threads")]
/// The parallel version of [`encode_rows`].
fn encode_rows_par<B, C, S>(codec: &B, source: &S, geometry: &BlockGeometry, data: &mut [u8])
where
    B: BlockCodec + Sync,
    C: ColorSample,
    S: PixelSource<C> + Sync + ?Sized,
{
    debug!(?geometry, "encoding block image in parallel");

    if geometry.is_empty() {
        return;
    }

    data.par_chunks_exact_mut(geometry.row_bytes())
        .enumerate()
        .for_each_init(Vec::new, |scratch, (by, row_data)| {
            encode_source_row(codec, source, geometry, by, scratch, row_data);
        });
}

/// Reads a `width`-wide block of `N` pixels into row-major 8-bit colors.
#[inline]
pub(crate) fn load_rgba8<C: ColorSample, const N: usize>(
    source: &[C],
    stride: usize,
    width: usize,
) -> [Srgba<u8>; N] {
    array::from_fn(|i| source[i / width * stride + i % width].to_rgba8())
}

/// Writes row-major 8-bit colors into a `width`-wide block.
#[inline]
pub(crate) fn store_rgba8<C: ColorSample>(
    colors: &[Srgba<u8>],
    width: usize,
    target: &mut [C],
    stride: usize,
) {
    for (i, &color) in colors.iter().enumerate() {
        target[i / width * stride + i % width] = C::from_rgba8(color);
    }
}
