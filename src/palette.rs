//! Indexed images over a bounded, reference-counted palette.
//!
//! An [`IndexedImage`] stores one [`PaletteIndex`] per pixel. New colors are appended
//! to the palette while it has room. Once it is full, the two least distinguishable
//! entries (counting the new color) are merged into one, weighted by how many pixels
//! use each, and the freed slot goes to the new color.
//!
//! # Examples
//! ```
//! # use texblock::{palette::IndexedImage, Rgba32};
//! # fn main() -> Result<(), texblock::CodecError> {
//! let mut image = IndexedImage::<Rgba32, u8>::new(4, 4, 2)?;
//! image.set_pixel(0, 0, Rgba32::new(255, 0, 0, 255))?;
//! assert_eq!(image.palette().len(), 2);
//!
//! // the palette is full, so the red and the orange are merged
//! image.set_pixel(1, 0, Rgba32::new(255, 64, 0, 255))?;
//! assert_eq!(image.palette().len(), 2);
//! # Ok(())
//! # }
//! ```

use crate::{
    surface::{PixelBuffer, PixelSource},
    CodecError, ColorSample,
};
use ordered_float::OrderedFloat;
use std::fmt::Debug;
use tracing::debug;
use wide::f32x4;

/// An integer type usable as a per-pixel palette index.
pub trait PaletteIndex: Copy + Eq + Default + Debug + Send + Sync + 'static {
    /// The number of distinct palette slots this type can address.
    const MAX_COLORS: usize;

    /// Converts a slot below [`PaletteIndex::MAX_COLORS`] into an index.
    fn from_slot(slot: usize) -> Self;

    /// Converts this index into a slot.
    fn to_slot(self) -> usize;
}

macro_rules! palette_index {
    ($int: ty) => {
        impl PaletteIndex for $int {
            const MAX_COLORS: usize = 1 << <$int>::BITS;

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_slot(slot: usize) -> Self {
                slot as $int
            }

            #[inline]
            fn to_slot(self) -> usize {
                usize::from(self)
            }
        }
    };
}

palette_index!(u8);
palette_index!(u16);

/// A bounded palette with a reference count per slot.
///
/// Only the first [`Palette::len`] slots are in use.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette<C> {
    /// Every slot, in use or not.
    colors: Vec<C>,
    /// The number of references to each slot: pixels, plus those handed out by
    /// [`IndexedImage::resolve_color`].
    counts: Vec<usize>,
    /// The number of slots in use.
    used: usize,
}

impl<C: ColorSample> Palette<C> {
    /// A palette of `capacity` slots with slot 0 in use by the default color.
    fn new(capacity: usize, count: usize) -> Self {
        let mut counts = vec![0; capacity];
        counts[0] = count;
        Self { colors: vec![C::default(); capacity], counts, used: 1 }
    }

    /// The maximum number of colors.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.colors.len()
    }

    /// The number of colors in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.used
    }

    /// Whether no colors are in use. Always `false`, since slot 0 is in use from the start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Whether every slot is in use.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.used == self.capacity()
    }

    /// The colors in use.
    #[must_use]
    pub fn colors(&self) -> &[C] {
        &self.colors[..self.used]
    }

    /// The reference count of each color in use.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts[..self.used]
    }

    /// Position of `color` among the colors in use.
    fn find(&self, color: C) -> Option<usize> {
        self.colors().iter().position(|&c| c == color)
    }

    /// Puts `color` into the next free slot.
    fn push(&mut self, color: C) -> usize {
        let slot = self.used;
        self.colors[slot] = color;
        self.counts[slot] = 0;
        self.used += 1;
        slot
    }
}

/// The distance between two normalized colors, scaled up by their alpha difference.
#[inline]
fn merge_distance(a: f32x4, b: f32x4) -> f32 {
    let d = (a - b).to_array();
    let length = d.iter().map(|c| c * c).sum::<f32>().sqrt();
    length * (1.0 + d[3].abs())
}

/// The closest pair `(i, j)`, `i < j`, preferring the first pair found on ties.
fn closest_pair(colors: &[f32x4]) -> Option<(usize, usize)> {
    (0..colors.len())
        .flat_map(|i| (i + 1..colors.len()).map(move |j| (i, j)))
        .min_by_key(|&(i, j)| OrderedFloat(merge_distance(colors[i], colors[j])))
}

/// Blends `a` towards `b` by `t`.
fn lerp<C: ColorSample>(a: C, b: C, t: f32) -> C {
    let a = f32x4::new(a.to_scaled_vector4());
    let b = f32x4::new(b.to_scaled_vector4());
    C::from_scaled_vector4((a + (b - a) * f32x4::splat(t)).to_array())
}

/// An image storing one palette index per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedImage<C, I> {
    /// The width of the image in pixels.
    width: usize,
    /// The height of the image in pixels.
    height: usize,
    /// The palette index of each pixel, row-major.
    indices: Vec<I>,
    /// The colors the indices refer to.
    palette: Palette<C>,
}

impl<C: ColorSample, I: PaletteIndex> IndexedImage<C, I> {
    /// Creates an image whose pixels all use slot 0, the default color.
    ///
    /// # Errors
    /// Returns [`CodecError::OutOfRange`] if `capacity` is zero or more than
    /// [`PaletteIndex::MAX_COLORS`].
    pub fn new(width: usize, height: usize, capacity: usize) -> Result<Self, CodecError> {
        if capacity == 0 || capacity > I::MAX_COLORS {
            return Err(CodecError::OutOfRange {
                what: "palette capacity",
                value: capacity as u64,
                bound: I::MAX_COLORS as u64 + 1,
            });
        }

        let len = width * height;
        Ok(Self {
            width,
            height,
            indices: vec![I::default(); len],
            palette: Palette::new(capacity, len),
        })
    }

    /// Quantizes every pixel of `source` into a new image, row by row.
    ///
    /// # Errors
    /// See [`IndexedImage::new`].
    pub fn from_source<S: PixelSource<C> + ?Sized>(
        source: &S,
        capacity: usize,
    ) -> Result<Self, CodecError> {
        let mut image = Self::new(source.width(), source.height(), capacity)?;
        for y in 0..image.height {
            for (x, &color) in source.row(y)[..image.width].iter().enumerate() {
                image.assign(y * image.width + x, color, 1);
            }
        }
        Ok(image)
    }

    /// The width of the image in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The height of the image in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The palette index of each pixel, row-major.
    #[must_use]
    pub fn indices(&self) -> &[I] {
        &self.indices
    }

    /// The palette of this image.
    #[must_use]
    pub fn palette(&self) -> &Palette<C> {
        &self.palette
    }

    /// The position of `(x, y)` in the indices.
    fn index_of(&self, x: usize, y: usize) -> Result<usize, CodecError> {
        CodecError::check_range("x coordinate", x, self.width)?;
        CodecError::check_range("y coordinate", y, self.height)?;
        Ok(y * self.width + x)
    }

    /// The palette index of the pixel at `(x, y)`.
    ///
    /// # Errors
    /// Returns [`CodecError::OutOfRange`] if `(x, y)` is outside the image.
    pub fn index(&self, x: usize, y: usize) -> Result<I, CodecError> {
        Ok(self.indices[self.index_of(x, y)?])
    }

    /// The color of the pixel at `(x, y)`.
    ///
    /// # Errors
    /// Returns [`CodecError::OutOfRange`] if `(x, y)` is outside the image.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<C, CodecError> {
        Ok(self.palette.colors[self.index(x, y)?.to_slot()])
    }

    /// Sets the pixel at `(x, y)` to `color`, resolving it into the palette.
    ///
    /// Returns the palette index the pixel now uses. The color actually stored may differ
    /// from `color` if the palette had to merge entries.
    ///
    /// # Errors
    /// Returns [`CodecError::OutOfRange`] if `(x, y)` is outside the image.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: C) -> Result<I, CodecError> {
        let i = self.index_of(x, y)?;
        Ok(self.assign(i, color, 1))
    }

    /// Moves the pixel at `i` to the slot of `color`, keeping the counts balanced.
    fn assign(&mut self, i: usize, color: C, count: usize) -> I {
        let old = self.indices[i].to_slot();
        self.palette.counts[old] -= 1;
        let index = self.resolve_color(color, count);
        self.indices[i] = index;
        index
    }

    /// Finds or makes a palette slot for `color`, returning its index.
    ///
    /// `count` is the number of references about to use `color`. It weighs the color
    /// when the palette is full and two entries have to be merged, and is added to the
    /// reference count of the returned slot. References held outside the image keep their
    /// slot from being overwritten, but are not rewritten when a later merge moves its pixels.
    ///
    /// At most one merge happens per call. When the merge frees an existing slot,
    /// every pixel using it is moved to the slot it was merged into, in one pass.
    pub fn resolve_color(&mut self, color: C, count: usize) -> I {
        let slot = self.select_slot(color, count);
        self.palette.counts[slot] += count;
        I::from_slot(slot)
    }

    /// The slot `color` goes into, merging entries if the palette is full.
    fn select_slot(&mut self, color: C, count: usize) -> usize {
        if let Some(slot) = self.palette.find(color) {
            return slot;
        }

        if !self.palette.is_full() {
            return self.palette.push(color);
        }

        let candidate = self.palette.used;
        let vectors = self
            .palette
            .colors()
            .iter()
            .chain([&color])
            .map(|c| f32x4::new(c.to_scaled_vector4()))
            .collect::<Vec<_>>();

        let (i, j) = closest_pair(&vectors).unwrap_or((0, candidate));

        let usage1 = self.palette.counts[i];
        let usage2 = if j == candidate { count } else { self.palette.counts[j] };
        let color_j = if j == candidate { color } else { self.palette.colors[j] };

        if usage1 == 0 {
            self.palette.colors[i] = color;
            return i;
        }

        #[allow(clippy::cast_precision_loss)]
        let t = usage2 as f32 / (usage1 + usage2) as f32;
        self.palette.colors[i] = lerp(self.palette.colors[i], color_j, t);
        debug!(i, j, usage1, usage2, "merged palette entries");

        if j == candidate {
            return i;
        }

        self.remap(&[(j, i)]);
        self.palette.colors[j] = color;
        j
    }

    /// Applies a rewrite plan of `(from, to)` slot pairs over every pixel, moving the counts along.
    fn remap(&mut self, plan: &[(usize, usize)]) {
        let mut table = (0..self.palette.capacity()).collect::<Vec<_>>();
        for &(from, to) in plan {
            table[from] = to;
            self.palette.counts[to] += self.palette.counts[from];
            self.palette.counts[from] = 0;
        }

        for index in &mut self.indices {
            *index = I::from_slot(table[index.to_slot()]);
        }
    }

    /// Expands the indices into a buffer of colors.
    #[must_use]
    pub fn to_buffer(&self) -> PixelBuffer<C> {
        let mut buffer = PixelBuffer::new(self.width, self.height);
        for (pixel, index) in buffer.pixels_mut().iter_mut().zip(&self.indices) {
            *pixel = self.palette.colors[index.to_slot()];
        }
        buffer
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::test_image, Rgba32};

    const RED: Rgba32 = Rgba32::new(255, 0, 0, 255);
    const GREEN: Rgba32 = Rgba32::new(0, 255, 0, 255);
    const BLUE: Rgba32 = Rgba32::new(0, 0, 255, 255);

    fn assert_counts_match<C: ColorSample, I: PaletteIndex>(image: &IndexedImage<C, I>) {
        let mut counts = vec![0; image.palette().len()];
        for index in image.indices() {
            counts[index.to_slot()] += 1;
        }
        assert_eq!(counts, image.palette().counts());
    }

    #[test]
    fn capacity_is_bounded_by_index_type() {
        assert!(IndexedImage::<Rgba32, u8>::new(1, 1, 256).is_ok());
        assert_eq!(
            IndexedImage::<Rgba32, u8>::new(1, 1, 257),
            Err(CodecError::OutOfRange { what: "palette capacity", value: 257, bound: 257 })
        );
        assert!(IndexedImage::<Rgba32, u8>::new(1, 1, 0).is_err());
        assert!(IndexedImage::<Rgba32, u16>::new(1, 1, 65536).is_ok());
    }

    #[test]
    fn slot_zero_holds_the_default_color() {
        let image = IndexedImage::<Rgba32, u8>::new(3, 2, 4).unwrap();
        assert_eq!(image.palette().colors(), &[Rgba32::default()]);
        assert_eq!(image.palette().counts(), &[6]);
        assert_eq!(image.get_pixel(2, 1).unwrap(), Rgba32::default());
    }

    #[test]
    fn exact_matches_and_appends() {
        let mut image = IndexedImage::<Rgba32, u8>::new(2, 2, 4).unwrap();
        assert_eq!(image.set_pixel(1, 1, Rgba32::default()).unwrap(), 0);
        assert_eq!(image.set_pixel(0, 0, RED).unwrap(), 1);
        assert_eq!(image.set_pixel(1, 0, GREEN).unwrap(), 2);
        assert_eq!(image.set_pixel(0, 1, RED).unwrap(), 1);

        assert_eq!(image.palette().colors(), &[Rgba32::default(), RED, GREEN]);
        assert_eq!(image.palette().counts(), &[1, 2, 1]);
        assert_eq!(image.get_pixel(0, 1).unwrap(), RED);
        assert_counts_match(&image);
    }

    #[test]
    fn candidate_merges_into_closest_entry() {
        let mut image = IndexedImage::<Rgba32, u8>::new(4, 1, 2).unwrap();
        image.set_pixel(0, 0, BLUE).unwrap();
        image.set_pixel(1, 0, BLUE).unwrap();
        image.set_pixel(2, 0, BLUE).unwrap();

        let index = image.set_pixel(3, 0, Rgba32::new(0, 0, 251, 255)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(image.palette().len(), 2);
        // three pixels of 255 and one of 251
        assert_eq!(image.palette().colors()[1], Rgba32::new(0, 0, 254, 255));
        assert_eq!(image.palette().counts(), &[0, 4]);
    }

    #[test]
    fn overflow_merges_existing_entries() {
        let mut image = IndexedImage::<Rgba32, u8>::new(8, 1, 3).unwrap();
        let dark = Rgba32::new(0, 0, 0, 255);
        let navy = Rgba32::new(0, 0, 60, 255);
        for x in 0..3 {
            image.set_pixel(x, 0, dark).unwrap();
        }
        image.set_pixel(3, 0, navy).unwrap();
        assert_eq!(image.palette().colors(), &[Rgba32::default(), dark, navy]);
        assert_eq!(image.palette().counts(), &[4, 3, 1]);

        // dark and navy are the closest pair, and navy's slot goes to red
        let index = image.set_pixel(4, 0, RED).unwrap();
        assert_eq!(index, 2);
        assert_eq!(image.palette().len(), 3);
        let merged = Rgba32::new(0, 0, 15, 255);
        assert_eq!(image.palette().colors(), &[Rgba32::default(), merged, RED]);
        for x in 0..4 {
            assert_eq!(image.index(x, 0).unwrap(), 1);
        }
        assert_eq!(image.get_pixel(4, 0).unwrap(), RED);
        assert_eq!(image.palette().counts(), &[3, 4, 1]);
        assert_counts_match(&image);
    }

    #[test]
    fn merged_color_is_usage_weighted() {
        let mut image = IndexedImage::<Rgba32, u8>::new(5, 1, 3).unwrap();
        let gray = Rgba32::new(100, 100, 100, 255);
        let light = Rgba32::new(140, 140, 140, 255);
        let white = Rgba32::new(255, 255, 255, 255);
        image.set_pixel(0, 0, gray).unwrap();
        image.set_pixel(4, 0, gray).unwrap();
        for x in 1..4 {
            image.set_pixel(x, 0, light).unwrap();
        }
        assert_eq!(image.palette().colors(), &[Rgba32::default(), gray, light]);

        // one gray pixel is left against three light ones
        let index = image.set_pixel(0, 0, white).unwrap();
        assert_eq!(index, 2);
        let merged = Rgba32::new(130, 130, 130, 255);
        assert_eq!(image.palette().colors(), &[Rgba32::default(), merged, white]);
        for x in 1..5 {
            assert_eq!(image.get_pixel(x, 0).unwrap(), merged);
        }
        assert_eq!(image.palette().counts(), &[0, 4, 1]);
    }

    #[test]
    fn single_slot_palette() {
        let mut image = IndexedImage::<Rgba32, u8>::new(2, 1, 1).unwrap();
        assert_eq!(image.set_pixel(0, 0, RED).unwrap(), 0);
        assert_eq!(image.palette().colors(), &[Rgba32::new(128, 0, 0, 128)]);
        assert_counts_match(&image);
    }

    #[test]
    fn unused_entries_are_overwritten() {
        let mut image = IndexedImage::<Rgba32, u8>::new(1, 1, 2).unwrap();
        image.set_pixel(0, 0, RED).unwrap();
        assert_eq!(image.palette().counts(), &[0, 1]);

        let index = image.resolve_color(Rgba32::new(10, 0, 0, 0), 1);
        assert_eq!(index, 0);
        assert_eq!(image.palette().colors(), &[Rgba32::new(10, 0, 0, 0), RED]);
        assert_eq!(image.palette().counts(), &[1, 1]);
    }

    #[test]
    fn resolved_references_are_counted() {
        let red = Rgba32::new(100, 0, 0, 255);
        let blue = Rgba32::new(0, 0, 250, 255);
        let brighter = Rgba32::new(120, 0, 0, 255);

        let mut image = IndexedImage::<Rgba32, u8>::new(1, 1, 3).unwrap();
        assert_eq!(image.resolve_color(red, 5), 1);
        assert_eq!(image.resolve_color(blue, 5), 2);
        assert_eq!(image.resolve_color(red, 2), 1);
        assert_eq!(image.palette().counts(), &[1, 7, 5]);

        // red is referenced, so it is merged with rather than overwritten
        assert_eq!(image.resolve_color(brighter, 21), 1);
        let merged = Rgba32::new(115, 0, 0, 255);
        assert_eq!(image.palette().colors(), &[Rgba32::default(), merged, blue]);
        assert_eq!(image.palette().counts(), &[1, 28, 5]);
    }

    #[test]
    fn count_weighs_the_merge() {
        let red = Rgba32::new(100, 0, 0, 255);
        let brighter = Rgba32::new(120, 0, 0, 255);
        let merged = |count| {
            let mut image = IndexedImage::<Rgba32, u8>::new(1, 1, 2).unwrap();
            image.resolve_color(red, 4);
            assert_eq!(image.resolve_color(brighter, count), 1);
            image.palette().colors()[1]
        };

        assert_eq!(merged(4), Rgba32::new(110, 0, 0, 255));
        assert_eq!(merged(12), Rgba32::new(115, 0, 0, 255));
    }

    #[test]
    fn alpha_differences_are_penalized() {
        let vectors = [
            f32x4::new([0.5, 0.5, 0.5, 1.0]),
            f32x4::new([0.5, 0.5, 0.5, 0.6]),
            f32x4::new([0.0, 0.5, 0.5, 1.0]),
        ];
        assert_eq!(closest_pair(&vectors), Some((0, 2)));
        assert!(merge_distance(vectors[0], vectors[1]) > merge_distance(vectors[0], vectors[2]));

        let vectors = [f32x4::splat(0.0), f32x4::splat(1.0), f32x4::splat(0.0)];
        assert_eq!(closest_pair(&vectors), Some((0, 2)));
        assert_eq!(closest_pair(&[f32x4::splat(0.5); 3]), Some((0, 1)));
        assert_eq!(closest_pair(&vectors[..1]), None);
    }

    #[test]
    fn from_source_keeps_counts_consistent() {
        let source = test_image::<Rgba32>(17, 9);
        let image = IndexedImage::<Rgba32, u8>::from_source(&source, 16).unwrap();
        assert_eq!(image.palette().len(), 16);
        assert_counts_match(&image);
        assert_eq!(image.palette().counts().iter().sum::<usize>(), 17 * 9);

        let buffer = image.to_buffer();
        assert_eq!((buffer.width(), buffer.height()), (17, 9));
        assert_eq!(buffer.get(3, 4).unwrap(), image.get_pixel(3, 4).unwrap());
    }
}
