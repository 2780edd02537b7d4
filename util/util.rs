#![allow(dead_code)]

use std::sync::OnceLock;

use palette::Srgba;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;
use texblock::{surface::PixelBuffer, ColorSample, Rgba32};

/// Smooth gradients with a little noise, like a typical texture.
pub fn gradient_image(width: usize, height: usize, seed: u64) -> PixelBuffer<Rgba32> {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    let mut image = PixelBuffer::new(width, height);
    for (i, pixel) in image.pixels_mut().iter_mut().enumerate() {
        let (x, y) = (i % width, i / width);
        #[allow(clippy::cast_possible_truncation)]
        let channel = |v: usize, max: usize, noise: u8| (v * 255 / max.max(1)) as u8 ^ (noise & 0x07);
        let r = channel(x, width, rng.gen());
        let g = channel(y, height, rng.gen());
        let b = channel(x + y, width + height, rng.gen());
        let a = if (x / 16 + y / 16) % 5 == 0 { rng.gen() } else { u8::MAX };
        *pixel = Rgba32::from_rgba8(Srgba::new(r, g, b, a));
    }
    image
}

/// Uniformly random pixels, the worst case for every codec.
pub fn noise_image(width: usize, height: usize, seed: u64) -> PixelBuffer<Rgba32> {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    let mut image = PixelBuffer::new(width, height);
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = rng.gen::<[u8; 4]>();
        *pixel = Rgba32::new(r, g, b, a);
    }
    image
}

pub fn generate_benchmark_images() -> Vec<(String, PixelBuffer<Rgba32>)> {
    vec![
        ("gradient_512".to_owned(), gradient_image(512, 512, 0)),
        ("gradient_1920x1080".to_owned(), gradient_image(1920, 1080, 1)),
        ("noise_1021x767".to_owned(), noise_image(1021, 767, 2)),
    ]
}

static BENCHMARK_IMAGES: OnceLock<Vec<(String, PixelBuffer<Rgba32>)>> = OnceLock::new();

pub fn benchmark_images() -> &'static [(String, PixelBuffer<Rgba32>)] {
    BENCHMARK_IMAGES.get_or_init(generate_benchmark_images)
}

pub fn generate_small_benchmark_images() -> Vec<(String, PixelBuffer<Rgba32>)> {
    vec![
        ("gradient_128".to_owned(), gradient_image(128, 128, 3)),
        ("noise_64".to_owned(), noise_image(64, 64, 4)),
    ]
}

static SMALL_BENCHMARK_IMAGES: OnceLock<Vec<(String, PixelBuffer<Rgba32>)>> = OnceLock::new();

/// Images small enough for the quadratic palette merge.
pub fn small_benchmark_images() -> &'static [(String, PixelBuffer<Rgba32>)] {
    SMALL_BENCHMARK_IMAGES.get_or_init(generate_small_benchmark_images)
}
