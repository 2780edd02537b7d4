#[path = "../util/util.rs"]
mod util;

use util::benchmark_images;

use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, BenchmarkId,
    Criterion, SamplingMode,
};
use texblock::{
    block::{
        self, bc1::Bc1, bc3::Bc3, bc4::Bc4, bc5::Bc5, cmpr::Cmpr, gx::Rgba32Split, BlockCodec,
    },
    Rgba32,
};

fn group<'a>(c: &'a mut Criterion, name: &str) -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(name);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_secs(2));
    group
}

fn bench_codec<B: BlockCodec + Sync>(c: &mut Criterion, name: &str, codec: &B) {
    let mut encode = group(c, &format!("{name}_encode"));
    for (path, image) in benchmark_images() {
        encode.bench_with_input(BenchmarkId::new("single", path), image, |b, image| {
            b.iter(|| block::encode_image(codec, image));
        });
        encode.bench_with_input(BenchmarkId::new("par", path), image, |b, image| {
            b.iter(|| block::encode_image_par(codec, image));
        });
    }
    encode.finish();

    let mut decode = group(c, &format!("{name}_decode"));
    for (path, image) in benchmark_images() {
        let data = block::encode_image(codec, image);
        let (width, height) = (image.width(), image.height());
        decode.bench_with_input(BenchmarkId::new("single", path), &data, |b, data| {
            b.iter(|| block::decode_image::<_, Rgba32>(codec, data, width, height).unwrap());
        });
        decode.bench_with_input(BenchmarkId::new("par", path), &data, |b, data| {
            b.iter(|| block::decode_image_par::<_, Rgba32>(codec, data, width, height).unwrap());
        });
    }
    decode.finish();
}

fn bc1(c: &mut Criterion) {
    bench_codec(c, "bc1", &Bc1::new());
}

fn bc3(c: &mut Criterion) {
    bench_codec(c, "bc3", &Bc3::new());
}

fn bc4(c: &mut Criterion) {
    bench_codec(c, "bc4", &Bc4::default());
}

fn bc5(c: &mut Criterion) {
    bench_codec(c, "bc5", &Bc5::new());
}

fn cmpr(c: &mut Criterion) {
    bench_codec(c, "cmpr", &Cmpr::new());
}

fn rgba32_split(c: &mut Criterion) {
    bench_codec(c, "rgba32_split", &Rgba32Split);
}

criterion_group!(benches, bc1, bc3, bc4, bc5, cmpr, rgba32_split);
criterion_main!(benches);
