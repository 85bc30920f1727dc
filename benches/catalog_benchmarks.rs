use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use rand::Rng;
use tubefetch::extractor::Format;
use tubefetch::utils::sanitize_title;
use tubefetch::{QualityArg, StreamCatalog};

const HEIGHTS: [u32; 8] = [144, 240, 360, 480, 720, 1080, 1440, 2160];
const FRAME_RATES: [f32; 4] = [24.0, 30.0, 50.0, 60.0];

/// A shuffled catalog the size of a long yt-dlp dump
fn random_formats(count: usize) -> Vec<Format> {
    let mut rng = rand::thread_rng();
    let mut formats: Vec<Format> = (0..count)
        .map(|i| {
            let audio_only = rng.gen_bool(0.3);
            Format {
                format_id: i.to_string(),
                ext: if audio_only { "webm" } else { "mp4" }.to_string(),
                height: (!audio_only).then(|| *HEIGHTS.choose(&mut rng).unwrap_or(&720)),
                fps: (!audio_only).then(|| *FRAME_RATES.choose(&mut rng).unwrap_or(&30.0)),
                abr: audio_only.then(|| rng.gen_range(32.0..320.0)),
                vcodec: Some(if audio_only { "none" } else { "vp9" }.to_string()),
                acodec: Some(if audio_only || rng.gen_bool(0.1) { "opus" } else { "none" }.to_string()),
                ..Default::default()
            }
        })
        .collect();
    formats.shuffle(&mut rng);
    formats
}

fn benchmark_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stream Catalog");
    let formats = random_formats(200);
    let catalog = StreamCatalog::from_formats(&formats);

    group.bench_function("build", |b| {
        b.iter(|| StreamCatalog::from_formats(black_box(&formats)))
    });

    group.bench_function("video_labels", |b| b.iter(|| catalog.video_labels()));

    group.bench_function("best_video_label", |b| {
        b.iter(|| catalog.best_video_label())
    });

    group.bench_function("audio_labels", |b| b.iter(|| catalog.audio_labels()));

    group.finish();
}

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quality Parsing");

    for input in ["360p", "1080p60", "128", "garbage"] {
        group.bench_function(input, |b| {
            b.iter(|| black_box(input).parse::<QualityArg>())
        });
    }

    group.finish();
}

fn benchmark_sanitize_title(c: &mut Criterion) {
    let mut group = c.benchmark_group("Title Sanitization");

    group.bench_function("simple", |b| {
        b.iter(|| sanitize_title(black_box("Big Buck Bunny")))
    });

    group.bench_function("reserved", |b| {
        b.iter(|| sanitize_title(black_box("Q&A: what's new? <live> | part 1/2")))
    });

    let long_title = "a".repeat(500);
    group.bench_function("long", |b| {
        b.iter(|| sanitize_title(black_box(&long_title)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_catalog,
    benchmark_parsing,
    benchmark_sanitize_title
);
criterion_main!(benches);
