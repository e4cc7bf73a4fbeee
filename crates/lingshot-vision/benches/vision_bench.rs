//! lingshot-vision 성능 벤치마크
//!
//! 실행: cargo bench -p lingshot-vision
//!
//! 벤치마크 대상:
//! - 휘도 정규화 (normalized_luma)
//! - 프레임 유사도 (SimilarityGate::score)
//! - PNG 인코딩 (encode_png)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lingshot_core::models::frame::{Frame, Source};
use lingshot_vision::{encoder, resize, similarity::SimilarityGate};

/// 테스트용 패턴 프레임 생성
fn create_test_frame(width: u32, height: u32, seed: u8) -> Frame {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x as u8).wrapping_add(seed).wrapping_mul(17);
            let g = (y as u8).wrapping_add(seed).wrapping_mul(31);
            let b = (x as u8).wrapping_add(y as u8).wrapping_add(seed);
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    Frame::from_rgba(Source::FullScreen, width, height, pixels).expect("bench frame")
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_luma");

    for (w, h) in [(1280, 720), (1920, 1080), (2560, 1440)] {
        group.throughput(Throughput::Elements((w * h) as u64));
        let frame = create_test_frame(w, h, 3);
        group.bench_with_input(BenchmarkId::new("512", format!("{w}x{h}")), &frame, |b, f| {
            b.iter(|| black_box(resize::normalized_luma(f, 512)));
        });
    }

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_gate");
    let gate = SimilarityGate::default();

    for (w, h) in [(1280, 720), (1920, 1080)] {
        group.throughput(Throughput::Elements((w * h) as u64));
        let prev = create_test_frame(w, h, 1);
        let curr = create_test_frame(w, h, 9);

        group.bench_with_input(
            BenchmarkId::new("score", format!("{w}x{h}")),
            &(&prev, &curr),
            |b, (prev, curr)| {
                b.iter(|| black_box(gate.score(prev, curr)));
            },
        );
    }

    group.finish();
}

fn bench_png_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");

    for (w, h) in [(640, 480), (1280, 720), (1920, 1080)] {
        group.throughput(Throughput::Elements((w * h) as u64));
        let frame = create_test_frame(w, h, 77);
        group.bench_with_input(BenchmarkId::new("png", format!("{w}x{h}")), &frame, |b, f| {
            b.iter(|| black_box(encoder::encode_png(f)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_similarity, bench_png_encode);
criterion_main!(benches);
