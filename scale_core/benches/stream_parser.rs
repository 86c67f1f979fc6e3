use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use scale_core::{FrameBuffer, SessionCfg, StabilityParser};
use scale_serial::SimulatedLink;
use scale_traits::clock::test_clock::TestClock;
use std::time::Duration;

// Synthetic settling trace: noisy readings that converge on one value.
fn settling_stream(frames: usize, seed: u32) -> Vec<String> {
    let mut state = seed.max(1);
    let mut next = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        x
    };
    let mut out = Vec::with_capacity(frames + 3);
    for i in 0..frames {
        // Alternate so the noisy prefix never confirms on its own.
        let v = 1000 + (next() % 50) + if i % 2 == 0 { 0 } else { 100 };
        out.push(format!("{}=", v.to_string().chars().rev().collect::<String>()));
    }
    // Three copies: the first may only clear a held noisy candidate.
    out.extend(std::iter::repeat_n("00.21=".to_string(), 3));
    out
}

fn bench_frame_buffer(c: &mut Criterion) {
    let stream = settling_stream(512, 7).concat();
    c.bench_function("frame_buffer_fold_8b", |b| {
        b.iter(|| {
            let mut buf = FrameBuffer::new();
            let mut frames = 0usize;
            for piece in stream.as_bytes().chunks(8) {
                if buf.fold(black_box(piece)).is_some() {
                    frames += 1;
                }
            }
            black_box(frames)
        })
    });
}

fn bench_session(c: &mut Criterion) {
    let frames = settling_stream(256, 42);
    c.bench_function("session_256_noisy_frames", |b| {
        b.iter_batched(
            || frames.iter().fold(SimulatedLink::new(), |l, f| l.data(f.as_str())),
            |link| {
                let mut parser = StabilityParser::builder()
                    .with_link(link)
                    .with_clock(TestClock::new())
                    .with_session(SessionCfg {
                        pace: Duration::ZERO,
                        max_iterations: Some(1024),
                        ..SessionCfg::default()
                    })
                    .build()
                    .unwrap();
                black_box(parser.run().unwrap())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_frame_buffer, bench_session);
criterion_main!(benches);
