//! Reverb Benchmarks
//!
//! Throughput of the engine over a full buffer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use schroeder::dsp::soft_clip;
use schroeder::{PcmBuffer, ReverbEngine, ReverbParams};

fn noise_buffer(frames: usize, sample_rate: u32) -> PcmBuffer {
    // xorshift, deterministic across runs
    let mut state: u32 = 0x9E37_79B9;
    let samples = (0..frames * 2)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 16) as i16 / 4
        })
        .collect();
    PcmBuffer::new(samples, sample_rate).unwrap()
}

fn benchmark_engine(c: &mut Criterion) {
    let buffer = noise_buffer(480_000, 48000);

    c.bench_function("reverb_10s_stereo", |b| {
        b.iter(|| {
            let mut engine = ReverbEngine::new(ReverbParams::default(), 48000).unwrap();
            engine.process(black_box(&buffer))
        })
    });
}

fn benchmark_soft_clip(c: &mut Criterion) {
    let input: Vec<f32> = (0..48000).map(|i| (i as f32 / 24000.0) - 1.0).collect();

    c.bench_function("soft_clip_48k", |b| {
        b.iter(|| input.iter().map(|&x| soft_clip(black_box(x))).sum::<f32>())
    });
}

criterion_group!(benches, benchmark_engine, benchmark_soft_clip);
criterion_main!(benches);
