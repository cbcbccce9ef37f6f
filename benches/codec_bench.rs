use criterion::{criterion_group, criterion_main, Criterion};
use squeeze::{huffman, rice, rle};

/// A 16 KiB buffer with a skewed histogram and some runs, so every codec
/// has something to chew on.
fn sample_input() -> Vec<u8> {
    (0..16 * 1024)
        .map(|i| {
            if i % 37 < 20 {
                b'a'
            } else {
                ((i * 31 + 7) % 64) as u8
            }
        })
        .collect()
}

fn bench_rle(c: &mut Criterion) {
    let mut group = c.benchmark_group("rle");
    let input = sample_input();
    let mut compressed = vec![0u8; input.len() * 2 + 8];
    let used = rle::easy_encode::<u8>(&input, &mut compressed).unwrap();

    group.bench_function("encode", |b| {
        b.iter(|| rle::easy_encode::<u8>(&input, &mut compressed).unwrap())
    });

    let mut restored = vec![0u8; input.len()];
    group.bench_function("decode", |b| {
        b.iter(|| rle::easy_decode::<u8>(&compressed[..used], &mut restored).unwrap())
    });
}

fn bench_huffman(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");
    let input = sample_input();
    let (compressed, bits) = huffman::easy_encode(&input).unwrap();

    group.bench_function("encode", |b| b.iter(|| huffman::easy_encode(&input).unwrap()));

    let mut restored = vec![0u8; input.len()];
    group.bench_function("decode", |b| {
        b.iter(|| huffman::easy_decode(&compressed, bits, &mut restored).unwrap())
    });
}

fn bench_rice(c: &mut Criterion) {
    let mut group = c.benchmark_group("rice");
    let input = sample_input();
    let (compressed, bits) = rice::easy_encode(&input).unwrap();

    group.bench_function("find_best_k", |b| {
        b.iter(|| rice::find_best_k(&input, rice::EASY_K_MAX))
    });
    group.bench_function("encode", |b| b.iter(|| rice::easy_encode(&input).unwrap()));

    let mut restored = vec![0u8; input.len()];
    group.bench_function("decode", |b| {
        b.iter(|| rice::easy_decode(&compressed, bits, &mut restored).unwrap())
    });
}

criterion_group!(benches, bench_rle, bench_huffman, bench_rice);
criterion_main!(benches);
