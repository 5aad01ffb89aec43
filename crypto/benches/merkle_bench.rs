use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn leaves(n: usize) -> Vec<[u8; 32]> {
    (0..n)
        .map(|i| dashkit_crypto::double_sha256(&(i as u64).to_le_bytes()))
        .collect()
}

fn merkle_root_bench(c: &mut Criterion) {
    let mainnet_sized = leaves(4000);

    c.bench_function("merkle_root_4000_leaves", |b| {
        b.iter(|| dashkit_crypto::merkle_root(black_box(&mainnet_sized)))
    });
}

fn merkle_root_odd_bench(c: &mut Criterion) {
    let odd = leaves(301);

    c.bench_function("merkle_root_301_leaves", |b| {
        b.iter(|| dashkit_crypto::merkle_root(black_box(&odd)))
    });
}

fn double_sha256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("double_sha256_256B", |b| {
        b.iter(|| dashkit_crypto::double_sha256(black_box(&data)))
    });
}

criterion_group!(
    benches,
    merkle_root_bench,
    merkle_root_odd_bench,
    double_sha256_bench
);
criterion_main!(benches);
