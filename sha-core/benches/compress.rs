use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{RngCore, SeedableRng};
use rand_xorshift::XorShiftRng;
use sha_core::variant::{Sha256_256, Sha512_512, Variant};
use sha_core::{Algorithm, Implementation, TEST_SEED};

fn random_blocks<V: Variant>(count: usize) -> Vec<V::Block> {
    let rng = &mut XorShiftRng::from_seed(TEST_SEED);
    (0..count)
        .map(|_| {
            let mut block = V::EMPTY_BLOCK;
            rng.fill_bytes(block.as_mut());
            block
        })
        .collect()
}

fn compress_lanes<V: Variant>(c: &mut Criterion, name: &str) {
    let blocks = random_blocks::<V>(64);
    let refs = blocks.iter().collect::<Vec<_>>();

    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes((blocks.len() * V::BLOCK_BYTES) as u64));
    for lanes in [1, 2, 4, 8, 16] {
        let implementation = Implementation::detect().with_lanes(lanes);
        group.bench_with_input(BenchmarkId::from_parameter(lanes), &implementation, |b, i| {
            let mut states = vec![V::H; blocks.len()];
            b.iter(|| i.compress::<V>(black_box(&mut states), black_box(&refs)))
        });
    }
    group.finish();
}

fn compress_benchmark(c: &mut Criterion) {
    compress_lanes::<Sha256_256>(c, "compress_sha256");
    compress_lanes::<Sha512_512>(c, "compress_sha512");
}

fn hash_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_sha256");
    for size in [64usize, 1024, 1_024_000] {
        let mut data = vec![0u8; size];
        XorShiftRng::from_seed(TEST_SEED).fill_bytes(&mut data);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| Algorithm::<Sha256_256>::hash(black_box(data)))
        });
    }
    group.finish();
}

fn merkle_benchmark(c: &mut Criterion) {
    let leaves = random_blocks::<Sha256_256>(1024)
        .iter()
        .map(Algorithm::<Sha256_256>::hash_block)
        .collect::<Vec<_>>();

    c.bench_function("merkle_root_sha256_1024", |b| {
        b.iter(|| Algorithm::<Sha256_256>::merkle_root(black_box(leaves.clone())))
    });
}

criterion_group!(benches, compress_benchmark, hash_benchmark, merkle_benchmark);
criterion_main!(benches);
