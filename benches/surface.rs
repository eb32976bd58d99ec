use criterion::black_box;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use blocklinear::surface::{deswizzle_surface, swizzle_surface, BlockDim};
use blocklinear::swizzle::swizzled_mip_size;
use blocklinear::BlockHeight;

fn deswizzle_surface_benchmark(c: &mut Criterion) {
    // Allocate the size needed by the largest run.
    // This avoids including the allocation time in the benchmark.
    let source = vec![0u8; swizzled_mip_size(512, 512, 1, BlockHeight::Sixteen, 16) * 6 * 6];

    let mut group = c.benchmark_group("deswizzle_surface");
    for size in [32, 256, 512] {
        group.throughput(Throughput::Bytes((size * size * 6) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                deswizzle_surface(
                    size,
                    size,
                    1,
                    &source,
                    BlockDim::block_4x4(),
                    None,
                    black_box(16),
                    black_box(6),
                    black_box(6),
                )
            });
        });
    }
    group.finish();
}

fn swizzle_surface_benchmark(c: &mut Criterion) {
    let source = vec![0u8; swizzled_mip_size(512, 512, 1, BlockHeight::Sixteen, 16) * 6 * 6];

    let mut group = c.benchmark_group("swizzle_surface");
    for size in [32, 256, 512] {
        group.throughput(Throughput::Bytes((size * size * 6) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                swizzle_surface(
                    size,
                    size,
                    1,
                    &source,
                    BlockDim::block_4x4(),
                    None,
                    black_box(16),
                    black_box(6),
                    black_box(6),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, deswizzle_surface_benchmark, swizzle_surface_benchmark);
criterion_main!(benches);
