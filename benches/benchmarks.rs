//! Benchmarks for specchio operations.

use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use specchio::{needs_update, ContentDigest, Mirror};

fn bench_content_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_digest");

    for size in [512, 8192, 65536, 1_048_576].iter() {
        let data = vec![42u8; *size];

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("compute", size), &data, |b, data| {
            b.iter(|| ContentDigest::compute(black_box(data)));
        });
    }

    group.finish();
}

fn bench_needs_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("needs_update");

    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src.bin");
    let same = dir.path().join("same.bin");
    let shorter = dir.path().join("shorter.bin");

    let data = vec![42u8; 1_048_576];
    fs::write(&src, &data).unwrap();
    fs::write(&same, &data).unwrap();
    fs::write(&shorter, &data[..1024]).unwrap();

    // Size mismatch short-circuits without reading content.
    group.bench_function("size_mismatch", |b| {
        b.iter(|| needs_update(black_box(&src), black_box(&shorter)).unwrap());
    });

    // Identical files fall through to the digest of both sides.
    group.throughput(Throughput::Bytes(2 * data.len() as u64));
    group.bench_function("digest_fallback", |b| {
        b.iter(|| needs_update(black_box(&src), black_box(&same)).unwrap());
    });

    group.finish();
}

fn populate_tree(root: &Path, dirs: usize, files_per_dir: usize) {
    for d in 0..dirs {
        let dir = root.join(format!("dir{d:03}"));
        fs::create_dir_all(&dir).unwrap();
        for f in 0..files_per_dir {
            fs::write(dir.join(format!("file{f:03}.bin")), vec![7u8; 4096]).unwrap();
        }
    }
}

fn bench_sync_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_pass");
    group.sample_size(20);

    let mirror = Mirror::new();

    // Converged pair: measures the cost of proving there is nothing to do.
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source");
    let replica = dir.path().join("replica");
    populate_tree(&source, 10, 10);
    mirror.sync(&source, &replica, &mut Vec::new());

    group.bench_function("noop_100_files", |b| {
        b.iter(|| {
            let stats = mirror.sync(black_box(&source), black_box(&replica), &mut Vec::new());
            assert!(stats.is_noop());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_content_digest,
    bench_needs_update,
    bench_sync_pass
);
criterion_main!(benches);
