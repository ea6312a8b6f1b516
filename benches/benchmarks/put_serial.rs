use crate::setup::{scratch_bucket, PAIRS};
use cella::Bucket;
use criterion::{criterion_group, Criterion};

fn put_pairs(bucket: &Bucket) {
    for (key, value) in PAIRS.iter() {
        bucket.put(key.as_bytes(), value.as_bytes()).unwrap();
    }
}

pub fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("Put key value pairs in serial");
    group.bench_function("Put pairs", |b| {
        let (_dir, bucket) = scratch_bucket();
        b.iter(|| put_pairs(&bucket));
    });
    group.finish();
}

criterion_group!(benches, bench_put);
