use crate::setup::{scratch_bucket, COUNT, PAIRS};
use cella::Bucket;
use criterion::{criterion_group, BenchmarkId, Criterion};
use std::thread;

// Scoped threads borrow `bucket` without an `Arc`.
fn put_pairs(bucket: &Bucket, thread_num: usize) {
    thread::scope(|s| {
        for pairs in PAIRS.chunks(COUNT / thread_num) {
            s.spawn(move || {
                for (key, value) in pairs {
                    bucket.put(key.as_bytes(), value.as_bytes()).unwrap();
                }
            });
        }
    });
}

pub fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("Put key value pairs in parallel");
    let n = 10;
    group.bench_with_input(BenchmarkId::new("put_pairs()", n), &n, |b, &n| {
        let (_dir, bucket) = scratch_bucket();
        b.iter(|| put_pairs(&bucket, n));
    });
    group.finish();
}

criterion_group!(benches, bench_put);
