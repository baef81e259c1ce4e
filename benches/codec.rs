use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use extid_rs::Codec;

// Number of IDs encoded or decoded per benchmark iteration.
const TOTAL_IDS: usize = 1024;

fn test_codec() -> Codec {
    let key: Vec<u8> = (0..16).collect();
    Codec::new("user", &key).expect("16-byte key")
}

fn bench_encode(c: &mut Criterion) {
    let codec = test_codec();
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for i in 0..TOTAL_IDS as i64 {
                black_box(codec.encode(black_box(i)));
            }
        })
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let codec = test_codec();
    let encoded: Vec<String> = (0..TOTAL_IDS as i64).map(|i| codec.encode(i)).collect();
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for (i, s) in encoded.iter().enumerate() {
                let id = codec.decode(black_box(s)).expect("valid identifier");
                assert_eq!(id, i as i64);
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
