use criterion::{criterion_group, criterion_main, Criterion};

use parquet_core::encoding::hybrid_rle;

fn add_benchmark(c: &mut Criterion) {
    (10..=20).step_by(2).for_each(|log2_size| {
        let size = 2usize.pow(log2_size);

        let values = (0..size).map(|x| (x % 4) as u32).collect::<Vec<_>>();
        let mut buffer = vec![];
        hybrid_rle::encode(&mut buffer, &values, 2).unwrap();

        c.bench_function(&format!("hybrid rle 2^{}", log2_size), |b| {
            b.iter(|| {
                let decoder =
                    hybrid_rle::HybridRleDecoder::try_new(&buffer, 2, size).unwrap();
                let mut sum = 0u64;
                for value in decoder {
                    sum += value.unwrap() as u64;
                }
                criterion::black_box(sum)
            })
        });
    })
}

criterion_group!(benches, add_benchmark);
criterion_main!(benches);
