use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cv_ncc_disparity::{correlation::Correlation, ncc::{Ncc, Params}, prelude::*};

/// Textured pair where the right view is the left view shifted by `shift` columns.
fn synthetic_pair(width: usize, height: usize, shift: usize) -> StereoPair {
    let sample = |x: usize, y: usize| ((x * 7919 + y * 104_729 + (x * y) % 97) % 251) as u8;

    let mut left = Vec::with_capacity(width * height);
    let mut right = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            left.push(sample(x, y));
            right.push(sample(x + shift, y));
        }
    }

    StereoPair::new(
        GreyscaleImage::from_raw(width, height, left).unwrap(),
        GreyscaleImage::from_raw(width, height, right).unwrap()
    ).unwrap()
}

fn ncc_bench(c: &mut Criterion) {
    // Build frame
    let pair = synthetic_pair(160, 120, 6);

    for &(name, execution) in [
        ("ncc sequential 160x120", Execution::Sequential),
        ("ncc parallel 160x120", Execution::Parallel)
    ].iter() {
        // Build disparity alg
        let mut disp = Ncc::new(Params {
            window_size: 9,
            max_search_dist: 16,
            correlation: Correlation::ZeroMeanProduct,
            execution,
            ..Params::default()
        }).unwrap();

        // Benchmark compute function
        c.bench_function(name, |b| b.iter(|| disp.compute(black_box(&pair))));
    }
}

criterion_group!(benches, ncc_bench);
criterion_main!(benches);
