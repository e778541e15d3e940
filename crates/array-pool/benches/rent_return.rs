use array_pool::{ArrayPool, ArraySource};
use criterion::{Criterion, black_box};
use std::{env, time::Duration};

/// 基准：逐帧租借若干可变长度草稿数组并在帧末归还。
///
/// # 设计背景（Why）
/// - 模拟仿真循环中“每帧申请、帧末归还”的典型用法，观察桶预热后的稳态租借成本；
/// - 与直接 `vec![0; n]` 分配对照，量化池化收益。
fn bench_frame_scratch(c: &mut Criterion) {
    let lengths = [3usize, 17, 100, 250, 1000, 4096];

    c.bench_function("array_pool_frame_scratch", |b| {
        let mut pool = ArrayPool::<f32>::new();
        let mut held = Vec::with_capacity(lengths.len());
        b.iter(|| {
            for &len in &lengths {
                held.push(rent_filled(&mut pool, len));
            }
            for handle in held.drain(..) {
                pool.return_array(handle);
            }
        });
    });

    c.bench_function("vec_frame_scratch", |b| {
        b.iter(|| {
            for &len in &lengths {
                black_box(vec![1.0f32; len]);
            }
        });
    });
}

fn rent_filled<S: ArraySource<f32>>(source: &mut S, len: usize) -> array_pool::ArrayHandle {
    let handle = source.rent(len).expect("基准长度均在上限内");
    if let Some(array) = source.array_mut(handle) {
        array[..len].fill(1.0);
        black_box(&array[0]);
    }
    handle
}

fn main() {
    let mut quick_mode = false;
    for arg in env::args().skip(1) {
        if arg == "--quick" {
            quick_mode = true;
        }
    }

    let mut criterion = Criterion::default();
    if quick_mode {
        criterion = criterion
            .sample_size(10)
            .warm_up_time(Duration::from_millis(100))
            .measurement_time(Duration::from_millis(250));
    }

    bench_frame_scratch(&mut criterion);
    criterion.final_summary();
}
