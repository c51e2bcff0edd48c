// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skytour_bnb::{bnb::BnbSolver, monitor::no_op::NoOperationMonitor, strategy::SearchStrategy};
use skytour_model::{index::NodeIndex, matrix::CostMatrix};
use std::hint::black_box;

/// Builds a complete asymmetric matrix with costs in `[10, 100)`.
fn random_matrix(num_nodes: usize, seed: u64) -> CostMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let labels: Vec<String> = (0..num_nodes).map(|i| format!("AP{:02}", i)).collect();
    let rows = (0..num_nodes)
        .map(|i| {
            (0..num_nodes)
                .map(|j| {
                    if i == j {
                        f64::INFINITY
                    } else {
                        rng.random_range(10..100) as f64
                    }
                })
                .collect()
        })
        .collect();
    CostMatrix::from_rows(labels, rows).expect("random matrix is well-formed")
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("bnb_strategies");
    group.sample_size(20);

    for num_nodes in [6, 8, 9] {
        let matrix = random_matrix(num_nodes, 0x5EED + num_nodes as u64);
        let mut solver = BnbSolver::preallocated(num_nodes);
        group.throughput(Throughput::Elements(num_nodes as u64));

        for strategy in SearchStrategy::ALL {
            group.bench_with_input(
                BenchmarkId::new(strategy.name(), num_nodes),
                &matrix,
                |b, matrix| {
                    b.iter(|| {
                        let outcome = solver.solve(
                            black_box(matrix),
                            NodeIndex::new(0),
                            strategy,
                            NoOperationMonitor::new(),
                        );
                        if outcome.tour().is_none() {
                            panic!("Benchmark configuration error: complete matrix has no tour.");
                        }
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
