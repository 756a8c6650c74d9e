use deptree::{
    parser::BatchReader,
    reconstruct::{reconstruct, ParentArray},
    tree::Node,
};
use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use std::hint::black_box;

/// Every position points at its right neighbour: one chain walk covers the line.
fn chain(n: i64) -> ParentArray {
    ParentArray::new((0..n).map(|i| if i == n - 1 { 0 } else { i + 2 }).collect()).unwrap()
}

/// Every position hangs off the middle one: one walk per position.
fn flat(n: i64) -> ParentArray {
    let root = n / 2;
    ParentArray::new((0..n).map(|i| if i == root { 0 } else { root + 1 }).collect()).unwrap()
}

fn heap_lines(lines: usize, len: usize) -> Vec<String> {
    (0..lines)
        .map(|_| {
            (0..len)
                .map(|i| if i == 0 { 0 } else { i / 2 + 1 })
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[library_benchmark]
#[bench::chain_1000(chain(1000))]
#[bench::flat_1000(flat(1000))]
fn bench_reconstruct(parents: ParentArray) -> Node {
    black_box(reconstruct(black_box(&parents), None).unwrap())
}

#[library_benchmark]
#[bench::sentences(heap_lines(500, 40))]
fn bench_batch(lines: Vec<String>) -> Vec<Node> {
    black_box(BatchReader::default().read_unlabelled(black_box(&lines)).unwrap())
}

library_benchmark_group!(
    name = reconstruction;
    benchmarks = bench_reconstruct, bench_batch
);

main!(library_benchmark_groups = reconstruction);
