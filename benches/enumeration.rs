//! Performance benchmarks for path enumeration and pagination.
//!
//! Run with: `cargo bench --bench enumeration`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Adjacency build | Linear in edges | Keyset batches from memory |
//! | First page | Independent of total paths | Stops at `limit + 1` |
//! | Deep `after` page | Prunes earlier branches | Cursor-ordered skip |
//! | `before` page | Full walk up to the cursor | Sliding window of `limit + 1` |

use criterion::{
    black_box, criterion_group, criterion_main,
    BenchmarkId, Criterion, Throughput,
};

use dependency_paths::{paginate, AdjacencyMap, GraphEdge, OccurrenceId, PageScope, PathCursor};

/// Layered DAG: `width` nodes per layer, every node wired to every node of
/// the next layer, and one sink below the last layer.
///
/// Holds `width^depth` root → sink paths.
fn layered_graph(depth: usize, width: usize) -> (AdjacencyMap, OccurrenceId) {
    let node = |layer: usize, slot: usize| (layer * width + slot + 1) as i64;
    let sink = (depth * width + 1) as i64;

    let mut edges = Vec::new();
    for layer in 0..depth.saturating_sub(1) {
        for from in 0..width {
            for to in 0..width {
                edges.push(GraphEdge::from((node(layer, from), node(layer + 1, to))));
            }
        }
    }
    for slot in 0..width {
        edges.push(GraphEdge::from((node(depth - 1, slot), sink)));
    }

    (AdjacencyMap::from_edges(edges), OccurrenceId::new(sink))
}

/// Path `index` in canonical order, as a cursor.
fn nth_path(graph: &AdjacencyMap, target: OccurrenceId, index: usize) -> PathCursor {
    let page = paginate(graph, target, &PageScope::Unscoped, index + 1);
    page.end_cursor().unwrap_or_default()
}

fn bench_adjacency_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjacency_build");

    for &width in &[4usize, 16, 64] {
        let edges: Vec<GraphEdge> = (0..width as i64)
            .flat_map(|a| (0..width as i64).map(move |d| GraphEdge::from((a, width as i64 + d))))
            .collect();
        group.throughput(Throughput::Elements(edges.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(edges.len()), &edges, |b, edges| {
            b.iter(|| AdjacencyMap::from_edges(black_box(edges.iter().copied())))
        });
    }

    group.finish();
}

fn bench_first_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_page");

    for &(depth, width) in &[(4usize, 4usize), (6, 4), (8, 4)] {
        let (graph, target) = layered_graph(depth, width);
        group.bench_with_input(
            BenchmarkId::new("layers", format!("{}x{}", depth, width)),
            &graph,
            |b, graph| b.iter(|| paginate(graph, black_box(target), &PageScope::Unscoped, 20)),
        );
    }

    group.finish();
}

fn bench_deep_pages(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_pages");
    let (graph, target) = layered_graph(6, 4);
    // 4^6 = 4096 paths; page from the middle.
    let cursor = nth_path(&graph, target, 2048);

    group.bench_function("after_middle", |b| {
        let scope = PageScope::After(cursor.clone());
        b.iter(|| paginate(&graph, black_box(target), &scope, 20))
    });

    group.bench_function("before_middle", |b| {
        let scope = PageScope::Before(cursor.clone());
        b.iter(|| paginate(&graph, black_box(target), &scope, 20))
    });

    group.finish();
}

fn bench_page_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_size");
    let (graph, target) = layered_graph(6, 4);

    for &limit in &[1usize, 20, 100, 1000] {
        group.throughput(Throughput::Elements(limit as u64));
        group.bench_with_input(BenchmarkId::from_parameter(limit), &limit, |b, &limit| {
            b.iter(|| paginate(&graph, black_box(target), &PageScope::Unscoped, limit))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_adjacency_build,
    bench_first_page,
    bench_deep_pages,
    bench_page_size,
);
criterion_main!(benches);
