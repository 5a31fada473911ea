use criterion::{criterion_group, criterion_main, Criterion};
use delivery_lib::{build_graph, estimate_delivery, find_economical_path, DeliveryQuery, FuelConfig, Graph, Route};
use once_cell::sync::Lazy;
use std::hint::black_box;

const GRID: usize = 40;

/// Square grid of locations with varying road lengths.
static GRID_ROUTES: Lazy<Vec<Route>> = Lazy::new(|| {
    let name = |row: usize, col: usize| format!("R{row}C{col}");
    let mut routes = Vec::new();
    for row in 0..GRID {
        for col in 0..GRID {
            let distance = 1.0 + ((row * 7 + col * 13) % 17) as f64;
            if col + 1 < GRID {
                routes.push(Route::new(name(row, col), name(row, col + 1), distance));
            }
            if row + 1 < GRID {
                routes.push(Route::new(name(row, col), name(row + 1, col), distance + 0.5));
            }
        }
    }
    routes
});
static GRID_GRAPH: Lazy<Graph> = Lazy::new(|| build_graph(&GRID_ROUTES));
static FUEL: Lazy<FuelConfig> = Lazy::new(|| FuelConfig::new(5.79, 11.0).expect("valid fuel"));

fn benchmark_pathfinding(c: &mut Criterion) {
    let goal = format!("R{}C{}", GRID - 1, GRID - 1);

    c.bench_function("build_grid_graph", |b| {
        b.iter(|| black_box(build_graph(&GRID_ROUTES).location_count()));
    });

    c.bench_function("dijkstra_grid_corner_to_corner", |b| {
        let graph = &*GRID_GRAPH;
        b.iter(|| {
            let path = find_economical_path(graph, "R0C0", &goal, &FUEL).expect("path exists");
            black_box(path.total_cost)
        });
    });

    c.bench_function("estimate_delivery_grid", |b| {
        let query = DeliveryQuery::new("Grid", "R0C0", goal.clone(), 5.79, 11.0);
        b.iter(|| {
            let path = estimate_delivery(&GRID_ROUTES, &query).expect("path exists");
            black_box(path.leg_count())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
