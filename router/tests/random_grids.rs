use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use wire_common::db::core::TerminalPoint;
use wire_common::db::indices::{ComponentId, PinId};
use wire_common::geom::coord::GridCoord;
use wire_router::algo::{Algorithm, SearchBudget};
use wire_router::cost::CostModel;
use wire_router::error::RouteError;
use wire_router::grid::{DenseGrid, RoutingGrid};
use wire_router::orchestrator::{Orchestrator, RouteMode};

const SIZE: u32 = 6;

fn random_grid(rng: &mut StdRng) -> DenseGrid {
    let mut grid = DenseGrid::new(SIZE, SIZE);
    for y in 0..SIZE {
        for x in 0..SIZE {
            if rng.gen_bool(0.2) {
                grid.mark_occupied(GridCoord::new(x, y), ComponentId(1));
            }
        }
    }
    grid
}

fn free_cell(grid: &DenseGrid, rng: &mut StdRng) -> Option<GridCoord> {
    let free: Vec<GridCoord> = (0..SIZE)
        .flat_map(|y| (0..SIZE).map(move |x| GridCoord::new(x, y)))
        .filter(|&c| grid.is_free(c))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.gen_range(0..free.len())])
    }
}

fn connected(grid: &DenseGrid, from: GridCoord, to: GridCoord) -> bool {
    let mut seen = vec![false; (SIZE * SIZE) as usize];
    let mut queue = VecDeque::from([from]);
    seen[(from.y * SIZE + from.x) as usize] = true;
    while let Some(c) = queue.pop_front() {
        if c == to {
            return true;
        }
        for n in grid.neighbors(c) {
            let i = (n.y * SIZE + n.x) as usize;
            if !seen[i] && grid.is_free(n) {
                seen[i] = true;
                queue.push_back(n);
            }
        }
    }
    false
}

#[test]
fn engines_agree_on_cost_across_random_grids() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let orch = Orchestrator::new(CostModel::default(), SearchBudget::unlimited());
    let mut checked = 0;

    for _ in 0..200 {
        let grid = random_grid(&mut rng);
        let (Some(a), Some(b)) = (free_cell(&grid, &mut rng), free_cell(&grid, &mut rng)) else {
            continue;
        };
        // Disconnected pairs are covered by the next test.
        if !connected(&grid, a, b) {
            continue;
        }
        let start = TerminalPoint::new(ComponentId(100), PinId(0), a);
        let end = TerminalPoint::new(ComponentId(101), PinId(1), b);

        let response = orch.route(&grid, &start, &end, RouteMode::CompareAll);
        let astar = response.result(Algorithm::AStar).unwrap();
        let reference = astar.metrics.cost.expect("connected pair must route");

        for result in &response.results {
            assert_eq!(
                result.metrics.cost,
                Some(reference),
                "{} disagrees on {} -> {}",
                result.metrics.algorithm,
                a,
                b
            );
            let path = result.path().unwrap();
            path.assert_valid(&grid, a, b);
            assert_eq!(orch.cost_model().path_cost(path), reference);
        }
        assert!(response.comparison.unwrap().costs_agree);
        checked += 1;
    }
    assert!(checked > 50, "only {} connected pairs", checked);
}

#[test]
fn disconnected_pairs_report_no_path() {
    let mut rng = StdRng::seed_from_u64(7);
    let orch = Orchestrator::new(CostModel::default(), SearchBudget::unlimited());

    for _ in 0..100 {
        let grid = random_grid(&mut rng);
        let (Some(a), Some(b)) = (free_cell(&grid, &mut rng), free_cell(&grid, &mut rng)) else {
            continue;
        };
        if connected(&grid, a, b) {
            continue;
        }
        let start = TerminalPoint::new(ComponentId(100), PinId(0), a);
        let end = TerminalPoint::new(ComponentId(101), PinId(1), b);
        let response = orch.route(&grid, &start, &end, RouteMode::CompareAll);
        for result in &response.results {
            assert_eq!(
                result.outcome,
                Err(RouteError::NoPath),
                "{} on {} -> {}",
                result.metrics.algorithm,
                a,
                b
            );
        }
    }
}
