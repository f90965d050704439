use wire_common::db::core::TerminalPoint;
use wire_common::db::indices::{ComponentId, PinId};
use wire_common::geom::coord::GridCoord;
use wire_common::geom::rect::Rect;
use wire_router::algo::{Algorithm, SearchBudget};
use wire_router::cost::CostModel;
use wire_router::error::{RouteError, TerminalRole};
use wire_router::grid::{DenseGrid, RoutingGrid};
use wire_router::orchestrator::{Orchestrator, RouteMode, RouteResponse};

const WALL: ComponentId = ComponentId(50);

fn terminal(x: u32, y: u32) -> TerminalPoint {
    TerminalPoint::new(ComponentId(999), PinId(0), GridCoord::new(x, y))
}

fn compare(grid: &DenseGrid, start: (u32, u32), end: (u32, u32), bend_penalty: u32) -> RouteResponse {
    let orch = Orchestrator::new(CostModel::new(1, bend_penalty), SearchBudget::unlimited());
    orch.route(
        grid,
        &terminal(start.0, start.1),
        &terminal(end.0, end.1),
        RouteMode::CompareAll,
    )
}

fn cost_of(response: &RouteResponse, algorithm: Algorithm) -> Option<u64> {
    response.result(algorithm).unwrap().metrics.cost
}

#[test]
fn straight_run_on_empty_grid() {
    let grid = DenseGrid::new(10, 10);
    let response = compare(&grid, (0, 0), (5, 0), 1);

    let expected: Vec<GridCoord> = (0..=5).map(|x| GridCoord::new(x, 0)).collect();
    for result in &response.results {
        assert_eq!(result.metrics.cost, Some(5));
        assert_eq!(result.metrics.bends, Some(0));
        assert_eq!(result.path().unwrap().coords(), expected.as_slice());
    }
}

#[test]
fn diagonal_target_pays_one_bend() {
    let grid = DenseGrid::new(10, 10);
    let response = compare(&grid, (0, 0), (5, 5), 2);

    for result in &response.results {
        assert_eq!(result.metrics.cost, Some(12), "{}", result.metrics.algorithm);
        assert_eq!(result.metrics.bends, Some(1));
    }
    let astar = response.result(Algorithm::AStar).unwrap().metrics.nodes_expanded;
    let dijkstra = response.result(Algorithm::Dijkstra).unwrap().metrics.nodes_expanded;
    assert!(dijkstra >= astar, "dijkstra {} < astar {}", dijkstra, astar);
    assert!(response.comparison.unwrap().costs_agree);
}

#[test]
fn wall_forces_detour_through_gap() {
    let mut grid = DenseGrid::new(10, 10);
    for y in 0..=8 {
        grid.mark_occupied(GridCoord::new(3, y), WALL);
    }

    let response = compare(&grid, (0, 0), (6, 0), 1);
    // 9 down, 6 across, 9 up, two corners.
    assert_eq!(cost_of(&response, Algorithm::AStar), Some(26));
    for result in &response.results {
        assert_eq!(result.metrics.cost, Some(26), "{}", result.metrics.algorithm);
        let path = result.path().unwrap();
        assert!(path.coords().contains(&GridCoord::new(3, 9)));
    }
    assert!(response.comparison.unwrap().costs_agree);
}

#[test]
fn walled_off_regions_have_no_path() {
    let mut grid = DenseGrid::new(10, 10);
    // Start pocket (0..2, 0..2) and end pocket (7..10, 7..10).
    for i in 0..=2 {
        grid.mark_occupied(GridCoord::new(2, i), WALL);
        grid.mark_occupied(GridCoord::new(i, 2), WALL);
    }
    for i in 6..=9 {
        grid.mark_occupied(GridCoord::new(6, i), WALL);
        grid.mark_occupied(GridCoord::new(i, 6), WALL);
    }

    for (start, end) in [((0, 0), (8, 8)), ((4, 4), (0, 0)), ((4, 4), (8, 8))] {
        let response = compare(&grid, start, end, 1);
        for result in &response.results {
            assert_eq!(
                result.outcome,
                Err(RouteError::NoPath),
                "{} from {:?} to {:?}",
                result.metrics.algorithm,
                start,
                end
            );
            assert_eq!(result.metrics.cost, None);
        }
    }
}

#[test]
fn start_on_foreign_footprint_is_rejected_before_search() {
    let mut grid = DenseGrid::new(10, 10);
    grid.occupy_rect(Rect::from_origin(0, 0, 3, 3), ComponentId(7));

    let response = compare(&grid, (1, 1), (8, 8), 1);
    for result in &response.results {
        assert_eq!(
            result.outcome,
            Err(RouteError::InvalidTerminal {
                role: TerminalRole::Start,
                coord: GridCoord::new(1, 1)
            })
        );
        assert_eq!(result.metrics.nodes_expanded, 0);
        assert_eq!(result.metrics.iterations, 0);
    }

    let off_grid = compare(&grid, (5, 5), (10, 4), 1);
    for result in &off_grid.results {
        assert!(matches!(
            result.outcome,
            Err(RouteError::InvalidTerminal {
                role: TerminalRole::End,
                ..
            })
        ));
    }
}

#[test]
fn own_footprint_terminals_are_accepted() {
    let mut grid = DenseGrid::new(10, 6);
    let left = ComponentId(1);
    let right = ComponentId(2);
    grid.occupy_rect(Rect::from_origin(0, 1, 2, 3), left);
    grid.occupy_rect(Rect::from_origin(8, 1, 2, 3), right);
    let start = TerminalPoint::new(left, PinId(0), GridCoord::new(1, 2));
    let end = TerminalPoint::new(right, PinId(1), GridCoord::new(8, 2));

    let orch = Orchestrator::new(CostModel::default(), SearchBudget::unlimited());
    let response = orch.route(&grid, &start, &end, RouteMode::CompareAll);
    for result in &response.results {
        assert_eq!(result.metrics.cost, Some(7));
        let path = result.path().unwrap();
        for &c in &path.coords()[1..path.coords().len() - 1] {
            assert!(grid.is_free(c));
        }
    }
}

#[test]
fn repeated_calls_are_identical() {
    let mut grid = DenseGrid::new(12, 12);
    grid.occupy_rect(Rect::from_origin(4, 2, 3, 6), WALL);
    let orch = Orchestrator::new(CostModel::default(), SearchBudget::unlimited());

    for algorithm in Algorithm::ALL {
        let mode = RouteMode::Single(algorithm);
        let a = orch.route(&grid, &terminal(1, 5), &terminal(10, 4), mode);
        let b = orch.route(&grid, &terminal(1, 5), &terminal(10, 4), mode);
        assert_eq!(a.results[0].path(), b.results[0].path());
        assert_eq!(a.results[0].metrics.nodes_expanded, b.results[0].metrics.nodes_expanded);
    }
}

#[test]
fn expansion_budget_aborts_large_search() {
    let grid = DenseGrid::new(400, 400);
    let budget = SearchBudget {
        max_expansions: 50,
        max_iterations: u64::MAX,
        time_limit: None,
    };
    let orch = Orchestrator::new(CostModel::default(), budget);
    let response = orch.route(&grid, &terminal(0, 0), &terminal(399, 399), RouteMode::CompareAll);
    for result in &response.results {
        assert!(
            matches!(result.outcome, Err(RouteError::BudgetExceeded(_))),
            "{}",
            result.metrics.algorithm
        );
        assert!(result.metrics.nodes_expanded <= 50);
    }
}
