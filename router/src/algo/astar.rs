use super::arena::SearchArena;
use super::engine::{
    Algorithm, SearchBudget, SearchEngine, SearchReport, check_terminals, found, passable,
};
use crate::cost::CostModel;
use crate::error::RouteError;
use crate::grid::RoutingGrid;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use wire_common::db::core::TerminalPoint;
use wire_common::util::profiler::Stopwatch;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    f_score: u64,
    /// Discovery order; earlier entries win ties on `f_score`.
    seq: u64,
    key: u32,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search on `f = g + manhattan`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AStar;

impl SearchEngine for AStar {
    fn algorithm(&self) -> Algorithm {
        Algorithm::AStar
    }

    fn find(
        &self,
        start: &TerminalPoint,
        end: &TerminalPoint,
        grid: &dyn RoutingGrid,
        cost: &CostModel,
        budget: &SearchBudget,
    ) -> SearchReport {
        let watch = Stopwatch::start();
        if let Err(e) = check_terminals(grid, start, end) {
            return SearchReport::failed(e, &watch);
        }

        let mut arena = SearchArena::new(grid.width(), grid.height());
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;
        let mut expanded = 0u64;
        let mut pops = 0u64;

        let start_key = arena.key(start.coord, None);
        arena.seed(start_key);
        heap.push(State {
            f_score: cost.heuristic(start.coord, end.coord),
            seq,
            key: start_key,
        });

        while let Some(State { key, .. }) = heap.pop() {
            pops += 1;
            // Stale duplicate of an already settled state.
            if arena.is_closed(key) {
                continue;
            }
            arena.close(key);

            let position = arena.coord(key);
            if position == end.coord {
                return found(
                    arena.reconstruct(key),
                    arena.g(key),
                    grid,
                    start,
                    end,
                    expanded,
                    pops,
                    &watch,
                );
            }

            expanded += 1;
            if let Err(e) = budget.check(expanded, &watch) {
                log::debug!("A* gave up after {} expansions: {}", expanded - 1, e);
                return SearchReport {
                    outcome: Err(e),
                    nodes_expanded: expanded - 1,
                    iterations: pops,
                    runtime: watch.elapsed(),
                };
            }

            let incoming = arena.direction(key);
            let current_g = arena.g(key);
            let mut neighbors = grid.neighbors(position);
            while let Some((dir, next)) = neighbors.next_directed() {
                if !passable(grid, next, end.coord) {
                    continue;
                }
                let next_key = arena.key(next, Some(dir));
                if arena.is_closed(next_key) {
                    continue;
                }
                let tentative_g = current_g + cost.edge_cost(incoming, dir);
                if arena.relax(next_key, tentative_g, key) {
                    seq += 1;
                    heap.push(State {
                        f_score: tentative_g + cost.heuristic(next, end.coord),
                        seq,
                        key: next_key,
                    });
                }
            }
        }

        SearchReport {
            outcome: Err(RouteError::NoPath),
            nodes_expanded: expanded,
            iterations: pops,
            runtime: watch.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DenseGrid;
    use wire_common::db::indices::{ComponentId, PinId};
    use wire_common::geom::coord::GridCoord;

    fn terminal(x: u32, y: u32) -> TerminalPoint {
        TerminalPoint::new(ComponentId::new(900), PinId::new(0), GridCoord::new(x, y))
    }

    #[test]
    fn prefers_fewer_bends_at_equal_length() {
        let grid = DenseGrid::new(6, 6);
        let report = AStar.find(
            &terminal(0, 0),
            &terminal(3, 3),
            &grid,
            &CostModel::new(1, 1),
            &SearchBudget::unlimited(),
        );
        let found = report.outcome.unwrap();
        assert_eq!(found.cost, 7);
        assert_eq!(found.path.bends(), 1);
    }

    #[test]
    fn start_equals_end() {
        let grid = DenseGrid::new(3, 3);
        let report = AStar.find(
            &terminal(1, 1),
            &terminal(1, 1),
            &grid,
            &CostModel::default(),
            &SearchBudget::unlimited(),
        );
        let found = report.outcome.unwrap();
        assert_eq!(found.cost, 0);
        assert_eq!(found.path.coords(), &[GridCoord::new(1, 1)]);
        assert_eq!(report.nodes_expanded, 0);
    }

    #[test]
    fn tiny_budget_is_reported() {
        let grid = DenseGrid::new(20, 20);
        let budget = SearchBudget {
            max_expansions: 5,
            ..SearchBudget::unlimited()
        };
        let report = AStar.find(
            &terminal(0, 0),
            &terminal(19, 19),
            &grid,
            &CostModel::default(),
            &budget,
        );
        assert!(matches!(report.outcome, Err(RouteError::BudgetExceeded(_))));
        assert_eq!(report.nodes_expanded, 5);
    }
}
