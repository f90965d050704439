use super::arena::SearchArena;
use super::engine::{
    Algorithm, SearchBudget, SearchEngine, SearchReport, check_terminals, found, passable,
};
use crate::cost::CostModel;
use crate::error::RouteError;
use crate::grid::RoutingGrid;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use wire_common::db::core::TerminalPoint;
use wire_common::util::profiler::Stopwatch;

/// Uniform-cost search: A* with the heuristic pinned to zero. The open set
/// is keyed by state, so a cheaper discovery updates the entry in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dijkstra;

impl SearchEngine for Dijkstra {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Dijkstra
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
        // Highest priority pops first: lowest cost, then earliest discovery.
        let mut open: PriorityQueue<u32, Reverse<(u64, u64)>> = PriorityQueue::new();
        let mut seq = 0u64;
        let mut expanded = 0u64;
        let mut pops = 0u64;

        let start_key = arena.key(start.coord, None);
        arena.seed(start_key);
        open.push(start_key, Reverse((0, seq)));

        while let Some((key, Reverse((current_g, _)))) = open.pop() {
            pops += 1;
            arena.close(key);

            let position = arena.coord(key);
            if position == end.coord {
                return found(
                    arena.reconstruct(key),
                    current_g,
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
                log::debug!("Dijkstra gave up after {} expansions: {}", expanded - 1, e);
                return SearchReport {
                    outcome: Err(e),
                    nodes_expanded: expanded - 1,
                    iterations: pops,
                    runtime: watch.elapsed(),
                };
            }

            let incoming = arena.direction(key);
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
                    open.push(next_key, Reverse((tentative_g, seq)));
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
