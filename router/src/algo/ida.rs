use super::engine::{
    Algorithm, SearchBudget, SearchEngine, SearchReport, check_terminals, found, passable,
};
use crate::cost::CostModel;
use crate::error::{BudgetLimit, RouteError};
use crate::grid::{Neighbors, RoutingGrid};
use std::collections::HashSet;
use wire_common::db::core::TerminalPoint;
use wire_common::geom::coord::GridCoord;
use wire_common::geom::direction::Direction;
use wire_common::util::profiler::Stopwatch;

/// One level of the depth-first walk.
struct Frame {
    coord: GridCoord,
    incoming: Option<Direction>,
    g: u64,
    neighbors: Neighbors,
}

/// Iterative-deepening A*. Each round is a depth-first walk bounded by
/// `f <= threshold`; the next threshold is the smallest `f` that overflowed.
/// Memory is the current walk only, paid for with repeated expansions.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdaStar;

enum Round {
    Found(Vec<GridCoord>, u64),
    Exhausted(Option<u64>),
}

impl SearchEngine for IdaStar {
    fn algorithm(&self) -> Algorithm {
        Algorithm::IdaStar
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

        if start.coord == end.coord {
            return found(vec![start.coord], 0, grid, start, end, 0, 0, &watch);
        }

        // Deepening alone would only prove an unreachable end by walking
        // every bounded path, so disconnected terminals are settled up front.
        if !reachable(grid, start.coord, end.coord) {
            log::debug!("IDA*: {} cannot reach {}", start.coord, end.coord);
            return SearchReport {
                outcome: Err(RouteError::NoPath),
                nodes_expanded: 0,
                iterations: 0,
                runtime: watch.elapsed(),
            };
        }

        let mut threshold = cost.heuristic(start.coord, end.coord);
        let mut expanded = 0u64;
        let mut iterations = 0u64;
        let mut stack: Vec<Frame> = Vec::new();
        let mut on_path: HashSet<GridCoord> = HashSet::new();

        loop {
            iterations += 1;
            if iterations > budget.max_iterations {
                return SearchReport {
                    outcome: Err(RouteError::BudgetExceeded(BudgetLimit::Iterations(
                        budget.max_iterations,
                    ))),
                    nodes_expanded: expanded,
                    iterations: iterations - 1,
                    runtime: watch.elapsed(),
                };
            }
            log::trace!("IDA* round {} threshold {}", iterations, threshold);

            let round = deepen(
                start,
                end,
                grid,
                cost,
                budget,
                threshold,
                &mut stack,
                &mut on_path,
                &mut expanded,
                &watch,
            );
            match round {
                Ok(Round::Found(coords, g)) => {
                    return found(coords, g, grid, start, end, expanded, iterations, &watch);
                }
                Ok(Round::Exhausted(Some(next))) => {
                    debug_assert!(next > threshold);
                    threshold = next;
                }
                Ok(Round::Exhausted(None)) => {
                    return SearchReport {
                        outcome: Err(RouteError::NoPath),
                        nodes_expanded: expanded,
                        iterations,
                        runtime: watch.elapsed(),
                    };
                }
                Err(e) => {
                    log::debug!("IDA* gave up in round {}: {}", iterations, e);
                    return SearchReport {
                        outcome: Err(e),
                        nodes_expanded: expanded - 1,
                        iterations,
                        runtime: watch.elapsed(),
                    };
                }
            }
        }
    }
}

/// Flood fill from `start` over passable cells, explicit stack, one bit per
/// cell. The end is reached but never expanded, as in the search itself.
fn reachable(grid: &dyn RoutingGrid, start: GridCoord, end: GridCoord) -> bool {
    let width = grid.width() as usize;
    let mut seen = vec![false; width * grid.height() as usize];
    let mut stack = vec![start];
    seen[start.y as usize * width + start.x as usize] = true;

    while let Some(c) = stack.pop() {
        for next in grid.neighbors(c) {
            if next == end {
                return true;
            }
            let i = next.y as usize * width + next.x as usize;
            if !seen[i] && grid.is_free(next) {
                seen[i] = true;
                stack.push(next);
            }
        }
    }
    false
}

/// One bounded depth-first round. `Exhausted(None)` means nothing was
/// pruned, so every cell reachable from the start has been walked.
#[allow(clippy::too_many_arguments)]
fn deepen(
    start: &TerminalPoint,
    end: &TerminalPoint,
    grid: &dyn RoutingGrid,
    cost: &CostModel,
    budget: &SearchBudget,
    threshold: u64,
    stack: &mut Vec<Frame>,
    on_path: &mut HashSet<GridCoord>,
    expanded: &mut u64,
    watch: &Stopwatch,
) -> Result<Round, RouteError> {
    stack.clear();
    on_path.clear();

    let mut next_threshold: Option<u64> = None;

    *expanded += 1;
    budget.check(*expanded, watch)?;
    on_path.insert(start.coord);
    stack.push(Frame {
        coord: start.coord,
        incoming: None,
        g: 0,
        neighbors: grid.neighbors(start.coord),
    });

    while let Some(frame) = stack.last_mut() {
        let Some((dir, next)) = frame.neighbors.next_directed() else {
            let coord = frame.coord;
            on_path.remove(&coord);
            stack.pop();
            continue;
        };
        let (parent_g, incoming) = (frame.g, frame.incoming);

        if !passable(grid, next, end.coord) || on_path.contains(&next) {
            continue;
        }

        let g = parent_g + cost.edge_cost(incoming, dir);
        let f = g + cost.heuristic(next, end.coord);
        if f > threshold {
            next_threshold = Some(next_threshold.map_or(f, |t| t.min(f)));
            continue;
        }

        if next == end.coord {
            let mut coords: Vec<GridCoord> = stack.iter().map(|fr| fr.coord).collect();
            coords.push(next);
            return Ok(Round::Found(coords, g));
        }

        *expanded += 1;
        budget.check(*expanded, watch)?;
        on_path.insert(next);
        stack.push(Frame {
            coord: next,
            incoming: Some(dir),
            g,
            neighbors: grid.neighbors(next),
        });
    }

    Ok(Round::Exhausted(next_threshold))
}
