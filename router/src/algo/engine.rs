use super::{AStar, Dijkstra, IdaStar};
use crate::cost::CostModel;
use crate::error::{BudgetLimit, RouteError, TerminalRole, UnknownAlgorithm};
use crate::grid::RoutingGrid;
use crate::path::Path;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use wire_common::db::core::TerminalPoint;
use wire_common::geom::coord::GridCoord;
use wire_common::util::config::RoutingConfig;
use wire_common::util::profiler::Stopwatch;

/// Expansions between two wall-clock checks.
pub(crate) const TIME_CHECK_INTERVAL: u64 = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    AStar,
    Dijkstra,
    IdaStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::AStar, Algorithm::Dijkstra, Algorithm::IdaStar];

    pub fn engine(self) -> &'static dyn SearchEngine {
        match self {
            Algorithm::AStar => &AStar,
            Algorithm::Dijkstra => &Dijkstra,
            Algorithm::IdaStar => &IdaStar,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "A*",
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::IdaStar => "IDA*",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "ida" | "idastar" | "ida*" | "ida-star" => Ok(Algorithm::IdaStar),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Upper bounds on one search. `max_iterations` only applies to IDA*.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchBudget {
    pub max_expansions: u64,
    pub max_iterations: u64,
    pub time_limit: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self {
            max_expansions: u64::MAX,
            max_iterations: u64::MAX,
            time_limit: None,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            max_expansions: config.max_expansions,
            max_iterations: config.ida_max_iterations,
            time_limit: config.time_limit(),
        }
    }

    /// Checked after each expansion; the clock is only read every
    /// `TIME_CHECK_INTERVAL` expansions.
    #[inline]
    pub(crate) fn check(&self, expanded: u64, watch: &Stopwatch) -> Result<(), RouteError> {
        if expanded > self.max_expansions {
            return Err(RouteError::BudgetExceeded(BudgetLimit::Expansions(
                self.max_expansions,
            )));
        }
        if expanded % TIME_CHECK_INTERVAL == 0 && watch.exceeded(self.time_limit) {
            if let Some(limit) = self.time_limit {
                return Err(RouteError::BudgetExceeded(BudgetLimit::Time(limit)));
            }
        }
        Ok(())
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Found {
    pub path: Path,
    pub cost: u64,
}

/// Outcome of one engine invocation together with its effort counters.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub outcome: Result<Found, RouteError>,
    pub nodes_expanded: u64,
    /// Threshold rounds for IDA*, open-set pops otherwise.
    pub iterations: u64,
    pub runtime: Duration,
}

impl SearchReport {
    pub(crate) fn failed(error: RouteError, watch: &Stopwatch) -> Self {
        Self {
            outcome: Err(error),
            nodes_expanded: 0,
            iterations: 0,
            runtime: watch.elapsed(),
        }
    }
}

/// A point-to-point router. Implementations hold no state between calls
/// and may be shared across threads.
pub trait SearchEngine: Send + Sync {
    fn algorithm(&self) -> Algorithm;

    fn find(
        &self,
        start: &TerminalPoint,
        end: &TerminalPoint,
        grid: &dyn RoutingGrid,
        cost: &CostModel,
        budget: &SearchBudget,
    ) -> SearchReport;
}

/// A terminal may sit on a free cell or on its own component's footprint.
pub(crate) fn check_terminals(
    grid: &dyn RoutingGrid,
    start: &TerminalPoint,
    end: &TerminalPoint,
) -> Result<(), RouteError> {
    for (role, t) in [(TerminalRole::Start, start), (TerminalRole::End, end)] {
        let usable = grid.in_bounds(t.coord)
            && grid
                .owner(t.coord)
                .is_none_or(|owner| owner == t.component);
        if !usable {
            log::debug!("Rejecting {} terminal at {}", role, t.coord);
            return Err(RouteError::InvalidTerminal {
                role,
                coord: t.coord,
            });
        }
    }
    Ok(())
}

/// Interior cells must be free; the end cell may belong to its own component.
#[inline(always)]
pub(crate) fn passable(grid: &dyn RoutingGrid, c: GridCoord, end: GridCoord) -> bool {
    c == end || grid.is_free(c)
}

/// Shared tail of every engine: validate the path and package the report.
pub(crate) fn found(
    coords: Vec<GridCoord>,
    cost: u64,
    grid: &dyn RoutingGrid,
    start: &TerminalPoint,
    end: &TerminalPoint,
    nodes_expanded: u64,
    iterations: u64,
    watch: &Stopwatch,
) -> SearchReport {
    let path = Path::new(coords);
    path.assert_valid(grid, start.coord, end.coord);
    SearchReport {
        outcome: Ok(Found { path, cost }),
        nodes_expanded,
        iterations,
        runtime: watch.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("astar".parse::<Algorithm>(), Ok(Algorithm::AStar));
        assert_eq!("Dijkstra".parse::<Algorithm>(), Ok(Algorithm::Dijkstra));
        assert_eq!("IDA*".parse::<Algorithm>(), Ok(Algorithm::IdaStar));
        assert_eq!("ida".parse::<Algorithm>(), Ok(Algorithm::IdaStar));
        assert!("bfs".parse::<Algorithm>().is_err());
    }

    #[test]
    fn engines_report_their_algorithm() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.engine().algorithm(), algo);
        }
    }

    #[test]
    fn expansion_budget_trips_after_limit() {
        let budget = SearchBudget {
            max_expansions: 3,
            ..SearchBudget::unlimited()
        };
        let watch = Stopwatch::start();
        assert!(budget.check(3, &watch).is_ok());
        assert_eq!(
            budget.check(4, &watch),
            Err(RouteError::BudgetExceeded(BudgetLimit::Expansions(3)))
        );
    }
}
