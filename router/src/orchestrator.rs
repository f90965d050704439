use crate::algo::{Algorithm, SearchBudget, SearchEngine, SearchReport};
use crate::cost::CostModel;
use crate::error::RouteError;
use crate::grid::{RoutingGrid, SharedGrid};
use crate::path::Path;
use rayon::prelude::*;
use std::sync::Mutex;
use std::time::Duration;
use wire_common::db::core::TerminalPoint;
use wire_common::util::config::RoutingConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteMode {
    Single(Algorithm),
    CompareAll,
}

/// Effort and quality figures of one engine invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMetrics {
    pub algorithm: Algorithm,
    pub runtime: Duration,
    pub nodes_expanded: u64,
    pub iterations: u64,
    /// `None` when no path was produced.
    pub cost: Option<u64>,
    pub bends: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct RouteResult {
    pub outcome: Result<Path, RouteError>,
    pub metrics: RouteMetrics,
}

impl RouteResult {
    fn from_report(algorithm: Algorithm, report: SearchReport) -> Self {
        let (outcome, cost, bends) = match report.outcome {
            Ok(found) => {
                let bends = found.path.bends();
                (Ok(found.path), Some(found.cost), Some(bends))
            }
            Err(e) => (Err(e), None, None),
        };
        Self {
            outcome,
            metrics: RouteMetrics {
                algorithm,
                runtime: report.runtime,
                nodes_expanded: report.nodes_expanded,
                iterations: report.iterations,
                cost,
                bends,
            },
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.outcome.as_ref().ok()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub fastest: Algorithm,
    pub fewest_expanded: Algorithm,
    /// True when every engine that found a path reports the same cost.
    pub costs_agree: bool,
}

impl Comparison {
    /// Only successful engines are ranked, unless every engine failed.
    fn of(results: &[RouteResult]) -> Option<Self> {
        let succeeded: Vec<&RouteResult> = results.iter().filter(|r| r.outcome.is_ok()).collect();
        let ranked: Vec<&RouteResult> = if succeeded.is_empty() {
            results.iter().collect()
        } else {
            succeeded
        };
        let fastest = ranked.iter().min_by_key(|r| r.metrics.runtime)?;
        let fewest = ranked.iter().min_by_key(|r| r.metrics.nodes_expanded)?;
        let mut costs = results.iter().filter_map(|r| r.metrics.cost);
        let costs_agree = match costs.next() {
            Some(first) => costs.all(|c| c == first),
            None => true,
        };
        Some(Self {
            fastest: fastest.metrics.algorithm,
            fewest_expanded: fewest.metrics.algorithm,
            costs_agree,
        })
    }
}

#[derive(Clone, Debug)]
pub struct RouteResponse {
    /// One entry per invoked engine, in `Algorithm::ALL` order.
    pub results: Vec<RouteResult>,
    pub comparison: Option<Comparison>,
}

impl RouteResponse {
    pub fn result(&self, algorithm: Algorithm) -> Option<&RouteResult> {
        self.results.iter().find(|r| r.metrics.algorithm == algorithm)
    }

    /// First path found, in engine order.
    pub fn best_path(&self) -> Option<&Path> {
        self.results.iter().find_map(RouteResult::path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteRequest {
    pub start: TerminalPoint,
    pub end: TerminalPoint,
}

/// Receives the metrics of every engine invocation.
pub trait MetricsSink: Send + Sync {
    fn record(&self, metrics: &RouteMetrics);
}

/// Writes metrics to the `log` facade at debug level.
pub struct LogSink;

impl MetricsSink for LogSink {
    fn record(&self, m: &RouteMetrics) {
        log::debug!(
            "{:<8} cost={:<6} bends={:<4} expanded={:<8} iterations={:<8} time={:?}",
            m.algorithm.name(),
            m.cost.map_or("-".to_string(), |c| c.to_string()),
            m.bends.map_or("-".to_string(), |b| b.to_string()),
            m.nodes_expanded,
            m.iterations,
            m.runtime
        );
    }
}

/// Keeps every record in memory.
#[derive(Default)]
pub struct CollectingSink {
    records: Mutex<Vec<RouteMetrics>>,
}

impl CollectingSink {
    pub fn take(&self) -> Vec<RouteMetrics> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl MetricsSink for CollectingSink {
    fn record(&self, metrics: &RouteMetrics) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(metrics.clone());
    }
}

impl<S: MetricsSink + ?Sized> MetricsSink for std::sync::Arc<S> {
    fn record(&self, metrics: &RouteMetrics) {
        (**self).record(metrics);
    }
}

/// Runs routing requests against the engines with one cost model and budget.
pub struct Orchestrator {
    engines: Vec<&'static dyn SearchEngine>,
    cost: CostModel,
    budget: SearchBudget,
    sink: Box<dyn MetricsSink>,
}

impl Orchestrator {
    pub fn new(cost: CostModel, budget: SearchBudget) -> Self {
        Self {
            engines: Algorithm::ALL.iter().map(|a| a.engine()).collect(),
            cost,
            budget,
            sink: Box::new(LogSink),
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(
            CostModel::from_config(config),
            SearchBudget::from_config(config),
        )
    }

    pub fn with_sink(mut self, sink: impl MetricsSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    fn engine(&self, algorithm: Algorithm) -> &'static dyn SearchEngine {
        self.engines
            .iter()
            .copied()
            .find(|e| e.algorithm() == algorithm)
            .unwrap_or_else(|| algorithm.engine())
    }

    fn invoke(
        &self,
        engine: &dyn SearchEngine,
        grid: &dyn RoutingGrid,
        start: &TerminalPoint,
        end: &TerminalPoint,
    ) -> RouteResult {
        let report = engine.find(start, end, grid, &self.cost, &self.budget);
        let result = RouteResult::from_report(engine.algorithm(), report);
        self.sink.record(&result.metrics);
        result
    }

    /// Routes one terminal pair. The grid is only read.
    pub fn route(
        &self,
        grid: &dyn RoutingGrid,
        start: &TerminalPoint,
        end: &TerminalPoint,
        mode: RouteMode,
    ) -> RouteResponse {
        match mode {
            RouteMode::Single(algorithm) => RouteResponse {
                results: vec![self.invoke(self.engine(algorithm), grid, start, end)],
                comparison: None,
            },
            RouteMode::CompareAll => {
                let results: Vec<RouteResult> = self
                    .engines
                    .par_iter()
                    .map(|&engine| self.invoke(engine, grid, start, end))
                    .collect();
                let comparison = Comparison::of(&results);
                RouteResponse {
                    results,
                    comparison,
                }
            }
        }
    }

    /// Routes while holding the read side of `grid` for the whole request.
    pub fn route_shared(
        &self,
        grid: &SharedGrid,
        start: &TerminalPoint,
        end: &TerminalPoint,
        mode: RouteMode,
    ) -> RouteResponse {
        let snapshot = grid.read();
        self.route(&*snapshot, start, end, mode)
    }

    /// Routes independent requests in parallel against one snapshot.
    pub fn route_batch(
        &self,
        grid: &dyn RoutingGrid,
        requests: &[RouteRequest],
        mode: RouteMode,
    ) -> Vec<RouteResponse> {
        requests
            .par_iter()
            .map(|req| self.route(grid, &req.start, &req.end, mode))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DenseGrid;
    use std::sync::Arc;
    use wire_common::db::indices::{ComponentId, PinId};
    use wire_common::geom::coord::GridCoord;

    fn terminal(x: u32, y: u32) -> TerminalPoint {
        TerminalPoint::new(ComponentId::new(900), PinId::new(0), GridCoord::new(x, y))
    }

    #[test]
    fn single_mode_runs_one_engine() {
        let grid = DenseGrid::new(8, 8);
        let sink = Arc::new(CollectingSink::default());
        let orch = Orchestrator::new(CostModel::default(), SearchBudget::unlimited())
            .with_sink(sink.clone());
        let response = orch.route(
            &grid,
            &terminal(0, 0),
            &terminal(7, 0),
            RouteMode::Single(Algorithm::Dijkstra),
        );
        assert_eq!(response.results.len(), 1);
        assert!(response.comparison.is_none());
        assert_eq!(response.results[0].metrics.algorithm, Algorithm::Dijkstra);
        assert_eq!(response.results[0].metrics.cost, Some(7));

        let records = sink.take();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], response.results[0].metrics);
    }

    #[test]
    fn compare_all_keeps_engine_order() {
        let grid = DenseGrid::new(8, 8);
        let orch = Orchestrator::new(CostModel::new(1, 2), SearchBudget::unlimited());
        let response = orch.route(&grid, &terminal(0, 0), &terminal(4, 4), RouteMode::CompareAll);
        let order: Vec<_> = response.results.iter().map(|r| r.metrics.algorithm).collect();
        assert_eq!(order, Algorithm::ALL.to_vec());
        let cmp = response.comparison.unwrap();
        assert!(cmp.costs_agree);
        assert_ne!(cmp.fewest_expanded, Algorithm::Dijkstra);
        assert_eq!(response.result(Algorithm::IdaStar).unwrap().metrics.cost, Some(10));
    }

    #[test]
    fn batch_and_shared_grid() {
        let shared = SharedGrid::new(DenseGrid::new(6, 6));
        let orch = Orchestrator::new(CostModel::default(), SearchBudget::unlimited());
        let requests = vec![
            RouteRequest {
                start: terminal(0, 0),
                end: terminal(5, 0),
            },
            RouteRequest {
                start: terminal(0, 5),
                end: terminal(0, 0),
            },
        ];
        let responses = orch.route_batch(&*shared.read(), &requests, RouteMode::Single(Algorithm::AStar));
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[1].results[0].metrics.cost, Some(5));

        let single = orch.route_shared(
            &shared,
            &terminal(0, 0),
            &terminal(5, 5),
            RouteMode::Single(Algorithm::IdaStar),
        );
        assert_eq!(single.best_path().unwrap().len(), 10);
    }

    fn result(algorithm: Algorithm, ok: bool, micros: u64, expanded: u64) -> RouteResult {
        let outcome = if ok {
            Ok(Path::new(vec![GridCoord::new(0, 0), GridCoord::new(1, 0)]))
        } else {
            Err(RouteError::BudgetExceeded(crate::error::BudgetLimit::Expansions(0)))
        };
        RouteResult {
            outcome,
            metrics: RouteMetrics {
                algorithm,
                runtime: Duration::from_micros(micros),
                nodes_expanded: expanded,
                iterations: expanded,
                cost: ok.then_some(1),
                bends: ok.then_some(0),
            },
        }
    }

    #[test]
    fn failed_engines_do_not_win_the_comparison() {
        let results = vec![
            result(Algorithm::AStar, true, 50, 40),
            result(Algorithm::Dijkstra, true, 30, 90),
            result(Algorithm::IdaStar, false, 1, 0),
        ];
        let cmp = Comparison::of(&results).unwrap();
        assert_eq!(cmp.fastest, Algorithm::Dijkstra);
        assert_eq!(cmp.fewest_expanded, Algorithm::AStar);
        assert!(cmp.costs_agree);

        let all_failed = vec![
            result(Algorithm::AStar, false, 9, 4),
            result(Algorithm::Dijkstra, false, 3, 7),
        ];
        let cmp = Comparison::of(&all_failed).unwrap();
        assert_eq!(cmp.fastest, Algorithm::Dijkstra);
        assert_eq!(cmp.fewest_expanded, Algorithm::AStar);
    }
}
