use crate::path::Path;
use wire_common::geom::coord::GridCoord;
use wire_common::geom::direction::Direction;
use wire_common::util::config::RoutingConfig;

/// Uniform step cost plus a penalty for every change of direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostModel {
    pub base_cost: u32,
    pub bend_penalty: u32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            base_cost: 1,
            bend_penalty: 1,
        }
    }
}

impl CostModel {
    pub fn new(base_cost: u32, bend_penalty: u32) -> Self {
        assert!(base_cost > 0, "base cost must be positive");
        Self {
            base_cost,
            bend_penalty,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.base_cost, config.bend_penalty)
    }

    /// Cost of stepping in `next` after arriving via `previous`. The first
    /// move out of the start has no previous direction and never bends.
    #[inline(always)]
    pub fn edge_cost(&self, previous: Option<Direction>, next: Direction) -> u64 {
        match previous {
            Some(prev) if prev != next => self.base_cost as u64 + self.bend_penalty as u64,
            _ => self.base_cost as u64,
        }
    }

    /// Manhattan distance. Never above the true remaining cost: every step
    /// costs at least one and bends only add.
    #[inline(always)]
    pub fn heuristic(&self, a: GridCoord, b: GridCoord) -> u64 {
        a.manhattan(b) as u64
    }

    pub fn path_cost(&self, path: &Path) -> u64 {
        let mut prev = None;
        let mut total = 0;
        for dir in path.directions() {
            total += self.edge_cost(prev, dir);
            prev = Some(dir);
        }
        total
    }
}
