use crate::grid::RoutingGrid;
use wire_common::geom::coord::GridCoord;
use wire_common::geom::direction::Direction;

/// Ordered cells from the start terminal to the end terminal, both included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    coords: Vec<GridCoord>,
}

impl Path {
    pub fn new(coords: Vec<GridCoord>) -> Self {
        assert!(!coords.is_empty(), "a path holds at least its start");
        Self { coords }
    }

    pub fn coords(&self) -> &[GridCoord] {
        &self.coords
    }

    pub fn start(&self) -> GridCoord {
        self.coords[0]
    }

    pub fn end(&self) -> GridCoord {
        self.coords[self.coords.len() - 1]
    }

    /// Number of moves.
    pub fn len(&self) -> usize {
        self.coords.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.coords.windows(2).map(|w| {
            Direction::between(w[0], w[1])
                .unwrap_or_else(|| panic!("path steps from {} to {}", w[0], w[1]))
        })
    }

    /// Number of direction changes along the path.
    pub fn bends(&self) -> usize {
        let dirs: Vec<Direction> = self.directions().collect();
        dirs.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Start, every corner, and end: the polyline a renderer draws.
    pub fn corners(&self) -> Vec<GridCoord> {
        let mut out = vec![self.start()];
        let dirs: Vec<Direction> = self.directions().collect();
        for (i, w) in dirs.windows(2).enumerate() {
            if w[0] != w[1] {
                out.push(self.coords[i + 1]);
            }
        }
        if self.coords.len() > 1 {
            out.push(self.end());
        }
        out
    }

    /// Panics unless the path joins `start` to `end` through adjacent cells
    /// and every interior cell is free. A failure here is a search bug.
    pub fn assert_valid(&self, grid: &dyn RoutingGrid, start: GridCoord, end: GridCoord) {
        assert_eq!(self.start(), start, "path does not begin at its start terminal");
        assert_eq!(self.end(), end, "path does not finish at its end terminal");
        for w in self.coords.windows(2) {
            assert!(w[0].is_adjacent(w[1]), "path jumps from {} to {}", w[0], w[1]);
        }
        if self.coords.len() > 2 {
            for &c in &self.coords[1..self.coords.len() - 1] {
                assert!(grid.is_free(c), "path crosses occupied cell {}", c);
            }
        }
    }
}
