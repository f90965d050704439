pub mod dense;
pub mod shared;

pub use dense::DenseGrid;
pub use shared::SharedGrid;

use wire_common::db::indices::ComponentId;
use wire_common::geom::coord::GridCoord;
use wire_common::geom::direction::Direction;

/// Occupancy source of truth for routing. Searches only read through it;
/// the mutators are for whoever places and moves components.
pub trait RoutingGrid: Sync + Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Owner of the cell, `None` when free or off the canvas.
    fn owner(&self, coord: GridCoord) -> Option<ComponentId>;

    fn mark_occupied(&mut self, coord: GridCoord, owner: ComponentId);
    fn clear(&mut self, coord: GridCoord);

    #[inline]
    fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x < self.width() && coord.y < self.height()
    }

    /// Off-canvas cells count as occupied.
    #[inline]
    fn is_free(&self, coord: GridCoord) -> bool {
        self.in_bounds(coord) && self.owner(coord).is_none()
    }

    fn neighbors(&self, coord: GridCoord) -> Neighbors {
        Neighbors::new(coord, self.width(), self.height())
    }
}

/// In-bounds orthogonal neighbors of a cell, always in north, south, east,
/// west order. Cloning restarts from the clone point.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: GridCoord,
    width: u32,
    height: u32,
    next: usize,
}

impl Neighbors {
    pub fn new(center: GridCoord, width: u32, height: u32) -> Self {
        Self {
            center,
            width,
            height,
            next: 0,
        }
    }

    /// Like `next`, but also reports the direction of the step.
    pub fn next_directed(&mut self) -> Option<(Direction, GridCoord)> {
        while let Some(dir) = Direction::from_index(self.next) {
            self.next += 1;
            if let Some(c) = dir.step(self.center, self.width, self.height) {
                return Some((dir, c));
            }
        }
        None
    }
}

impl Iterator for Neighbors {
    type Item = GridCoord;

    fn next(&mut self) -> Option<GridCoord> {
        self.next_directed().map(|(_, c)| c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(Direction::ALL.len().saturating_sub(self.next)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_order_and_clipping() {
        let inner: Vec<_> = Neighbors::new(GridCoord::new(1, 1), 3, 3).collect();
        assert_eq!(
            inner,
            vec![
                GridCoord::new(1, 0),
                GridCoord::new(1, 2),
                GridCoord::new(2, 1),
                GridCoord::new(0, 1),
            ]
        );

        let corner: Vec<_> = Neighbors::new(GridCoord::new(0, 0), 3, 3).collect();
        assert_eq!(corner, vec![GridCoord::new(0, 1), GridCoord::new(1, 0)]);

        let single: Vec<_> = Neighbors::new(GridCoord::new(0, 0), 1, 1).collect();
        assert!(single.is_empty());
    }

    #[test]
    fn clone_restarts_sequence() {
        let mut n = Neighbors::new(GridCoord::new(2, 2), 5, 5);
        n.next();
        let snapshot = n.clone();
        let rest: Vec<_> = n.collect();
        assert_eq!(rest.len(), 3);
        assert_eq!(snapshot.collect::<Vec<_>>(), rest);
    }
}
