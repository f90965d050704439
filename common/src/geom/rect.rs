use super::coord::GridCoord;
use serde::{Deserialize, Serialize};

/// Half-open cell rectangle: covers `min.x..max.x` by `min.y..max.y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl Rect {
    pub fn new(min: GridCoord, max: GridCoord) -> Self {
        Self { min, max }
    }

    pub fn from_origin(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            min: GridCoord::new(x, y),
            max: GridCoord::new(x + width, y + height),
        }
    }

    /// `from_origin` for untrusted input; `None` when the far corner
    /// does not fit in `u32`.
    pub fn checked_from_origin(x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        Some(Self {
            min: GridCoord::new(x, y),
            max: GridCoord::new(x.checked_add(width)?, y.checked_add(height)?),
        })
    }

    pub fn width(&self) -> u32 {
        self.max.x.saturating_sub(self.min.x)
    }
    pub fn height(&self) -> u32 {
        self.max.y.saturating_sub(self.min.y)
    }
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= self.min.x && c.x < self.max.x && c.y >= self.min.y && c.y < self.max.y
    }

    /// True for cells of the rectangle that touch its outline.
    pub fn on_boundary(&self, c: GridCoord) -> bool {
        self.contains(c)
            && (c.x == self.min.x
                || c.x + 1 == self.max.x
                || c.y == self.min.y
                || c.y + 1 == self.max.y)
    }

    /// Same size, moved so that its corner sits at `origin`.
    pub fn moved_to(&self, origin: GridCoord) -> Option<Rect> {
        Rect::checked_from_origin(origin.x, origin.y, self.width(), self.height())
    }

    /// Grows the rectangle by `margin` on every side, saturating at zero.
    pub fn inflate(&self, margin: u32) -> Rect {
        Rect {
            min: GridCoord::new(
                self.min.x.saturating_sub(margin),
                self.min.y.saturating_sub(margin),
            ),
            max: GridCoord::new(
                self.max.x.saturating_add(margin),
                self.max.y.saturating_add(margin),
            ),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (self.min.y..self.max.y)
            .flat_map(move |y| (self.min.x..self.max.x).map(move |x| GridCoord::new(x, y)))
    }
}
