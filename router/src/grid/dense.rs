use super::RoutingGrid;
use wire_common::db::core::CircuitDB;
use wire_common::db::indices::ComponentId;
use wire_common::geom::coord::GridCoord;
use wire_common::geom::rect::Rect;

const FREE: u32 = u32::MAX;

/// Row-major occupancy grid, one owner id per cell (4 bytes).
#[derive(Clone)]
pub struct DenseGrid {
    width: u32,
    height: u32,
    cells: Vec<u32>,
}

impl DenseGrid {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid must be at least 1x1");
        let size = (width as usize) * (height as usize);

        if size > 100_000_000 {
            log::warn!(
                "Allocating large DenseGrid: {} cells. Ensure sufficient RAM.",
                size
            );
        }

        Self {
            width,
            height,
            cells: vec![FREE; size],
        }
    }

    /// Rebuilds occupancy from every footprint of the layout.
    pub fn from_circuit(db: &CircuitDB) -> Self {
        let mut grid = Self::new(db.width, db.height);
        for (i, comp) in db.components.iter().enumerate() {
            grid.occupy_rect(comp.footprint, ComponentId::new(i));
        }
        log::debug!(
            "Grid {}x{} built, {} cells occupied",
            grid.width,
            grid.height,
            grid.occupied_count()
        );
        grid
    }

    #[inline(always)]
    fn index(&self, coord: GridCoord) -> usize {
        assert!(
            self.in_bounds(coord),
            "{} outside {}x{} grid",
            coord,
            self.width,
            self.height
        );
        (coord.y as usize) * (self.width as usize) + (coord.x as usize)
    }

    pub fn occupy_rect(&mut self, rect: Rect, owner: ComponentId) {
        for c in rect.cells() {
            self.mark_occupied(c, owner);
        }
    }

    /// Frees every cell owned by `owner`.
    pub fn clear_owner(&mut self, owner: ComponentId) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|c| **c == owner.0) {
            *cell = FREE;
            cleared += 1;
        }
        cleared
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != FREE).count()
    }
}

impl RoutingGrid for DenseGrid {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn owner(&self, coord: GridCoord) -> Option<ComponentId> {
        if !self.in_bounds(coord) {
            return None;
        }
        match self.cells[self.index(coord)] {
            FREE => None,
            id => Some(ComponentId(id)),
        }
    }

    fn mark_occupied(&mut self, coord: GridCoord, owner: ComponentId) {
        assert_ne!(owner.0, FREE, "component id reserved for free cells");
        let idx = self.index(coord);
        self.cells[idx] = owner.0;
    }

    fn clear(&mut self, coord: GridCoord) {
        let idx = self.index(coord);
        self.cells[idx] = FREE;
    }
}
