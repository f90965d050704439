use super::DenseGrid;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Single-writer / multi-reader home of the grid. A routing request holds
/// one read guard for its whole run, so layout edits land between requests.
pub struct SharedGrid {
    inner: RwLock<DenseGrid>,
}

impl SharedGrid {
    pub fn new(grid: DenseGrid) -> Self {
        Self {
            inner: RwLock::new(grid),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, DenseGrid> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, DenseGrid> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn into_inner(self) -> DenseGrid {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RoutingGrid;
    use wire_common::db::indices::ComponentId;
    use wire_common::geom::coord::GridCoord;

    #[test]
    fn readers_see_completed_writes() {
        let shared = SharedGrid::new(DenseGrid::new(3, 3));
        {
            let r1 = shared.read();
            let r2 = shared.read();
            assert!(r1.is_free(GridCoord::new(1, 1)) && r2.is_free(GridCoord::new(1, 1)));
        }
        shared
            .write()
            .mark_occupied(GridCoord::new(1, 1), ComponentId::new(0));
        assert!(!shared.read().is_free(GridCoord::new(1, 1)));
    }
}
