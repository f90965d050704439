use wire_common::geom::coord::GridCoord;
use wire_common::geom::direction::Direction;

const NO_PARENT: u32 = u32::MAX;
/// Slot for the start state, which has no incoming direction.
const NO_DIRECTION: usize = 4;
const SLOTS: usize = 5;

/// Search bookkeeping indexed by state value. A state is a cell plus the
/// direction it was entered from, so each cell owns `SLOTS` entries.
pub(crate) struct SearchArena {
    width: u32,
    g_score: Vec<u64>,
    parents: Vec<u32>,
    closed: Vec<bool>,
}

impl SearchArena {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * SLOTS;
        assert!(size < NO_PARENT as usize, "grid too large for search arena");
        Self {
            width,
            g_score: vec![u64::MAX; size],
            parents: vec![NO_PARENT; size],
            closed: vec![false; size],
        }
    }

    #[inline(always)]
    pub(crate) fn key(&self, c: GridCoord, dir: Option<Direction>) -> u32 {
        let cell = (c.y as usize) * (self.width as usize) + (c.x as usize);
        let slot = dir.map_or(NO_DIRECTION, Direction::index);
        (cell * SLOTS + slot) as u32
    }

    #[inline(always)]
    pub(crate) fn coord(&self, key: u32) -> GridCoord {
        let cell = key as usize / SLOTS;
        GridCoord::new(
            (cell % self.width as usize) as u32,
            (cell / self.width as usize) as u32,
        )
    }

    #[inline(always)]
    pub(crate) fn direction(&self, key: u32) -> Option<Direction> {
        Direction::from_index(key as usize % SLOTS)
    }

    #[inline(always)]
    pub(crate) fn g(&self, key: u32) -> u64 {
        self.g_score[key as usize]
    }

    pub(crate) fn seed(&mut self, key: u32) {
        self.g_score[key as usize] = 0;
        self.parents[key as usize] = NO_PARENT;
    }

    /// Records `g` via `parent` if it beats the best known cost.
    #[inline(always)]
    pub(crate) fn relax(&mut self, key: u32, g: u64, parent: u32) -> bool {
        let k = key as usize;
        if g < self.g_score[k] {
            self.g_score[k] = g;
            self.parents[k] = parent;
            true
        } else {
            false
        }
    }

    #[inline(always)]
    pub(crate) fn is_closed(&self, key: u32) -> bool {
        self.closed[key as usize]
    }

    #[inline(always)]
    pub(crate) fn close(&mut self, key: u32) {
        self.closed[key as usize] = true;
    }

    /// Walks parents back from `key`; returns cells start first.
    pub(crate) fn reconstruct(&self, key: u32) -> Vec<GridCoord> {
        let mut path = Vec::new();
        let mut curr = key;
        loop {
            path.push(self.coord(curr));
            let parent = self.parents[curr as usize];
            if parent == NO_PARENT {
                break;
            }
            curr = parent;
        }
        path.reverse();
        path
    }
}
