use super::coord::GridCoord;
use super::rect::Rect;
use rstar::{AABB, RTree};

/// Footprint index used to find which component covers a cell.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<IndexedRect>,
}

#[derive(PartialEq)]
struct IndexedRect {
    rect: Rect,
    id: usize,
}

fn envelope_of(rect: &Rect) -> AABB<[i64; 2]> {
    // Cells are closed intervals for the tree, so the half-open max is pulled in by one.
    AABB::from_corners(
        [rect.min.x as i64, rect.min.y as i64],
        [rect.max.x as i64 - 1, rect.max.y as i64 - 1],
    )
}

impl rstar::RTreeObject for IndexedRect {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        envelope_of(&self.rect)
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn insert(&mut self, rect: Rect, id: usize) {
        self.tree.insert(IndexedRect { rect, id });
    }

    pub fn remove(&mut self, rect: Rect, id: usize) -> bool {
        self.tree.remove(&IndexedRect { rect, id }).is_some()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn query(&self, rect: Rect) -> Vec<usize> {
        if rect.is_empty() {
            return Vec::new();
        }
        self.tree
            .locate_in_envelope_intersecting(&envelope_of(&rect))
            .map(|item| item.id)
            .collect()
    }

    /// Id of the rectangle covering `c`, if any.
    pub fn at(&self, c: GridCoord) -> Option<usize> {
        let probe = AABB::from_point([c.x as i64, c.y as i64]);
        self.tree
            .locate_in_envelope_intersecting(&probe)
            .map(|item| item.id)
            .next()
    }
}
