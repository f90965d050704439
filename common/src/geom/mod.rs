pub mod coord;
pub mod direction;
pub mod rect;
pub mod rtree;
