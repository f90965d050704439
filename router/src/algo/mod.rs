mod arena;
pub mod astar;
pub mod dijkstra;
pub mod engine;
pub mod ida;

pub use astar::AStar;
pub use dijkstra::Dijkstra;
pub use engine::{Algorithm, Found, SearchBudget, SearchEngine, SearchReport};
pub use ida::IdaStar;
