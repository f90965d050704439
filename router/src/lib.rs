pub mod algo;
pub mod cost;
pub mod error;
pub mod grid;
pub mod orchestrator;
pub mod path;
pub mod reroute;

pub use algo::{Algorithm, SearchBudget, SearchEngine};
pub use cost::CostModel;
pub use error::RouteError;
pub use grid::{DenseGrid, RoutingGrid, SharedGrid};
pub use orchestrator::{Orchestrator, RouteMetrics, RouteMode, RouteResponse, RouteResult};
pub use path::Path;

use wire_common::db::core::CircuitDB;
use wire_common::db::indices::WireId;
use wire_common::util::config::RoutingConfig;

/// Routes every wire of the layout and writes the routes back into it.
pub fn route(
    db: &mut CircuitDB,
    config: &RoutingConfig,
    mode: RouteMode,
) -> Vec<(WireId, RouteResponse)> {
    let grid = SharedGrid::new(DenseGrid::from_circuit(db));
    let orch = Orchestrator::from_config(config);
    let wires: Vec<WireId> = WireId::range(db.num_wires()).collect();

    log::info!("Routing {} wires ({:?})...", wires.len(), mode);
    reroute::route_wires(db, &grid, &orch, &wires, mode)
}
