use crate::grid::SharedGrid;
use crate::orchestrator::{Orchestrator, RouteMode, RouteRequest, RouteResponse};
use wire_common::db::core::{CircuitDB, LayoutError};
use wire_common::db::indices::{ComponentId, WireId};
use wire_common::geom::coord::GridCoord;

/// Routes `wires` against one snapshot of `grid` and stores each wire's
/// best path in the layout (or clears it when every engine failed).
pub fn route_wires(
    db: &mut CircuitDB,
    grid: &SharedGrid,
    orch: &Orchestrator,
    wires: &[WireId],
    mode: RouteMode,
) -> Vec<(WireId, RouteResponse)> {
    let requests: Vec<RouteRequest> = wires
        .iter()
        .map(|&w| {
            let (start, end) = db.wire_terminals(w);
            RouteRequest { start, end }
        })
        .collect();

    let responses = {
        let snapshot = grid.read();
        orch.route_batch(&*snapshot, &requests, mode)
    };

    for (&wire, response) in wires.iter().zip(&responses) {
        let route = response
            .best_path()
            .map(|p| p.coords().to_vec())
            .unwrap_or_default();
        if route.is_empty() {
            log::warn!("Wire '{}' left unrouted", db.wires[wire.index()].name);
        }
        db.set_route(wire, route);
    }

    wires.iter().copied().zip(responses).collect()
}

/// Moves a component, patches the grid under its write lock, then reroutes
/// every wire attached to the component or running across its new footprint.
pub fn move_and_reroute(
    db: &mut CircuitDB,
    grid: &SharedGrid,
    orch: &Orchestrator,
    component: ComponentId,
    origin: GridCoord,
    mode: RouteMode,
) -> Result<Vec<(WireId, RouteResponse)>, LayoutError> {
    let footprint = db.move_component(component, origin)?;
    {
        let mut g = grid.write();
        g.clear_owner(component);
        g.occupy_rect(footprint, component);
    }

    let mut affected = db.wires_of(component);
    for (i, wire) in db.wires.iter().enumerate() {
        let id = WireId::new(i);
        if affected.contains(&id) || wire.route.len() < 3 {
            continue;
        }
        let interior = &wire.route[1..wire.route.len() - 1];
        if interior.iter().any(|&c| footprint.contains(c)) {
            affected.push(id);
        }
    }
    affected.sort();

    log::info!(
        "Moved '{}' to {}; rerouting {} wires",
        db.components[component.index()].name,
        origin,
        affected.len()
    );
    Ok(route_wires(db, grid, orch, &affected, mode))
}
