use crate::db::core::CircuitDB;
use crate::db::indices::{PinId, WireId};
use crate::geom::coord::GridCoord;
use rayon::prelude::*;
use std::collections::HashSet;

/// Verifies that every pin can host a wire end: on the canvas, not inside a
/// foreign footprint, and on the outline of its own footprint.
pub fn run_layout_check(db: &CircuitDB) -> Result<(), String> {
    log::info!("Starting Layout Verification...");

    let failures: Vec<String> = db
        .pins
        .par_iter()
        .enumerate()
        .filter_map(|(i, pin)| {
            let name = db.pin_full_name(PinId::new(i));
            if !db.in_bounds(pin.coord) {
                return Some(format!("Pin '{}' at {} is off the canvas", name, pin.coord));
            }
            match db.owner_at(pin.coord) {
                Some(owner) if owner != pin.component => Some(format!(
                    "Pin '{}' at {} sits on '{}'",
                    name,
                    pin.coord,
                    db.components[owner.index()].name
                )),
                Some(_) if !db.components[pin.component.index()].footprint.on_boundary(pin.coord) => {
                    Some(format!("Pin '{}' at {} is buried in its footprint", name, pin.coord))
                }
                _ => None,
            }
        })
        .collect();

    if failures.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: Layout is valid.");
        Ok(())
    } else {
        for f in &failures {
            log::error!("FAIL: {}", f);
        }
        Err(format!("Layout verification failed ({} errors)", failures.len()))
    }
}

/// Re-checks every routed wire against the layout. Unrouted wires are
/// reported but do not fail the check.
pub fn run(db: &CircuitDB) -> Result<(), String> {
    log::info!("Starting Route Verification...");

    let results: Vec<Result<bool, String>> = (0..db.num_wires())
        .into_par_iter()
        .map(|i| check_wire(db, WireId::new(i)))
        .collect();

    let mut msgs = Vec::new();
    let mut open = 0;
    for result in results {
        match result {
            Ok(true) => {}
            Ok(false) => open += 1,
            Err(e) => {
                log::error!("\x1b[31mFAIL\x1b[0m: {}", e);
                msgs.push(e);
            }
        }
    }

    if open > 0 {
        log::warn!("{} of {} wires are unrouted.", open, db.num_wires());
    }

    if msgs.is_empty() {
        log::info!(
            "\x1b[32mSUCCESS\x1b[0m: {} routed wires are valid",
            db.num_wires() - open
        );
        Ok(())
    } else {
        log::error!("\x1b[31mFAILURE\x1b[0m: {} invalid routes", msgs.len());
        Err(msgs.join("; "))
    }
}

/// `Ok(false)` for an unrouted wire, `Ok(true)` for a valid route.
fn check_wire(db: &CircuitDB, wire: WireId) -> Result<bool, String> {
    let data = &db.wires[wire.index()];
    let route = &data.route;
    if route.is_empty() {
        return Ok(false);
    }

    let (start, end) = db.wire_terminals(wire);
    let first = route[0];
    let last = route[route.len() - 1];
    if first != start.coord || last != end.coord {
        return Err(format!(
            "Wire '{}' runs {} -> {} but its pins are at {} and {}",
            data.name, first, last, start.coord, end.coord
        ));
    }

    if let Some(w) = route.windows(2).find(|w| !w[0].is_adjacent(w[1])) {
        return Err(format!(
            "Wire '{}' jumps from {} to {}",
            data.name, w[0], w[1]
        ));
    }

    let mut seen: HashSet<GridCoord> = HashSet::with_capacity(route.len());
    for (i, &c) in route.iter().enumerate() {
        if !db.in_bounds(c) {
            return Err(format!("Wire '{}' leaves the canvas at {}", data.name, c));
        }
        if !seen.insert(c) {
            return Err(format!("Wire '{}' loops through {}", data.name, c));
        }
        let is_end = i == 0 || i == route.len() - 1;
        if !is_end && let Some(owner) = db.owner_at(c) {
            return Err(format!(
                "Wire '{}' crosses '{}' at {}",
                data.name,
                db.components[owner.index()].name,
                c
            ));
        }
    }
    Ok(true)
}
