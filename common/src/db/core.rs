use crate::db::indices::*;
use crate::geom::coord::GridCoord;
use crate::geom::rect::Rect;
use crate::geom::rtree::SpatialIndex;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("canvas must be at least 1x1, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("duplicate name '{0}'")]
    DuplicateName(String),
    #[error("component '{0}' has an empty footprint")]
    EmptyFootprint(String),
    #[error("'{name}' lies outside the {width}x{height} canvas")]
    OutOfBounds { name: String, width: u32, height: u32 },
    #[error("footprint of '{name}' overlaps '{other}'")]
    Overlap { name: String, other: String },
    #[error("pin '{0}' is inside its footprint instead of on the boundary")]
    PinInsideFootprint(String),
    #[error("pin '{pin}' sits on the footprint of '{other}'")]
    PinOnForeignFootprint { pin: String, other: String },
    #[error("unknown pin '{0}' (expected COMPONENT.PIN)")]
    UnknownPin(String),
}

#[derive(Clone, Debug)]
pub struct ComponentData {
    pub name: String,
    pub footprint: Rect,
    pub pins: Vec<PinId>,
}

#[derive(Clone, Debug)]
pub struct PinData {
    pub name: String,
    pub component: ComponentId,
    pub coord: GridCoord,
}

#[derive(Clone, Debug)]
pub struct WireData {
    pub name: String,
    pub from: PinId,
    pub to: PinId,
    /// Last computed route, start pin first. Empty while unrouted.
    pub route: Vec<GridCoord>,
}

/// A wire end as handed to the router: where it is and who owns the cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalPoint {
    pub component: ComponentId,
    pub pin: PinId,
    pub coord: GridCoord,
}

impl TerminalPoint {
    pub fn new(component: ComponentId, pin: PinId, coord: GridCoord) -> Self {
        Self {
            component,
            pin,
            coord,
        }
    }
}

pub struct CircuitDB {
    pub width: u32,
    pub height: u32,

    pub components: Vec<ComponentData>,
    pub pins: Vec<PinData>,
    pub wires: Vec<WireData>,

    pub component_name_map: HashMap<String, ComponentId>,
    pub pin_name_map: HashMap<String, PinId>,
    pub wire_name_map: HashMap<String, WireId>,

    footprints: SpatialIndex,
}

impl CircuitDB {
    pub fn new(width: u32, height: u32) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::EmptyCanvas { width, height });
        }
        Ok(Self {
            width,
            height,
            components: Vec::new(),
            pins: Vec::new(),
            wires: Vec::new(),
            component_name_map: HashMap::new(),
            pin_name_map: HashMap::new(),
            wire_name_map: HashMap::new(),
            footprints: SpatialIndex::new(),
        })
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }
    pub fn num_pins(&self) -> usize {
        self.pins.len()
    }
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin(0, 0, self.width, self.height)
    }

    pub fn in_bounds(&self, c: GridCoord) -> bool {
        c.x < self.width && c.y < self.height
    }

    /// Component whose footprint covers `c`.
    pub fn owner_at(&self, c: GridCoord) -> Option<ComponentId> {
        self.footprints.at(c).map(ComponentId::new)
    }

    pub fn pin_full_name(&self, pin: PinId) -> String {
        let data = &self.pins[pin.index()];
        format!(
            "{}.{}",
            self.components[data.component.index()].name,
            data.name
        )
    }

    pub fn add_component(&mut self, name: String, footprint: Rect) -> Result<ComponentId, LayoutError> {
        if self.component_name_map.contains_key(&name) {
            return Err(LayoutError::DuplicateName(name));
        }
        if footprint.is_empty() {
            return Err(LayoutError::EmptyFootprint(name));
        }
        self.check_footprint(&name, footprint, None)?;

        let id = ComponentId::new(self.components.len());
        self.footprints.insert(footprint, id.index());
        self.components.push(ComponentData {
            name: name.clone(),
            footprint,
            pins: Vec::new(),
        });
        self.component_name_map.insert(name, id);
        Ok(id)
    }

    /// Moves a component (and its pins) so that its footprint corner is at `origin`.
    pub fn move_component(&mut self, id: ComponentId, origin: GridCoord) -> Result<Rect, LayoutError> {
        let old = self.components[id.index()].footprint;
        let name = self.components[id.index()].name.clone();
        let new = old.moved_to(origin).ok_or_else(|| LayoutError::OutOfBounds {
            name: name.clone(),
            width: self.width,
            height: self.height,
        })?;
        self.check_footprint(&name, new, Some(id))?;

        let dx = origin.x as i64 - old.min.x as i64;
        let dy = origin.y as i64 - old.min.y as i64;
        let shift = |c: GridCoord| -> Option<GridCoord> {
            let x = u32::try_from(c.x as i64 + dx).ok()?;
            let y = u32::try_from(c.y as i64 + dy).ok()?;
            Some(GridCoord::new(x, y))
        };

        let mut moved_pins = Vec::with_capacity(self.components[id.index()].pins.len());
        for &pin in &self.components[id.index()].pins {
            let pin_name = self.pin_full_name(pin);
            let Some(moved) = shift(self.pins[pin.index()].coord).filter(|&c| self.in_bounds(c))
            else {
                return Err(LayoutError::OutOfBounds {
                    name: pin_name,
                    width: self.width,
                    height: self.height,
                });
            };
            moved_pins.push((pin, moved));
            if let Some(other) = self.owner_at(moved).filter(|&o| o != id) {
                return Err(LayoutError::PinOnForeignFootprint {
                    pin: pin_name,
                    other: self.components[other.index()].name.clone(),
                });
            }
        }

        self.footprints.remove(old, id.index());
        self.footprints.insert(new, id.index());
        self.components[id.index()].footprint = new;
        for (pin, coord) in moved_pins {
            self.pins[pin.index()].coord = coord;
        }
        log::debug!("Moved '{}' from {} to {}", name, old.min, new.min);
        Ok(new)
    }

    fn check_footprint(&self, name: &str, footprint: Rect, moving: Option<ComponentId>) -> Result<(), LayoutError> {
        if footprint.max.x > self.width || footprint.max.y > self.height {
            return Err(LayoutError::OutOfBounds {
                name: name.to_string(),
                width: self.width,
                height: self.height,
            });
        }
        if let Some(other) = self
            .footprints
            .query(footprint)
            .into_iter()
            .find(|&o| Some(ComponentId::new(o)) != moving)
        {
            return Err(LayoutError::Overlap {
                name: name.to_string(),
                other: self.components[other].name.clone(),
            });
        }
        Ok(())
    }

    pub fn add_pin(&mut self, component: ComponentId, name: String, coord: GridCoord) -> Result<PinId, LayoutError> {
        let comp = &self.components[component.index()];
        let full_name = format!("{}.{}", comp.name, name);

        if self.pin_name_map.contains_key(&full_name) {
            return Err(LayoutError::DuplicateName(full_name));
        }
        if !self.in_bounds(coord) {
            return Err(LayoutError::OutOfBounds {
                name: full_name,
                width: self.width,
                height: self.height,
            });
        }
        if comp.footprint.contains(coord) && !comp.footprint.on_boundary(coord) {
            return Err(LayoutError::PinInsideFootprint(full_name));
        }
        if let Some(other) = self.owner_at(coord).filter(|&o| o != component) {
            return Err(LayoutError::PinOnForeignFootprint {
                pin: full_name,
                other: self.components[other.index()].name.clone(),
            });
        }

        let pid = PinId::new(self.pins.len());
        self.pins.push(PinData {
            name,
            component,
            coord,
        });
        self.components[component.index()].pins.push(pid);
        self.pin_name_map.insert(full_name, pid);
        Ok(pid)
    }

    /// Adds a wire between two pins named `COMPONENT.PIN`.
    pub fn add_wire(&mut self, name: String, from: &str, to: &str) -> Result<WireId, LayoutError> {
        if self.wire_name_map.contains_key(&name) {
            return Err(LayoutError::DuplicateName(name));
        }
        let from = self.find_pin(from)?;
        let to = self.find_pin(to)?;

        let id = WireId::new(self.wires.len());
        self.wires.push(WireData {
            name: name.clone(),
            from,
            to,
            route: Vec::new(),
        });
        self.wire_name_map.insert(name, id);
        Ok(id)
    }

    pub fn find_pin(&self, full_name: &str) -> Result<PinId, LayoutError> {
        self.pin_name_map
            .get(full_name)
            .copied()
            .ok_or_else(|| LayoutError::UnknownPin(full_name.to_string()))
    }

    #[inline]
    pub fn terminal(&self, pin: PinId) -> TerminalPoint {
        let data = &self.pins[pin.index()];
        TerminalPoint::new(data.component, pin, data.coord)
    }

    pub fn wire_terminals(&self, wire: WireId) -> (TerminalPoint, TerminalPoint) {
        let data = &self.wires[wire.index()];
        (self.terminal(data.from), self.terminal(data.to))
    }

    /// Wires with at least one end on `component`.
    pub fn wires_of(&self, component: ComponentId) -> Vec<WireId> {
        WireId::range(self.wires.len())
            .filter(|&w| {
                let (a, b) = self.wire_terminals(w);
                a.component == component || b.component == component
            })
            .collect()
    }

    pub fn set_route(&mut self, wire: WireId, route: Vec<GridCoord>) {
        self.wires[wire.index()].route = route;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_parts() -> CircuitDB {
        let mut db = CircuitDB::new(12, 8).unwrap();
        let r1 = db
            .add_component("R1".to_string(), Rect::from_origin(1, 1, 3, 2))
            .unwrap();
        let r2 = db
            .add_component("R2".to_string(), Rect::from_origin(7, 4, 3, 2))
            .unwrap();
        db.add_pin(r1, "1".to_string(), GridCoord::new(3, 1)).unwrap();
        db.add_pin(r2, "1".to_string(), GridCoord::new(7, 5)).unwrap();
        db.add_wire("N1".to_string(), "R1.1", "R2.1").unwrap();
        db
    }

    #[test]
    fn builds_terminals_from_pins() {
        let db = two_parts();
        let (a, b) = db.wire_terminals(WireId::new(0));
        assert_eq!(a.coord, GridCoord::new(3, 1));
        assert_eq!(a.component, ComponentId::new(0));
        assert_eq!(b.component, ComponentId::new(1));
        assert_eq!(db.owner_at(GridCoord::new(8, 5)), Some(ComponentId::new(1)));
        assert_eq!(db.owner_at(GridCoord::new(5, 5)), None);
    }

    #[test]
    fn rejects_overlap_and_misplaced_pins() {
        let mut db = two_parts();
        let err = db
            .add_component("C1".to_string(), Rect::from_origin(3, 2, 2, 2))
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Overlap {
                name: "C1".to_string(),
                other: "R1".to_string()
            }
        );

        let c1 = db
            .add_component("C1".to_string(), Rect::from_origin(1, 4, 3, 3))
            .unwrap();
        assert_eq!(
            db.add_pin(c1, "x".to_string(), GridCoord::new(2, 5)),
            Err(LayoutError::PinInsideFootprint("C1.x".to_string()))
        );
        assert!(matches!(
            db.add_pin(c1, "y".to_string(), GridCoord::new(8, 4)),
            Err(LayoutError::PinOnForeignFootprint { .. })
        ));
        assert_eq!(
            db.add_wire("N2".to_string(), "R1.1", "C1.9"),
            Err(LayoutError::UnknownPin("C1.9".to_string()))
        );
    }

    #[test]
    fn move_component_carries_pins() {
        let mut db = two_parts();
        let r1 = db.component_name_map["R1"];
        db.move_component(r1, GridCoord::new(1, 4)).unwrap();
        assert_eq!(db.pins[0].coord, GridCoord::new(3, 4));
        assert_eq!(db.owner_at(GridCoord::new(1, 1)), None);
        assert_eq!(db.owner_at(GridCoord::new(1, 4)), Some(r1));

        assert!(db.move_component(r1, GridCoord::new(6, 4)).is_err());
        assert_eq!(db.wires_of(r1), vec![WireId::new(0)]);
    }

    #[test]
    fn move_past_u32_range_is_out_of_bounds() {
        let mut db = two_parts();
        let r1 = db.component_name_map["R1"];
        assert!(matches!(
            db.move_component(r1, GridCoord::new(u32::MAX, 0)),
            Err(LayoutError::OutOfBounds { .. })
        ));
        assert_eq!(db.components[r1.index()].footprint, Rect::from_origin(1, 1, 3, 2));
        assert_eq!(db.pins[0].coord, GridCoord::new(3, 1));
    }
}
