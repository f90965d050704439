use crate::db::core::{CircuitDB, LayoutError};
use crate::geom::coord::GridCoord;
use crate::geom::rect::Rect;
use serde::{Deserialize, Serialize};

/// On-disk description of a canvas: footprints, pins and the wires to route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutFile {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
    #[serde(default)]
    pub wires: Vec<WireSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentSpec {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub pins: Vec<PinSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PinSpec {
    pub name: String,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WireSpec {
    pub name: String,
    pub from: String,
    pub to: String,
}

impl LayoutFile {
    pub fn build(&self) -> Result<CircuitDB, LayoutError> {
        let mut db = CircuitDB::new(self.width, self.height)?;

        for comp in &self.components {
            let footprint = Rect::checked_from_origin(comp.x, comp.y, comp.width, comp.height)
                .ok_or_else(|| LayoutError::OutOfBounds {
                    name: comp.name.clone(),
                    width: self.width,
                    height: self.height,
                })?;
            let id = db.add_component(comp.name.clone(), footprint)?;
            for pin in &comp.pins {
                db.add_pin(id, pin.name.clone(), GridCoord::new(pin.x, pin.y))?;
            }
        }

        for wire in &self.wires {
            db.add_wire(wire.name.clone(), &wire.from, &wire.to)?;
        }

        log::info!(
            "Layout {}x{}: {} components, {} pins, {} wires",
            db.width,
            db.height,
            db.num_components(),
            db.num_pins(),
            db.num_wires()
        );
        Ok(db)
    }
}
