use crate::db::core::CircuitDB;
use crate::geom::coord::GridCoord;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

/// One colour-coded set of routes, e.g. everything one algorithm produced.
pub struct RouteLayer<'a> {
    pub label: &'a str,
    pub color: Rgba<u8>,
    pub paths: Vec<&'a [GridCoord]>,
}

/// Colour used for the `i`-th layer of a comparison picture.
pub fn layer_color(i: usize) -> Rgba<u8> {
    const COLORS: [Rgba<u8>; 4] = [
        // A*: Blue
        Rgba([0, 110, 255, 220]),
        // Dijkstra: Red
        Rgba([255, 20, 80, 220]),
        // IDA*: Green
        Rgba([0, 220, 100, 220]),
        Rgba([255, 215, 0, 220]),
    ];
    COLORS[i % COLORS.len()]
}

pub fn draw_routes(
    db: &CircuitDB,
    layers: &[RouteLayer<'_>],
    filename: &Path,
    scale: u32,
) -> image::ImageResult<()> {
    let scale = scale.max(2);
    let w = db.width * scale;
    let h = db.height * scale;
    let mut img = RgbaImage::from_pixel(w, h, Rgba([20, 20, 24, 255]));

    let grid_color = Rgba([40, 40, 46, 255]);
    for x in 0..=db.width {
        let px = (x * scale).min(w - 1) as f32;
        draw_line_segment_mut(&mut img, (px, 0.0), (px, (h - 1) as f32), grid_color);
    }
    for y in 0..=db.height {
        let py = (y * scale).min(h - 1) as f32;
        draw_line_segment_mut(&mut img, (0.0, py), ((w - 1) as f32, py), grid_color);
    }

    let cell_color = Rgba([90, 70, 60, 255]);
    for comp in &db.components {
        let r = comp.footprint;
        let rect = ImageRect::at((r.min.x * scale) as i32, (r.min.y * scale) as i32)
            .of_size(r.width() * scale, r.height() * scale);
        draw_filled_rect_mut(&mut img, rect, cell_color);
    }

    // Layers are nudged apart so that overlapping routes stay visible.
    let center = |c: GridCoord, nudge: f32| {
        (
            (c.x * scale) as f32 + scale as f32 / 2.0 + nudge,
            (c.y * scale) as f32 + scale as f32 / 2.0 + nudge,
        )
    };
    let spread = (scale as f32 / 6.0).max(1.0);
    for (i, layer) in layers.iter().enumerate() {
        let nudge = (i as f32 - (layers.len() as f32 - 1.0) / 2.0) * spread;
        for path in &layer.paths {
            for seg in path.windows(2) {
                let a = center(seg[0], nudge);
                let b = center(seg[1], nudge);
                draw_line_segment_mut(&mut img, a, b, layer.color);
                draw_line_segment_mut(&mut img, (a.0 + 1.0, a.1), (b.0 + 1.0, b.1), layer.color);
                draw_line_segment_mut(&mut img, (a.0, a.1 + 1.0), (b.0, b.1 + 1.0), layer.color);
            }
        }
        log::debug!("Drew {} paths for {}", layer.paths.len(), layer.label);
    }

    let pin_color = Rgba([255, 255, 255, 255]);
    let pin_size = (scale / 3).max(2);
    for pin in &db.pins {
        let (px, py) = center(pin.coord, 0.0);
        let rect = ImageRect::at(px as i32 - (pin_size / 2) as i32, py as i32 - (pin_size / 2) as i32)
            .of_size(pin_size, pin_size);
        draw_filled_rect_mut(&mut img, rect, pin_color);
    }

    img.save(filename)
}
