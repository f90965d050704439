use crate::db::layout::{ComponentSpec, LayoutFile, PinSpec, WireSpec};
use crate::geom::rect::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_PLACEMENT_ATTEMPTS: usize = 200;

/// Random benchmark canvas. Footprints keep a one-cell channel to each other
/// and to the canvas edge, each gets a west pin "A" and an east pin "Z".
pub fn generate_random_layout(
    width: u32,
    height: u32,
    num_components: usize,
    num_wires: usize,
    seed: Option<u64>,
) -> LayoutFile {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    log::info!(
        "Generating Benchmark: {} components, {} wires, Canvas: {}x{}",
        num_components,
        num_wires,
        width,
        height
    );

    let mut placed: Vec<Rect> = Vec::with_capacity(num_components);
    let mut components = Vec::with_capacity(num_components);

    for i in 0..num_components {
        let mut attempt = 0;
        let footprint = loop {
            attempt += 1;
            if attempt > MAX_PLACEMENT_ATTEMPTS {
                break None;
            }
            let w = rng.gen_range(2..=5u32);
            let h = rng.gen_range(2..=4u32);
            if width < w + 2 || height < h + 2 {
                break None;
            }
            let x = rng.gen_range(1..=width - w - 1);
            let y = rng.gen_range(1..=height - h - 1);
            let candidate = Rect::from_origin(x, y, w, h);
            if placed.iter().all(|r| !r.inflate(1).overlaps(&candidate)) {
                break Some(candidate);
            }
        };

        let Some(r) = footprint else {
            log::warn!(
                "Canvas is full after {} of {} components",
                i,
                num_components
            );
            break;
        };
        placed.push(r);

        let mid_y = r.min.y + r.height() / 2;
        components.push(ComponentSpec {
            name: format!("U{}", i),
            x: r.min.x,
            y: r.min.y,
            width: r.width(),
            height: r.height(),
            pins: vec![
                PinSpec {
                    name: "A".to_string(),
                    x: r.min.x,
                    y: mid_y,
                },
                PinSpec {
                    name: "Z".to_string(),
                    x: r.max.x - 1,
                    y: mid_y,
                },
            ],
        });
    }

    let mut wires = Vec::with_capacity(num_wires);
    if components.len() >= 2 {
        for i in 0..num_wires {
            let src = rng.gen_range(0..components.len());
            let mut dst = rng.gen_range(0..components.len() - 1);
            if dst >= src {
                dst += 1;
            }
            wires.push(WireSpec {
                name: format!("net{}", i),
                from: format!("{}.Z", components[src].name),
                to: format!("{}.A", components[dst].name),
            });
        }
    } else if num_wires > 0 {
        log::warn!("Need at least two components to generate wires");
    }

    LayoutFile {
        width,
        height,
        components,
        wires,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_layout_builds() {
        let layout = generate_random_layout(40, 30, 12, 20, Some(42));
        assert!(layout.components.len() >= 2);
        assert_eq!(layout.wires.len(), 20);
        let db = layout.build().unwrap();
        assert_eq!(db.num_wires(), 20);
        assert!(crate::util::check::run_layout_check(&db).is_ok());
    }

    #[test]
    fn same_seed_same_layout() {
        let a = generate_random_layout(30, 20, 6, 5, Some(7));
        let b = generate_random_layout(30, 20, 6, 5, Some(7));
        assert_eq!(a, b);
    }
}
