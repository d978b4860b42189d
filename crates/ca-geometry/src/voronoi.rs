//! Voronoi cells of a handful of seeds by half-plane clipping.
//!
//! The seed sets here are tiny (a pedestrian's cell plus at most four
//! neighbors), so each cell is computed directly: start from a large square
//! and cut away everything closer to another seed.  Four far-away dummy
//! seeds bound the diagram the same way a classic "points at infinity"
//! construction does.

use ca_core::Point;

use crate::polygon::Polygon;

/// Distance (mm) of the four dummy seeds from the seed centroid.
pub const FAR_SEED: f64 = 1.0e6;

/// One convex, counter-clockwise cell per seed, in seed order.
///
/// Duplicate seeds produce empty cells for every copy; callers treat those
/// as "no area".
pub fn voronoi_cells(seeds: &[Point]) -> Vec<Polygon> {
    if seeds.is_empty() {
        return Vec::new();
    }
    let n = seeds.len() as f64;
    let c = Point::new(
        seeds.iter().map(|p| p.x).sum::<f64>() / n,
        seeds.iter().map(|p| p.y).sum::<f64>() / n,
    );
    let dummies = [
        Point::new(c.x - FAR_SEED, c.y),
        Point::new(c.x + FAR_SEED, c.y),
        Point::new(c.x, c.y - FAR_SEED),
        Point::new(c.x, c.y + FAR_SEED),
    ];
    let frame = Polygon::rect(
        Point::new(c.x - 2.0 * FAR_SEED, c.y - 2.0 * FAR_SEED),
        Point::new(c.x + 2.0 * FAR_SEED, c.y + 2.0 * FAR_SEED),
    );

    seeds
        .iter()
        .enumerate()
        .map(|(k, &s)| {
            let mut cell = frame.clone();
            let others = seeds
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != k)
                .map(|(_, &o)| o)
                .chain(dummies);
            for o in others {
                if cell.is_empty() {
                    break;
                }
                cell = closer_half(&cell, s, o);
            }
            cell
        })
        .collect()
}

/// Keep the part of `cell` that is at least as close to `s` as to `o`.
fn closer_half(cell: &Polygon, s: Point, o: Point) -> Polygon {
    if s == o {
        return Polygon::default();
    }
    let m = s.midpoint(o);
    let (dx, dy) = (o.x - s.x, o.y - s.y);
    // Left of m → m + rot90(o - s) is the side facing `s`.
    cell.clip_half_plane(m, Point::new(m.x - dy, m.y + dx))
}
