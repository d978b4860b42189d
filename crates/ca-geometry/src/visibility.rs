//! Visibility polygon by angular sweep.
//!
//! Rays are cast from the observer towards every segment endpoint, plus a
//! tiny angle either side of it so that the ray can slip past a corner and
//! reach what lies behind.  The nearest hit of each ray becomes a vertex;
//! sorting the hits by angle yields a polygon that is star-shaped around the
//! observer.  `O(V · S)` for `V` endpoints and `S` segments, which is
//! plenty for room-sized floor plans.

use ca_core::{BBox, Point, Segment};

use crate::polygon::Polygon;

/// Angular offset of the two side rays, radians.
const SIDE_RAY: f64 = 1e-5;
/// Hits closer than this (mm) are ignored, so an observer standing on a
/// wall sees along it instead of being blocked at distance zero.
const MIN_HIT: f64 = 1e-6;
/// Consecutive polygon vertices closer than this (mm) are merged.
const MERGE_EPS: f64 = 1e-6;

/// Visibility polygon of `origin` among `segments`, enclosed by `frame`.
///
/// The frame's edges are added as extra blockers so that every ray hits
/// something even when the observer can see out of the floor plan.
pub fn visibility_polygon(origin: Point, segments: &[Segment], frame: BBox) -> Polygon {
    let corners = [
        Point::new(frame.min_x, frame.min_y),
        Point::new(frame.max_x, frame.min_y),
        Point::new(frame.max_x, frame.max_y),
        Point::new(frame.min_x, frame.max_y),
    ];
    let mut blockers: Vec<Segment> = segments.to_vec();
    blockers.extend((0..4).map(|i| Segment::new(corners[i], corners[(i + 1) % 4])));

    let mut hits: Vec<(f64, Point)> = Vec::with_capacity(blockers.len() * 6);
    for s in &blockers {
        for v in [s.a, s.b] {
            let dx = v.x - origin.x;
            let dy = v.y - origin.y;
            if dx == 0.0 && dy == 0.0 {
                continue;
            }
            let theta = dy.atan2(dx);
            for angle in [theta - SIDE_RAY, theta, theta + SIDE_RAY] {
                if let Some(hit) = cast(origin, angle, &blockers) {
                    hits.push((normalise(angle), hit));
                }
            }
        }
    }

    hits.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut vertices: Vec<Point> = Vec::with_capacity(hits.len());
    for (_, p) in hits {
        if vertices.last().is_none_or(|q| q.distance_sq(p) > MERGE_EPS * MERGE_EPS) {
            vertices.push(p);
        }
    }
    while vertices.len() > 1 {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        if first.distance_sq(last) > MERGE_EPS * MERGE_EPS {
            break;
        }
        vertices.pop();
    }
    Polygon::new(vertices)
}

/// Nearest intersection of the ray at `angle` from `origin` with `blockers`.
fn cast(origin: Point, angle: f64, blockers: &[Segment]) -> Option<Point> {
    let (dy, dx) = angle.sin_cos();
    let mut best = f64::INFINITY;
    for s in blockers {
        let ex = s.b.x - s.a.x;
        let ey = s.b.y - s.a.y;
        let denom = dx * ey - dy * ex;
        if denom.abs() < 1e-12 {
            continue;
        }
        let qx = s.a.x - origin.x;
        let qy = s.a.y - origin.y;
        let t = (qx * ey - qy * ex) / denom;
        let u = (qx * dy - qy * dx) / denom;
        if t > MIN_HIT && (-1e-9..=1.0 + 1e-9).contains(&u) && t < best {
            best = t;
        }
    }
    best.is_finite().then(|| Point::new(origin.x + best * dx, origin.y + best * dy))
}

/// Map an angle into `[0, 2π)`.
fn normalise(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}
