//! Simple polygons and the clipping primitives the Voronoi and intersection
//! queries are built from.

use ca_core::{BBox, Point, Segment};

/// Areas below this (mm²) are treated as degenerate.
pub const AREA_EPS: f64 = 1e-6;

/// A simple polygon given by its vertices.  The closing edge from the last
/// vertex back to the first is implicit.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle, counter-clockwise.
    pub fn rect(min: Point, max: Point) -> Self {
        Self::new(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area, positive for counter-clockwise orientation.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        twice * 0.5
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// `true` when the polygon has fewer than three vertices or no area.
    pub fn is_degenerate(&self) -> bool {
        self.area() < AREA_EPS
    }

    /// The same polygon with counter-clockwise vertex order.
    pub fn into_ccw(mut self) -> Self {
        if self.signed_area() < 0.0 {
            self.vertices.reverse();
        }
        self
    }

    /// Edges in vertex order, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn bbox(&self) -> BBox {
        BBox::from_points(self.vertices.iter().copied())
    }

    /// Even-odd point containment.  Points exactly on an edge may fall
    /// either way.
    pub fn contains(&self, p: Point) -> bool {
        let v = &self.vertices;
        let n = v.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (v[i], v[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Distance from `p` to the polygon outline.
    pub fn boundary_distance(&self, p: Point) -> f64 {
        self.edges().map(|e| e.distance_to(p)).fold(f64::INFINITY, f64::min)
    }

    /// Keep the part of the polygon to the left of the directed line `a → b`
    /// (Sutherland–Hodgman, one clip edge).
    pub fn clip_half_plane(&self, a: Point, b: Point) -> Polygon {
        let n = self.vertices.len();
        let mut out = Vec::with_capacity(n + 2);
        if n == 0 {
            return Polygon::new(out);
        }
        let side = |p: Point| a.cross(b, p);
        let mut prev = self.vertices[n - 1];
        let mut prev_side = side(prev);
        for &cur in &self.vertices {
            let cur_side = side(cur);
            let cur_in = cur_side >= 0.0;
            let prev_in = prev_side >= 0.0;
            if cur_in != prev_in {
                let t = prev_side / (prev_side - cur_side);
                out.push(Point::new(prev.x + t * (cur.x - prev.x), prev.y + t * (cur.y - prev.y)));
            }
            if cur_in {
                out.push(cur);
            }
            prev = cur;
            prev_side = cur_side;
        }
        Polygon::new(out)
    }

    /// Intersect with a convex, counter-clockwise `clip` polygon.  Exact for
    /// convex subjects; the result is then convex as well.
    pub fn clip_convex(&self, clip: &Polygon) -> Polygon {
        let mut out = self.clone();
        for edge in clip.edges() {
            if out.is_empty() {
                break;
            }
            out = out.clip_half_plane(edge.a, edge.b);
        }
        out
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(vertices: Vec<Point>) -> Self {
        Polygon::new(vertices)
    }
}
