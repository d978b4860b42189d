//! The region a neighbor cell "owns" and the observer can see.
//!
//! The visible region is star-shaped around its observer, and Voronoi cells
//! are convex.  Fanning the visible region into triangles at the observer
//! and clipping every triangle against the convex cell yields exact convex
//! pieces without general polygon boolean operations.

use ca_core::{BBox, Point};

use crate::polygon::Polygon;

/// Result of intersecting a visible region with a Voronoi cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Intersection {
    /// Nothing visible in the cell (or only a degenerate sliver).
    Empty,
    Single(Polygon),
    /// Disjoint or adjacent convex pieces.
    Multi(Vec<Polygon>),
}

impl Intersection {
    /// Intersect `visible`, star-shaped around `observer`, with the convex
    /// counter-clockwise `cell`.
    pub fn star_with_convex(observer: Point, visible: &Polygon, cell: &Polygon) -> Intersection {
        let n = visible.len();
        if n < 3 || cell.is_degenerate() {
            return Intersection::Empty;
        }
        let cell_box = cell.bbox();
        let mut pieces = Vec::new();
        for i in 0..n {
            let a = visible.vertices[i];
            let b = visible.vertices[(i + 1) % n];
            let tri = Polygon::new(vec![observer, a, b]).into_ccw();
            if !overlaps(tri.bbox(), cell_box) {
                continue;
            }
            let piece = tri.clip_convex(cell);
            if !piece.is_degenerate() {
                pieces.push(piece);
            }
        }
        Intersection::from_pieces(pieces)
    }

    pub fn from_pieces(mut pieces: Vec<Polygon>) -> Intersection {
        match pieces.len() {
            0 => Intersection::Empty,
            1 => Intersection::Single(pieces.remove(0)),
            _ => Intersection::Multi(pieces),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Intersection::Empty)
    }

    pub fn pieces(&self) -> &[Polygon] {
        match self {
            Intersection::Empty => &[],
            Intersection::Single(p) => std::slice::from_ref(p),
            Intersection::Multi(ps) => ps,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.pieces().iter().any(|piece| piece.contains(p))
    }

    pub fn area(&self) -> f64 {
        self.pieces().iter().map(Polygon::area).sum()
    }

    pub fn bbox(&self) -> BBox {
        self.pieces().iter().fold(BBox::EMPTY, |b, p| b.union(p.bbox()))
    }
}

fn overlaps(a: BBox, b: BBox) -> bool {
    a.min_x <= b.max_x && b.min_x <= a.max_x && a.min_y <= b.max_y && b.min_y <= a.max_y
}
