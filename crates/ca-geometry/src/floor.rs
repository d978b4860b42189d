//! Floor plan representation and builder.
//!
//! # Shapes
//!
//! - an outer boundary polygon and obstacle holes (together: the walls),
//! - entrance segments with an injection flow rate and batch size,
//! - exit segments,
//! - attraction regions, either on the ground or mounted on a wall.
//!
//! All IDs are assigned sequentially by the builder in insertion order.
//!
//! # Spatial index
//!
//! Every boundary edge (outer ring and holes) is stored in an R-tree (via
//! `rstar`) so that grid classification can ask "is this cell centre within
//! half a cell of a wall" without scanning every edge.

use std::collections::BTreeMap;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ca_core::{AttractionId, BBox, EntranceId, ExitId, Point, Segment};

use crate::error::{GeometryError, GeometryResult};
use crate::polygon::{AREA_EPS, Polygon};
use crate::visibility::visibility_polygon;

// ── R-tree wall entry ─────────────────────────────────────────────────────────

/// Entry stored in the wall index: one boundary edge.
#[derive(Clone)]
struct WallEntry {
    segment: Segment,
}

impl RTreeObject for WallEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        let b = self.segment.bbox();
        AABB::from_corners([b.min_x, b.min_y], [b.max_x, b.max_y])
    }
}

impl PointDistance for WallEntry {
    /// Squared distance from the query point to the closest point of the edge.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.segment.distance_sq_to(Point::new(point[0], point[1]))
    }
}

// ── Shapes ────────────────────────────────────────────────────────────────────

/// A door through which pedestrians are injected.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entrance {
    pub segment: Segment,
    /// Pedestrians per step.
    pub flow_rate: f64,
    /// Pedestrians injected together.
    pub batch_size: usize,
}

impl Entrance {
    pub fn new(segment: Segment, flow_rate: f64, batch_size: usize) -> Self {
        Self { segment, flow_rate, batch_size }
    }

    /// Steps between two injections: `ceil(batch_size / flow_rate)`, at least 1.
    pub fn injection_interval(&self) -> u64 {
        ((self.batch_size as f64 / self.flow_rate).ceil() as u64).max(1)
    }
}

/// Whether an attraction is walked onto or looked at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttractionKind {
    /// On the floor (e.g. a sunny spot, a bench area).
    Ground,
    /// Mounted on a wall (e.g. a timetable display).
    Mounted,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attraction {
    pub polygon: Polygon,
    pub kind: AttractionKind,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Immutable floor plan.  Construct with [`GeometryBuilder`].
#[derive(Clone)]
pub struct Geometry {
    outer: Polygon,
    holes: Vec<Polygon>,
    entrances: BTreeMap<EntranceId, Entrance>,
    exits: BTreeMap<ExitId, Segment>,
    attractions: BTreeMap<AttractionId, Attraction>,
    /// Every edge of the outer ring and of every hole.
    boundary: Vec<Segment>,
    walls: RTree<WallEntry>,
    bbox: BBox,
}

impl Geometry {
    /// `true` if `p` lies on the floor: inside the outer boundary and outside
    /// every obstacle.
    pub fn contains(&self, p: Point) -> bool {
        self.outer.contains(p) && !self.holes.iter().any(|h| h.contains(p))
    }

    /// Bounding box of the outer boundary.
    pub fn bounding_box(&self) -> BBox {
        self.bbox
    }

    /// Points with an unobstructed line of sight from `p`.
    ///
    /// The result is star-shaped around `p`.  For observers outside the
    /// floor it extends to a frame around the floor plan.
    pub fn visible_region(&self, p: Point) -> Polygon {
        let margin = self.bbox.width().max(self.bbox.height());
        visibility_polygon(p, &self.boundary, self.bbox.expand(margin))
    }

    /// `true` if some wall edge is within `radius` of `p`.
    pub fn near_wall(&self, p: Point, radius: f64) -> bool {
        self.walls
            .locate_within_distance([p.x, p.y], radius * radius)
            .next()
            .is_some()
    }

    /// Distance from `p` to the nearest wall edge.
    pub fn wall_distance(&self, p: Point) -> f64 {
        self.walls
            .nearest_neighbor(&[p.x, p.y])
            .map_or(f64::INFINITY, |w| w.segment.distance_to(p))
    }

    pub fn outer(&self) -> &Polygon {
        &self.outer
    }

    pub fn holes(&self) -> &[Polygon] {
        &self.holes
    }

    pub fn boundary_segments(&self) -> &[Segment] {
        &self.boundary
    }

    pub fn entrances(&self) -> &BTreeMap<EntranceId, Entrance> {
        &self.entrances
    }

    pub fn exits(&self) -> &BTreeMap<ExitId, Segment> {
        &self.exits
    }

    pub fn attractions(&self) -> &BTreeMap<AttractionId, Attraction> {
        &self.attractions
    }

    pub fn exit_count(&self) -> usize {
        self.exits.len()
    }
}

// ── GeometryBuilder ───────────────────────────────────────────────────────────

/// Collect the shapes of a floor plan, then call [`build`](Self::build) to
/// validate them.
///
/// # Example
///
/// ```
/// use ca_core::{Point, Segment};
/// use ca_geometry::GeometryBuilder;
///
/// let mut b = GeometryBuilder::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(5_000.0, 0.0),
///     Point::new(5_000.0, 5_000.0),
///     Point::new(0.0, 5_000.0),
/// ]);
/// b.add_exit(Segment::new(Point::new(5_000.0, 2_000.0), Point::new(5_000.0, 3_000.0)));
/// let geo = b.build().unwrap();
/// assert!(geo.contains(Point::new(2_500.0, 2_500.0)));
/// ```
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryBuilder {
    pub outer: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub holes: Vec<Vec<Point>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub entrances: Vec<Entrance>,
    pub exits: Vec<Segment>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attractions: Vec<Attraction>,
}

impl GeometryBuilder {
    pub fn new(outer: Vec<Point>) -> Self {
        Self { outer, ..Default::default() }
    }

    /// Add an obstacle polygon.
    pub fn add_hole(&mut self, vertices: Vec<Point>) -> &mut Self {
        self.holes.push(vertices);
        self
    }

    pub fn add_entrance(&mut self, segment: Segment, flow_rate: f64, batch_size: usize) -> EntranceId {
        self.entrances.push(Entrance::new(segment, flow_rate, batch_size));
        EntranceId(self.entrances.len() as u32 - 1)
    }

    pub fn add_exit(&mut self, segment: Segment) -> ExitId {
        self.exits.push(segment);
        ExitId(self.exits.len() as u32 - 1)
    }

    pub fn add_attraction(&mut self, polygon: Polygon, kind: AttractionKind) -> AttractionId {
        self.attractions.push(Attraction { polygon, kind });
        AttractionId(self.attractions.len() as u32 - 1)
    }

    /// Validate and freeze the floor plan.
    pub fn build(self) -> GeometryResult<Geometry> {
        let outer = ring("floor boundary", self.outer)?;

        let mut holes = Vec::with_capacity(self.holes.len());
        for (i, h) in self.holes.into_iter().enumerate() {
            let hole = ring("obstacle", h)?;
            if !hole.vertices.iter().all(|v| outer.contains(*v) || outer.boundary_distance(*v) < 1e-9) {
                return Err(GeometryError::HoleOutsideFloor(i));
            }
            holes.push(hole);
        }

        if self.exits.is_empty() {
            return Err(GeometryError::NoExits);
        }
        for e in &self.exits {
            finite("exit", [e.a, e.b])?;
        }

        let mut entrances = BTreeMap::new();
        for (i, e) in self.entrances.into_iter().enumerate() {
            let id = EntranceId(i as u32);
            finite("entrance", [e.segment.a, e.segment.b])?;
            if !(e.flow_rate.is_finite() && e.flow_rate > 0.0) {
                return Err(GeometryError::InvalidEntrance {
                    id,
                    reason: format!("flow rate must be > 0, got {}", e.flow_rate),
                });
            }
            if e.batch_size == 0 {
                return Err(GeometryError::InvalidEntrance { id, reason: "batch size must be >= 1".into() });
            }
            entrances.insert(id, e);
        }

        let mut attractions = BTreeMap::new();
        for (i, a) in self.attractions.into_iter().enumerate() {
            let polygon = ring("attraction", a.polygon.vertices)?;
            attractions.insert(AttractionId(i as u32), Attraction { polygon, kind: a.kind });
        }

        let boundary: Vec<Segment> = outer
            .edges()
            .chain(holes.iter().flat_map(|h| h.edges()))
            .collect();
        let walls = RTree::bulk_load(boundary.iter().map(|&segment| WallEntry { segment }).collect());
        let bbox = outer.bbox();

        let exits = self.exits.into_iter().enumerate().map(|(i, s)| (ExitId(i as u32), s)).collect();

        Ok(Geometry { outer, holes, entrances, exits, attractions, boundary, walls, bbox })
    }
}

/// Validate a closed ring and normalise it to counter-clockwise order.
fn ring(what: &'static str, vertices: Vec<Point>) -> GeometryResult<Polygon> {
    if vertices.len() < 3 {
        return Err(GeometryError::TooFewVertices { what, got: vertices.len() });
    }
    finite(what, vertices.iter().copied())?;
    let poly = Polygon::new(vertices);
    if poly.area() < AREA_EPS {
        return Err(GeometryError::ZeroArea { what });
    }
    Ok(poly.into_ccw())
}

fn finite<I: IntoIterator<Item = Point>>(what: &'static str, points: I) -> GeometryResult<()> {
    if points.into_iter().all(Point::is_finite) {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { what })
    }
}
