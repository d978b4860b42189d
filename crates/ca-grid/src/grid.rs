//! Lattice construction and cell classification.
//!
//! # Categories
//!
//! | Mask          | Rule (`r = cell_size / 2`)                                 |
//! |---------------|------------------------------------------------------------|
//! | `entrance`    | centre within `r` of an entrance segment                   |
//! | `inside`      | floor contains the centre, or entrance cell                |
//! | `outside`     | not inside                                                 |
//! | `wall`        | centre within `r` of an outer or obstacle edge, minus entrances |
//! | `traversable` | inside and not wall: the cells a pedestrian may occupy     |
//! | `exit[id]`    | centre within `r` of the exit segment                      |
//! | `attraction[id]` | centre inside the region or within `r` of its outline   |
//!
//! Exit cells usually sit on the boundary, so they are wall cells and not
//! traversable; pedestrians reach an exit by standing next to it.

use std::collections::BTreeMap;

use ca_core::{AttractionId, BBox, EntranceId, ExitId, Neighbor, NeighborMap, Point};
use ca_geometry::{AttractionKind, Geometry};

use crate::{Cell, CellMask, GridError, GridResult, ScalarField};

/// Immutable classified lattice.  Construct with [`Grid::build`].
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cell_size: f64,
    nx: usize,
    ny: usize,

    /// `x[i][j]`, `y[i][j]`: cell centre coordinates.
    x: ScalarField,
    y: ScalarField,

    inside: CellMask,
    outside: CellMask,
    wall: CellMask,
    entrance: CellMask,
    traversable: CellMask,

    entrance_cells: BTreeMap<EntranceId, Vec<Cell>>,
    exits: BTreeMap<ExitId, CellMask>,
    attractions: BTreeMap<AttractionId, (AttractionKind, CellMask)>,
}

impl Grid {
    /// Lay a lattice of `cell_size` (mm) over `geometry` and classify every
    /// cell.
    pub fn build(geometry: &Geometry, cell_size: f64) -> GridResult<Grid> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        let bbox = geometry.bounding_box();
        if bbox.is_degenerate() {
            return Err(GridError::DegenerateGeometry);
        }

        let nx = axis_len(bbox.width(), cell_size);
        let ny = axis_len(bbox.height(), cell_size);
        let x0 = bbox.min_x - cell_size;
        let y0 = bbox.min_y - cell_size;
        let x = ScalarField::from_fn(nx, ny, |c| x0 + c.i as f64 * cell_size);
        let y = ScalarField::from_fn(nx, ny, |c| y0 + c.j as f64 * cell_size);
        let centre = |c: Cell| Point::new(x[c], y[c]);
        let r = 0.5 * cell_size;

        let mut entrance_cells: BTreeMap<EntranceId, Vec<Cell>> = BTreeMap::new();
        let entrance = CellMask::from_fn(nx, ny, |c| {
            let p = centre(c);
            let mut hit = false;
            for (&id, e) in geometry.entrances() {
                if e.segment.distance_to(p) < r {
                    entrance_cells.entry(id).or_default().push(c);
                    hit = true;
                }
            }
            hit
        });
        for &id in geometry.entrances().keys() {
            entrance_cells.entry(id).or_default();
        }

        let inside = CellMask::from_fn(nx, ny, |c| entrance[c] || geometry.contains(centre(c)));
        let outside = inside.map(|b| !b);
        let wall = CellMask::from_fn(nx, ny, |c| !entrance[c] && geometry.near_wall(centre(c), r));
        let traversable = inside.zip_map(&wall, |i, w| *i && !*w);

        let mut exits = BTreeMap::new();
        for (&id, seg) in geometry.exits() {
            let mask = CellMask::from_fn(nx, ny, |c| seg.distance_to(centre(c)) < r);
            if mask.count() == 0 {
                return Err(GridError::ExitOffGrid(id));
            }
            exits.insert(id, mask);
        }

        let attractions = geometry
            .attractions()
            .iter()
            .map(|(&id, a)| {
                let mask = CellMask::from_fn(nx, ny, |c| {
                    let p = centre(c);
                    a.polygon.contains(p) || a.polygon.boundary_distance(p) < r
                });
                (id, (a.kind, mask))
            })
            .collect();

        let n_traversable = traversable.count();
        if n_traversable == 0 {
            return Err(GridError::NoTraversableCells(cell_size));
        }
        log::info!(
            "grid {nx}×{ny} @ {cell_size} mm: {} inside, {} wall, {} traversable, {} entrance cells",
            inside.count(),
            wall.count(),
            n_traversable,
            entrance.count(),
        );

        Ok(Grid {
            cell_size,
            nx,
            ny,
            x,
            y,
            inside,
            outside,
            wall,
            entrance,
            traversable,
            entrance_cells,
            exits,
            attractions,
        })
    }

    // ── Dimensions & coordinates ──────────────────────────────────────────

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Centre of cell `(i, j)`, or `(+∞, +∞)` for indices off the lattice.
    pub fn coordinates(&self, i: isize, j: isize) -> Point {
        if i < 0 || j < 0 || i as usize >= self.nx || j as usize >= self.ny {
            return Point::INFINITY;
        }
        self.centre(Cell::new(i as usize, j as usize))
    }

    /// Centre of an in-range cell.
    #[inline]
    pub fn centre(&self, c: Cell) -> Point {
        Point::new(self.x[c], self.y[c])
    }

    /// The cell whose centre is nearest to `p`, if it is on the lattice.
    pub fn indices(&self, p: Point) -> Option<Cell> {
        let fi = ((p.x - self.x[(0, 0)]) / self.cell_size).round();
        let fj = ((p.y - self.y[(0, 0)]) / self.cell_size).round();
        if !(fi >= 0.0 && fj >= 0.0) || fi >= self.nx as f64 || fj >= self.ny as f64 {
            return None;
        }
        Some(Cell::new(fi as usize, fj as usize))
    }

    /// `x[i][j]` coordinate array.
    pub fn x(&self) -> &ScalarField {
        &self.x
    }

    /// `y[i][j]` coordinate array.
    pub fn y(&self) -> &ScalarField {
        &self.y
    }

    #[inline]
    pub fn in_bounds(&self, c: Cell) -> bool {
        c.i < self.nx && c.j < self.ny
    }

    /// Cells whose centre may lie inside `bbox`, clamped to the lattice.
    pub fn cells_within(&self, bbox: BBox) -> impl Iterator<Item = Cell> + '_ {
        let x0 = self.x[(0, 0)];
        let y0 = self.y[(0, 0)];
        let cs = self.cell_size;
        let range = |lo: f64, hi: f64, origin: f64, n: usize| -> (usize, usize) {
            if !(lo <= hi) || n == 0 {
                return (1, 0);
            }
            let a = ((lo - origin) / cs).floor().max(0.0);
            let b = ((hi - origin) / cs).ceil().min((n - 1) as f64);
            if a > b { (1, 0) } else { (a as usize, b as usize) }
        };
        let (i0, i1) = range(bbox.min_x, bbox.max_x, x0, self.nx);
        let (j0, j1) = range(bbox.min_y, bbox.max_y, y0, self.ny);
        (i0..=i1).flat_map(move |i| (j0..=j1).map(move |j| Cell::new(i, j)))
    }

    /// All cells in `(i, j)` order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let ny = self.ny;
        (0..self.nx * ny).map(move |k| Cell::new(k / ny, k % ny))
    }

    // ── Masks ─────────────────────────────────────────────────────────────

    pub fn inside(&self) -> &CellMask {
        &self.inside
    }

    pub fn outside(&self) -> &CellMask {
        &self.outside
    }

    pub fn wall(&self) -> &CellMask {
        &self.wall
    }

    pub fn entrance(&self) -> &CellMask {
        &self.entrance
    }

    pub fn traversable(&self) -> &CellMask {
        &self.traversable
    }

    #[inline]
    pub fn is_traversable(&self, c: Cell) -> bool {
        self.traversable.get(c).copied().unwrap_or(false)
    }

    /// Cells of one entrance, in `(i, j)` order.
    pub fn entrance_cells(&self, id: EntranceId) -> &[Cell] {
        self.entrance_cells.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn exit_cells(&self, id: ExitId) -> Option<&CellMask> {
        self.exits.get(&id)
    }

    pub fn exits(&self) -> &BTreeMap<ExitId, CellMask> {
        &self.exits
    }

    pub fn attraction_cells(&self, id: AttractionId) -> Option<&CellMask> {
        self.attractions.get(&id).map(|(_, m)| m)
    }

    /// Union of all attraction masks of one kind.
    pub fn attraction_mask(&self, kind: AttractionKind) -> CellMask {
        self.attractions
            .values()
            .filter(|(k, _)| *k == kind)
            .fold(CellMask::filled(self.nx, self.ny, false), |acc, (_, m)| acc.or(m))
    }

    /// `true` if `c` is on, or shares an edge with, a cell of exit `id`.
    pub fn touches_exit(&self, c: Cell, id: ExitId) -> bool {
        let Some(mask) = self.exits.get(&id) else {
            return false;
        };
        Neighbor::ALL
            .into_iter()
            .filter_map(|n| c.step(n))
            .any(|n| mask.get(n).copied().unwrap_or(false))
    }

    // ── Neighborhood ──────────────────────────────────────────────────────

    /// The traversable cells among `c` and its four orthogonal neighbors.
    ///
    /// Keys whose cell is off the lattice or not traversable are absent.
    pub fn neighbors(&self, c: Cell) -> NeighborMap<Cell> {
        Neighbor::ALL
            .into_iter()
            .filter_map(|n| c.step(n).filter(|t| self.is_traversable(*t)).map(|t| (n, t)))
            .collect()
    }
}

/// Number of cells along an axis spanning `extent`, with one margin cell on
/// each side: centres from `min − cs` up to the first centre `≥ max + cs`.
fn axis_len(extent: f64, cs: f64) -> usize {
    ((extent / cs - 1e-9).ceil() as usize) + 3
}
