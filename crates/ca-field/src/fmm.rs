//! First-order fast marching on the cell lattice.
//!
//! Solves `|∇u| = 1 / speed` with `u = 0` on the start cells.  Cells are
//! finalised in increasing `u` order from a binary heap; stale heap entries
//! (a cell pushed again with a smaller value) are skipped on pop, the same
//! lazy-deletion scheme a Dijkstra over a road graph uses.
//!
//! Non-passable cells act as barriers and keep `u = +∞`, as does anything
//! not connected to a start cell.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use ca_grid::{Cell, CellMask, ScalarField};

/// Heap key: a finite, non-negative distance with a total order.
#[derive(Copy, Clone, PartialEq)]
struct Dist(f64);

impl Eq for Dist {}

impl PartialOrd for Dist {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dist {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Geodesic distance (in the unit of `h`) from the `start` cells through
/// `passable` cells.
///
/// - `start` cells are sources even when not passable themselves (exits sit
///   on the boundary).
/// - `speed`, if given, scales propagation per cell; values `<= 0` block.
/// - `h` is the cell edge length.
pub fn fast_marching(
    start:    &CellMask,
    passable: &CellMask,
    speed:    Option<&ScalarField>,
    h:        f64,
) -> ScalarField {
    let (nx, ny) = start.dims();
    let mut dist   = ScalarField::filled(nx, ny, f64::INFINITY);
    let mut frozen = CellMask::filled(nx, ny, false);

    // Min-heap via Reverse; Cell as secondary key makes tie-breaking
    // deterministic.
    let mut heap: BinaryHeap<Reverse<(Dist, Cell)>> = BinaryHeap::new();
    for c in start.cells() {
        dist[c] = 0.0;
        heap.push(Reverse((Dist(0.0), c)));
    }

    let open = |c: Cell| -> bool { c.i < nx && c.j < ny && (passable[c] || start[c]) };

    while let Some(Reverse((Dist(d), c))) = heap.pop() {
        if frozen[c] || d > dist[c] {
            continue;
        }
        frozen[c] = true;

        for n in lattice_neighbors(c) {
            if !open(n) || frozen[n] {
                continue;
            }
            let f = speed.map_or(1.0, |s| s[n]);
            if f.is_nan() || f <= 0.0 {
                continue;
            }
            let u = solve(&dist, &frozen, n, h / f);
            if u < dist[n] {
                dist[n] = u;
                heap.push(Reverse((Dist(u), n)));
            }
        }
    }
    dist
}

/// The four orthogonal lattice neighbors that exist (lower bound only).
fn lattice_neighbors(c: Cell) -> impl Iterator<Item = Cell> {
    [
        c.i.checked_sub(1).map(|i| Cell::new(i, c.j)),
        Some(Cell::new(c.i + 1, c.j)),
        c.j.checked_sub(1).map(|j| Cell::new(c.i, j)),
        Some(Cell::new(c.i, c.j + 1)),
    ]
    .into_iter()
    .flatten()
}

/// Upwind eikonal update of cell `c` from its frozen neighbors.
fn solve(dist: &ScalarField, frozen: &CellMask, c: Cell, step: f64) -> f64 {
    let known = |i: Option<usize>, j: Option<usize>| -> f64 {
        match (i, j) {
            (Some(i), Some(j)) => {
                let n = Cell::new(i, j);
                if frozen.get(n).copied().unwrap_or(false) { dist[n] } else { f64::INFINITY }
            }
            _ => f64::INFINITY,
        }
    };
    let a = known(c.i.checked_sub(1), Some(c.j)).min(known(Some(c.i + 1), Some(c.j)));
    let b = known(Some(c.i), c.j.checked_sub(1)).min(known(Some(c.i), Some(c.j + 1)));

    if !a.is_finite() || !b.is_finite() || (a - b).abs() >= step {
        return a.min(b) + step;
    }
    let diff = a - b;
    (a + b + (2.0 * step * step - diff * diff).sqrt()) * 0.5
}
