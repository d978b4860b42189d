//! Lattice index pairs.

use std::fmt;

use ca_core::Neighbor;

/// Column `i` (grows to the right) and row `j` (grows to the top).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub i: usize,
    pub j: usize,
}

impl Cell {
    #[inline]
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    /// The cell one step in direction `n`.  `None` if that would leave the
    /// non-negative quadrant; upper bounds are the grid's business.
    #[inline]
    pub fn step(self, n: Neighbor) -> Option<Cell> {
        let (di, dj) = n.offset();
        Some(Cell::new(
            self.i.checked_add_signed(di)?,
            self.j.checked_add_signed(dj)?,
        ))
    }

    /// The direction leading from `self` to `to`, if they are equal or
    /// orthogonally adjacent.
    pub fn direction_to(self, to: Cell) -> Option<Neighbor> {
        let di = to.i as isize - self.i as isize;
        let dj = to.j as isize - self.j as isize;
        Neighbor::from_offset(di, dj)
    }

    /// `true` if the cells share an edge.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.i.abs_diff(other.i) + self.j.abs_diff(other.j) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.i, self.j)
    }
}
