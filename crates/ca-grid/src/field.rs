//! Dense per-cell arrays.
//!
//! Storage is column-major in the lattice sense: index `i * ny + j`, so
//! `field[(i, j)]` mirrors the `x[i][j]` layout of the coordinate arrays.

use std::ops::{Index, IndexMut};

use crate::Cell;

/// A value per lattice cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Field<T> {
    nx: usize,
    ny: usize,
    data: Vec<T>,
}

/// Distances, desirabilities, counts.
pub type ScalarField = Field<f64>;
/// Membership of a cell in some category.
pub type CellMask = Field<bool>;

impl<T: Clone> Field<T> {
    pub fn filled(nx: usize, ny: usize, value: T) -> Self {
        Self { nx, ny, data: vec![value; nx * ny] }
    }

    /// Build from a per-cell function, visiting cells in `(i, j)` order.
    pub fn from_fn<F: FnMut(Cell) -> T>(nx: usize, ny: usize, mut f: F) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                data.push(f(Cell::new(i, j)));
            }
        }
        Self { nx, ny, data }
    }

    /// Elementwise transform into a new field of the same shape.
    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Field<U> {
        Field { nx: self.nx, ny: self.ny, data: self.data.iter().map(f).collect() }
    }

    /// Elementwise combination of two same-shaped fields.
    pub fn zip_map<U: Clone, V, F: FnMut(&T, &U) -> V>(&self, other: &Field<U>, mut f: F) -> Field<V> {
        debug_assert_eq!(self.dims(), other.dims());
        Field {
            nx: self.nx,
            ny: self.ny,
            data: self.data.iter().zip(&other.data).map(|(a, b)| f(a, b)).collect(),
        }
    }
}

impl<T> Field<T> {
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
    fn offset(&self, c: Cell) -> usize {
        debug_assert!(c.i < self.nx && c.j < self.ny, "cell {c} out of {}×{}", self.nx, self.ny);
        c.i * self.ny + c.j
    }

    #[inline]
    pub fn get(&self, c: Cell) -> Option<&T> {
        (c.i < self.nx && c.j < self.ny).then(|| &self.data[c.i * self.ny + c.j])
    }

    /// Flat storage in `(i, j)` order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// `(cell, &value)` pairs in `(i, j)` order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &T)> + '_ {
        let ny = self.ny;
        self.data
            .iter()
            .enumerate()
            .map(move |(k, v)| (Cell::new(k / ny, k % ny), v))
    }
}

impl<T> Index<Cell> for Field<T> {
    type Output = T;
    #[inline]
    fn index(&self, c: Cell) -> &T {
        &self.data[self.offset(c)]
    }
}

impl<T> IndexMut<Cell> for Field<T> {
    #[inline]
    fn index_mut(&mut self, c: Cell) -> &mut T {
        let k = self.offset(c);
        &mut self.data[k]
    }
}

impl<T> Index<(usize, usize)> for Field<T> {
    type Output = T;
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self[Cell::new(i, j)]
    }
}

impl<T> IndexMut<(usize, usize)> for Field<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self[Cell::new(i, j)]
    }
}

impl CellMask {
    pub fn count(&self) -> usize {
        self.data.iter().filter(|b| **b).count()
    }

    /// Cells set in the mask, in `(i, j)` order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.iter().filter(|(_, b)| **b).map(|(c, _)| c)
    }

    pub fn or(&self, other: &CellMask) -> CellMask {
        self.zip_map(other, |a, b| *a || *b)
    }
}

impl ScalarField {
    /// Largest finite value, if any.
    pub fn max_finite(&self) -> Option<f64> {
        self.data.iter().copied().filter(|v| v.is_finite()).reduce(f64::max)
    }
}
