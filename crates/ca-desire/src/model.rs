//! The neighbor desirability model.

use ca_core::{Aggregation, Neighbor, NeighborMap, Point, ScenarioParams};
use ca_geometry::{Geometry, Intersection, voronoi_cells};
use ca_grid::{Cell, Grid, ScalarField};

use crate::prior::persistence_weights;

/// Read-only view of everything the model needs.  Cheap to copy; shared by
/// reference across worker threads.
#[derive(Copy, Clone)]
pub struct DesireModel<'a> {
    pub grid:     &'a Grid,
    pub geometry: &'a Geometry,
    pub params:   &'a ScenarioParams,
}

impl<'a> DesireModel<'a> {
    pub fn new(grid: &'a Grid, geometry: &'a Geometry, params: &'a ScenarioParams) -> Self {
        Self { grid, geometry, params }
    }

    /// Probability of each reachable key for a pedestrian on `cell` whose
    /// last move was `last`, deciding on `field` (static × individual).
    ///
    /// The keys are exactly those of [`Grid::neighbors`]; the values sum to 1.
    pub fn probabilities(&self, cell: Cell, last: Neighbor, field: &ScalarField) -> NeighborMap<f64> {
        let mut weights = self.raw_weights(cell, field);
        if self.params.direction_persistence {
            let prior = persistence_weights(last, &weights);
            for (k, w) in weights.iter_mut() {
                *w *= prior.get(k).copied().unwrap_or(0.0);
            }
        }
        normalize(weights)
    }

    /// Unnormalised weights before the persistence prior.
    ///
    /// Every visible traversable cell is credited to the candidate(s) whose
    /// centre is nearest to it; cells equidistant from two candidates count
    /// for both.  A candidate whose Voronoi region has no visible part gets 0.
    pub fn raw_weights(&self, cell: Cell, field: &ScalarField) -> NeighborMap<f64> {
        let neighbors = self.grid.neighbors(cell);
        let mut raw = NeighborMap::new();
        if neighbors.is_empty() {
            return raw;
        }

        let origin = self.grid.centre(cell);
        let visible = self.geometry.visible_region(origin);
        let seeds: Vec<(Neighbor, Point)> = neighbors.iter().map(|(k, c)| (k, self.grid.centre(*c))).collect();
        let points: Vec<Point> = seeds.iter().map(|(_, p)| *p).collect();
        let regions = voronoi_cells(&points);

        let mut acc: NeighborMap<Reduce> = NeighborMap::new();
        for ((key, _), region) in seeds.iter().zip(&regions) {
            if *key != Neighbor::Stay && !Intersection::star_with_convex(origin, &visible, region).is_empty() {
                acc.insert(*key, Reduce::default());
            }
        }

        if !acc.is_empty() {
            let tie = TIE_TOLERANCE * self.grid.cell_size() * self.grid.cell_size();
            for c in self.grid.cells_within(visible.bbox()) {
                if !self.grid.is_traversable(c) {
                    continue;
                }
                let p = self.grid.centre(c);
                if !(visible.contains(p) || visible.boundary_distance(p) < ON_EDGE) {
                    continue;
                }
                let nearest = seeds.iter().map(|(_, s)| s.distance_sq(p)).fold(f64::INFINITY, f64::min);
                let v = field[c] * self.params.distance.dec(origin.distance(p));
                for (key, s) in &seeds {
                    if s.distance_sq(p) <= nearest + tie {
                        if let Some(r) = acc.get_mut(*key) {
                            r.add(v);
                        }
                    }
                }
            }
        }

        for (key, _) in &seeds {
            let w = match key {
                Neighbor::Stay => field[cell],
                _ => acc.get(*key).map_or(0.0, |r| r.value(self.params.aggregation)),
            };
            raw.insert(*key, w);
        }
        raw
    }
}

/// Relative squared-distance slack (in cell areas) under which two
/// candidates count as equally near.
const TIE_TOLERANCE: f64 = 1e-9;

/// Points this close (mm) to the visible region's outline count as visible.
const ON_EDGE: f64 = 1e-6;

/// Running max / mean of the values credited to one candidate.
#[derive(Copy, Clone, Default)]
struct Reduce {
    max: f64,
    sum: f64,
    n:   usize,
}

impl Reduce {
    fn add(&mut self, v: f64) {
        self.max = self.max.max(v);
        self.sum += v;
        self.n += 1;
    }

    fn value(&self, aggregation: Aggregation) -> f64 {
        match aggregation {
            Aggregation::Max => self.max,
            Aggregation::Mean if self.n > 0 => self.sum / self.n as f64,
            Aggregation::Mean => 0.0,
        }
    }
}

/// Scale `weights` to sum to 1.
///
/// Negative and non-finite entries count as 0.  If nothing positive is
/// left, every present key gets the same probability.
pub fn normalize(mut weights: NeighborMap<f64>) -> NeighborMap<f64> {
    if weights.is_empty() {
        return weights;
    }
    for (_, w) in weights.iter_mut() {
        if !(w.is_finite() && *w > 0.0) {
            *w = 0.0;
        }
    }
    let total: f64 = weights.iter().map(|(_, w)| *w).sum();
    if !(total.is_finite() && total > 0.0) {
        log::warn!("all neighbor weights are zero; falling back to uniform over {} keys", weights.len());
        let u = 1.0 / weights.len() as f64;
        for (_, w) in weights.iter_mut() {
            *w = u;
        }
        return weights;
    }
    for (_, w) in weights.iter_mut() {
        *w /= total;
    }
    weights
}
