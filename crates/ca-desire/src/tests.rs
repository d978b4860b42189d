//! Unit tests for ca-desire.

#[cfg(test)]
mod helpers {
    use ca_core::{Point, ScenarioParams, Segment};
    use ca_geometry::{Geometry, GeometryBuilder};
    use ca_grid::{Grid, ScalarField};

    /// 5 m room, exit on the right wall, optional 1 m pillar at (2.5–3.5 m).
    pub fn room(pillar: bool) -> (Geometry, Grid) {
        let mut b = GeometryBuilder::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5_000.0, 0.0),
            Point::new(5_000.0, 5_000.0),
            Point::new(0.0, 5_000.0),
        ]);
        if pillar {
            b.add_hole(vec![
                Point::new(2_700.0, 2_200.0),
                Point::new(3_300.0, 2_200.0),
                Point::new(3_300.0, 2_800.0),
                Point::new(2_700.0, 2_800.0),
            ]);
        }
        b.add_exit(Segment::new(Point::new(5_000.0, 2_000.0), Point::new(5_000.0, 3_000.0)));
        let geo = b.build().unwrap();
        let grid = Grid::build(&geo, 500.0).unwrap();
        (geo, grid)
    }

    /// Grows linearly to the right on traversable cells, zero elsewhere.
    pub fn rightward(grid: &Grid) -> ScalarField {
        ScalarField::from_fn(grid.nx(), grid.ny(), |c| {
            if grid.is_traversable(c) { c.i as f64 / grid.nx() as f64 } else { 0.0 }
        })
    }

    pub fn no_persistence() -> ScenarioParams {
        ScenarioParams { direction_persistence: false, ..Default::default() }
    }
}

// ── Persistence prior ─────────────────────────────────────────────────────────

#[cfg(test)]
mod prior {
    use ca_core::{Neighbor, NeighborMap};
    use crate::{persistence_weights, PERSISTENCE};

    #[test]
    fn rows_sum_to_one() {
        for row in PERSISTENCE {
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn forward_is_favoured() {
        for n in [Neighbor::Left, Neighbor::Top, Neighbor::Right, Neighbor::Bottom] {
            let row = PERSISTENCE[n.index()];
            assert_eq!(row[n.index()], 0.5);
            assert_eq!(row[n.opposite().index()], 0.05);
        }
    }

    #[test]
    fn restricted_rows_renormalise() {
        let present: NeighborMap<()> = [(Neighbor::Stay, ()), (Neighbor::Right, ())].into_iter().collect();
        let w = persistence_weights(Neighbor::Right, &present);
        assert_eq!(w.len(), 2);
        assert!((w.get(Neighbor::Stay).unwrap() - 0.25 / 0.75).abs() < 1e-12);
        assert!((w.get(Neighbor::Right).unwrap() - 0.5 / 0.75).abs() < 1e-12);
    }
}

// ── Normalisation ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod normalize {
    use ca_core::{Neighbor, NeighborMap};
    use crate::normalize;

    #[test]
    fn scales_to_one() {
        let m: NeighborMap<f64> = [(Neighbor::Stay, 1.0), (Neighbor::Top, 3.0)].into_iter().collect();
        let p = normalize(m);
        assert_eq!(p.get(Neighbor::Stay), Some(&0.25));
        assert_eq!(p.get(Neighbor::Top), Some(&0.75));
    }

    #[test]
    fn all_zero_is_uniform() {
        let m: NeighborMap<f64> =
            [(Neighbor::Stay, 0.0), (Neighbor::Left, 0.0), (Neighbor::Bottom, 0.0)].into_iter().collect();
        let p = normalize(m);
        for (_, v) in p.iter() {
            assert!((v - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn nan_counts_as_zero() {
        let m: NeighborMap<f64> = [(Neighbor::Stay, f64::NAN), (Neighbor::Left, 2.0)].into_iter().collect();
        let p = normalize(m);
        assert_eq!(p.get(Neighbor::Stay), Some(&0.0));
        assert_eq!(p.get(Neighbor::Left), Some(&1.0));
    }

    #[test]
    fn empty_stays_empty() {
        assert!(normalize(NeighborMap::new()).is_empty());
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use ca_core::{Aggregation, Neighbor, ScenarioParams};
    use ca_grid::{Cell, ScalarField};
    use super::helpers::{no_persistence, room, rightward};
    use crate::DesireModel;

    #[test]
    fn sums_to_one_over_exactly_the_neighbor_keys() {
        let (geo, grid) = room(true);
        let field = rightward(&grid);
        let params = ScenarioParams::default();
        let model = DesireModel::new(&grid, &geo, &params);
        for c in grid.traversable().cells() {
            for last in [Neighbor::Stay, Neighbor::Right] {
                let p = model.probabilities(c, last, &field);
                let expected: Vec<Neighbor> = grid.neighbors(c).keys().collect();
                assert_eq!(p.keys().collect::<Vec<_>>(), expected, "at {c}");
                let total: f64 = p.iter().map(|(_, v)| *v).sum();
                assert!((total - 1.0).abs() < 1e-9, "at {c}: {total}");
                assert!(p.iter().all(|(_, v)| (0.0..=1.0).contains(v)));
            }
        }
    }

    #[test]
    fn follows_the_field_gradient() {
        let (geo, grid) = room(false);
        let field = rightward(&grid);
        let params = no_persistence();
        let model = DesireModel::new(&grid, &geo, &params);
        let p = model.probabilities(Cell::new(5, 6), Neighbor::Stay, &field);
        let right = p.get(Neighbor::Right).copied().unwrap();
        let left = p.get(Neighbor::Left).copied().unwrap();
        assert!(right > left, "right {right} left {left}");
    }

    #[test]
    fn self_weight_is_own_cell_value() {
        let (geo, grid) = room(false);
        let field = rightward(&grid);
        let params = no_persistence();
        let model = DesireModel::new(&grid, &geo, &params);
        let c = Cell::new(4, 4);
        let raw = model.raw_weights(c, &field);
        assert_eq!(raw.get(Neighbor::Stay), Some(&field[c]));
    }

    #[test]
    fn zero_field_falls_back_to_uniform() {
        let (geo, grid) = room(false);
        let field = ScalarField::filled(grid.nx(), grid.ny(), 0.0);
        let params = ScenarioParams::default();
        let model = DesireModel::new(&grid, &geo, &params);
        let p = model.probabilities(Cell::new(2, 2), Neighbor::Top, &field);
        assert_eq!(p.len(), 3);
        for (_, v) in p.iter() {
            assert!((v - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn max_dominates_mean() {
        let (geo, grid) = room(true);
        let field = rightward(&grid);
        let max_params = ScenarioParams { aggregation: Aggregation::Max, ..no_persistence() };
        let mean_params = ScenarioParams { aggregation: Aggregation::Mean, ..no_persistence() };
        let c = Cell::new(4, 5);
        let max = DesireModel::new(&grid, &geo, &max_params).raw_weights(c, &field);
        let mean = DesireModel::new(&grid, &geo, &mean_params).raw_weights(c, &field);
        for (k, m) in max.iter() {
            assert!(*m + 1e-12 >= *mean.get(k).unwrap(), "{k}");
        }
    }

    #[test]
    fn persistence_biases_towards_last_direction() {
        let (geo, grid) = room(false);
        let field = ScalarField::from_fn(grid.nx(), grid.ny(), |c| if grid.is_traversable(c) { 1.0 } else { 0.0 });
        let params = ScenarioParams::default();
        let model = DesireModel::new(&grid, &geo, &params);
        let p = model.probabilities(Cell::new(6, 6), Neighbor::Top, &field);
        let top = p.get(Neighbor::Top).copied().unwrap();
        let bottom = p.get(Neighbor::Bottom).copied().unwrap();
        assert!(top > 4.0 * bottom, "top {top} bottom {bottom}");
    }

    /// 0.01 on every traversable cell, `bright` on one.
    fn spot(grid: &ca_grid::Grid, at: Cell, bright: f64) -> ScalarField {
        let mut f = ScalarField::from_fn(grid.nx(), grid.ny(), |c| if grid.is_traversable(c) { 0.01 } else { 0.0 });
        f[at] = bright;
        f
    }

    #[test]
    fn diagonal_cell_is_shared_by_both_adjacent_moves() {
        let (geo, grid) = room(false);
        let params = no_persistence();
        let model = DesireModel::new(&grid, &geo, &params);
        let centre = Cell::new(6, 6);

        let mut shared = Vec::new();
        for (di, dj, a, b) in [
            (1, 1, Neighbor::Right, Neighbor::Top),
            (-1, 1, Neighbor::Left, Neighbor::Top),
            (1, -1, Neighbor::Right, Neighbor::Bottom),
            (-1, -1, Neighbor::Left, Neighbor::Bottom),
        ] {
            let at = Cell::new((6 + di) as usize, (6 + dj) as usize);
            let raw = model.raw_weights(centre, &spot(&grid, at, 1.0));
            let wa = raw.get(a).copied().unwrap();
            let wb = raw.get(b).copied().unwrap();
            assert!((wa - wb).abs() < 1e-12, "{at}: {a} {wa} vs {b} {wb}");
            assert!(wa > 0.5, "{at}: bright cell not credited ({wa})");
            for (k, w) in raw.iter() {
                if k != a && k != b && k != Neighbor::Stay {
                    assert!(*w < 0.011, "{at}: {k} got {w}");
                }
            }
            shared.push(wa);
        }
        assert!(shared.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-12), "{shared:?}");
    }

    #[test]
    fn bright_cell_behind_pillar_is_ignored() {
        let (geo, grid) = room(true);
        let params = no_persistence();
        let model = DesireModel::new(&grid, &geo, &params);
        // Pedestrian at (2.0 m, 2.5 m); the pillar spans 2.7–3.3 m × 2.2–2.8 m.
        let here = Cell::new(5, 6);

        let hidden = model.raw_weights(here, &spot(&grid, Cell::new(9, 6), 1.0));
        for (k, w) in hidden.iter() {
            assert!(*w <= 0.01 + 1e-12, "{k} sees through the pillar: {w}");
        }

        let seen = model.raw_weights(here, &spot(&grid, Cell::new(3, 6), 1.0));
        assert!(seen.get(Neighbor::Left).copied().unwrap() > 0.5);
    }
}
