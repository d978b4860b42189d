//! Unit tests for ca-core primitives.

#[cfg(test)]
mod ids {
    use std::collections::BTreeMap;

    use crate::{EntranceId, ExitId, PedId};

    #[test]
    fn index_is_the_raw_value() {
        assert_eq!(PedId(42).index(), 42);
        assert_eq!(ExitId(3).index(), 3);
    }

    #[test]
    fn display_uses_short_tags() {
        assert_eq!(PedId(7).to_string(), "p7");
        assert_eq!(ExitId(0).to_string(), "x0");
        assert_eq!(EntranceId(1).to_string(), "e1");
    }

    #[test]
    fn ordered_as_keys() {
        let m: BTreeMap<PedId, ()> = [PedId(9), PedId(2), PedId(5)].into_iter().map(|p| (p, ())).collect();
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), [PedId(2), PedId(5), PedId(9)]);
    }
}

#[cfg(test)]
mod geo {
    use crate::{BBox, Point, Segment};

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(1000.0, 0.0));
        assert_eq!(s.distance_to(Point::new(500.0, 300.0)), 300.0);
        assert_eq!(s.distance_to(Point::new(-400.0, 300.0)), 500.0);
    }

    #[test]
    fn cross_sign_is_ccw_positive() {
        let o = Point::new(0.0, 0.0);
        assert!(o.cross(Point::new(1.0, 0.0), Point::new(0.0, 1.0)) > 0.0);
        assert!(o.cross(Point::new(0.0, 1.0), Point::new(1.0, 0.0)) < 0.0);
    }

    #[test]
    fn bbox_from_points_and_degeneracy() {
        let b = BBox::from_points([Point::new(1.0, 2.0), Point::new(-1.0, 5.0)]);
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-1.0, 2.0, 1.0, 5.0));
        assert!(!b.is_degenerate());
        assert!(BBox::EMPTY.is_degenerate());
        assert!(BBox::from_points([Point::new(0.0, 0.0), Point::new(3.0, 0.0)]).is_degenerate());
    }

    #[test]
    fn infinity_sentinel() {
        assert!(!Point::INFINITY.is_finite());
        assert!(Point::new(1.0, 1.0).is_finite());
    }
}

#[cfg(test)]
mod neighbor {
    use crate::{Neighbor, NeighborMap};

    #[test]
    fn offsets_invert() {
        for n in Neighbor::ALL {
            let (di, dj) = n.offset();
            assert_eq!(Neighbor::from_offset(di, dj), Some(n));
        }
        assert_eq!(Neighbor::from_offset(1, 1), None);
        assert_eq!(Neighbor::from_offset(2, 0), None);
    }

    #[test]
    fn opposite_is_involution() {
        for n in Neighbor::ALL {
            assert_eq!(n.opposite().opposite(), n);
        }
        assert_eq!(Neighbor::Top.opposite(), Neighbor::Bottom);
    }

    #[test]
    fn map_iterates_in_table_order() {
        let mut m = NeighborMap::new();
        m.insert(Neighbor::Bottom, 4);
        m.insert(Neighbor::Stay, 0);
        m.insert(Neighbor::Right, 3);
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec![Neighbor::Stay, Neighbor::Right, Neighbor::Bottom]);
        assert_eq!(m.len(), 3);
        assert_eq!(m.remove(Neighbor::Right), Some(3));
        assert!(!m.contains_key(Neighbor::Right));
    }

    #[test]
    fn map_preserves_keys() {
        let m: NeighborMap<f64> = [(Neighbor::Left, 1.0), (Neighbor::Top, 2.0)].into_iter().collect();
        let doubled = m.map(|_, v| v * 2.0);
        assert_eq!(doubled.get(Neighbor::Top), Some(&4.0));
        assert_eq!(doubled.get(Neighbor::Stay), None);
    }
}

#[cfg(test)]
mod params {
    use crate::{Logistic, ScenarioParams};

    #[test]
    fn logistic_is_half_at_offset() {
        let l = Logistic::new(5.0, 0.5);
        assert!((l.inc(5_000.0) - 0.5).abs() < 1e-12);
        assert!((l.dec(5_000.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn logistic_monotone() {
        let l = Logistic::new(2.0, 1.0);
        let mut prev = l.inc(0.0);
        for d in (500..20_000).step_by(500) {
            let v = l.inc(d as f64);
            assert!(v > prev);
            prev = v;
        }
    }

    #[test]
    fn logistic_at_infinity() {
        let l = Logistic::new(5.0, 1.0);
        assert_eq!(l.inc(f64::INFINITY), 1.0);
        assert_eq!(l.dec(f64::INFINITY), 0.0);
    }

    #[test]
    fn defaults_validate() {
        ScenarioParams::default().validate().unwrap();
    }

    #[test]
    fn too_many_standing_rejected() {
        let p = ScenarioParams { init_pedestrians: 2, standing_pedestrians: 3, ..Default::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_weight_rejected() {
        let mut p = ScenarioParams::default();
        p.weights.exit = -1.0;
        assert!(p.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{PedId, PedRng, SimRng};

    fn draws(rng: &mut PedRng) -> Vec<usize> {
        let weights = [1.0, 2.0, 3.0, 4.0, 5.0];
        (0..64).filter_map(|_| rng.weighted_index(&weights)).collect()
    }

    #[test]
    fn deterministic_same_seed() {
        let mut a = PedRng::new(12345, PedId(0));
        let mut b = PedRng::new(12345, PedId(0));
        assert_eq!(draws(&mut a), draws(&mut b));
    }

    #[test]
    fn different_peds_differ() {
        let mut a = PedRng::new(12345, PedId(0));
        let mut b = PedRng::new(12345, PedId(1));
        assert_ne!(draws(&mut a), draws(&mut b));
    }

    #[test]
    fn shuffle_is_seeded() {
        let mut v1: Vec<u32> = (0..50).collect();
        let mut v2 = v1.clone();
        SimRng::new(3).shuffle(&mut v1);
        SimRng::new(3).shuffle(&mut v2);
        assert_eq!(v1, v2);
        assert_eq!(SimRng::new(3).choose::<u32>(&[]), None);
    }

    #[test]
    fn weighted_index_skips_zero_weights() {
        let mut rng = SimRng::new(7);
        for _ in 0..200 {
            assert_eq!(rng.weighted_index(&[0.0, 2.0, 0.0, f64::NAN]), Some(1));
        }
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
        assert_eq!(rng.weighted_index(&[]), None);
    }
}

#[cfg(test)]
mod time {
    use crate::Step;

    #[test]
    fn step_arithmetic() {
        assert_eq!(Step(10) + 5, Step(15));
        assert_eq!(Step(10).offset(3), Step(13));
        assert!(Step(6).is_multiple_of(3));
        assert!(!Step(6).is_multiple_of(0));
    }
}
