//! Unit tests for ca-grid.
//!
//! The reference room is 5 m × 5 m at the default 500 mm cell size, so cell
//! centres fall exactly on the walls: column/row 1 and 11 are wall cells and
//! the 9 × 9 block `2..=10` is traversable, plus the entrance cells.

#[cfg(test)]
mod helpers {
    use ca_core::{Point, Segment, DEFAULT_CELL_SIZE};
    use ca_geometry::{Geometry, GeometryBuilder};
    use crate::Grid;

    pub fn room() -> Geometry {
        let mut b = GeometryBuilder::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5_000.0, 0.0),
            Point::new(5_000.0, 5_000.0),
            Point::new(0.0, 5_000.0),
        ]);
        b.add_entrance(Segment::new(Point::new(0.0, 2_000.0), Point::new(0.0, 3_000.0)), 1.0, 1);
        b.add_exit(Segment::new(Point::new(5_000.0, 2_000.0), Point::new(5_000.0, 3_000.0)));
        b.build().unwrap()
    }

    pub fn grid() -> Grid {
        Grid::build(&room(), DEFAULT_CELL_SIZE).unwrap()
    }
}

#[cfg(test)]
mod cell {
    use ca_core::Neighbor;
    use crate::Cell;

    #[test]
    fn step_and_direction() {
        let c = Cell::new(3, 3);
        assert_eq!(c.step(Neighbor::Left), Some(Cell::new(2, 3)));
        assert_eq!(c.step(Neighbor::Top), Some(Cell::new(3, 4)));
        assert_eq!(Cell::new(0, 0).step(Neighbor::Bottom), None);
        assert_eq!(c.direction_to(Cell::new(4, 3)), Some(Neighbor::Right));
        assert_eq!(c.direction_to(c), Some(Neighbor::Stay));
        assert_eq!(c.direction_to(Cell::new(4, 4)), None);
    }

    #[test]
    fn adjacency() {
        assert!(Cell::new(2, 2).is_adjacent(Cell::new(2, 3)));
        assert!(!Cell::new(2, 2).is_adjacent(Cell::new(3, 3)));
        assert!(!Cell::new(2, 2).is_adjacent(Cell::new(2, 2)));
    }
}

#[cfg(test)]
mod build {
    use ca_core::{EntranceId, ExitId, Point, Segment};
    use ca_geometry::GeometryBuilder;
    use super::helpers::{grid, room};
    use crate::{Cell, Grid, GridError};

    #[test]
    fn dimensions_include_margin() {
        let g = grid();
        assert_eq!(g.dims(), (13, 13));
        assert_eq!(g.coordinates(0, 0), Point::new(-500.0, -500.0));
        assert_eq!(g.coordinates(12, 1), Point::new(5_500.0, 0.0));
    }

    #[test]
    fn out_of_range_coordinates_are_infinite() {
        let g = grid();
        assert_eq!(g.coordinates(-1, 0), Point::INFINITY);
        assert_eq!(g.coordinates(0, 13), Point::INFINITY);
    }

    #[test]
    fn indices_invert_coordinates() {
        let g = grid();
        for c in g.cells() {
            assert_eq!(g.indices(g.centre(c)), Some(c));
        }
        assert_eq!(g.indices(Point::new(260.0, 740.0)), Some(Cell::new(2, 2)));
        assert_eq!(g.indices(Point::new(-2_000.0, 0.0)), None);
    }

    #[test]
    fn cells_within_box() {
        let g = grid();
        let b = ca_core::BBox { min_x: 900.0, min_y: 900.0, max_x: 1_600.0, max_y: 1_100.0 };
        let inside: Vec<Cell> = g.cells_within(b).filter(|c| b.contains(g.centre(*c))).collect();
        assert_eq!(inside, vec![Cell::new(3, 3), Cell::new(4, 3)]);
        let off = ca_core::BBox { min_x: 1.0e6, min_y: 0.0, max_x: 2.0e6, max_y: 1.0 };
        assert_eq!(g.cells_within(off).filter(|c| off.contains(g.centre(*c))).count(), 0);
        assert_eq!(g.cells_within(ca_core::BBox::EMPTY).count(), 0);
    }

    #[test]
    fn classification() {
        let g = grid();
        // 9 × 9 interior plus the three entrance cells on the left wall.
        assert_eq!(g.traversable().count(), 84);
        assert!(g.is_traversable(Cell::new(2, 2)));
        assert!(g.wall()[(1, 3)]);
        assert!(g.wall()[(11, 3)]);
        assert!(!g.is_traversable(Cell::new(11, 5)));
        assert!(g.outside()[(0, 0)]);
        assert!(!g.inside()[(0, 0)]);
    }

    #[test]
    fn entrances_are_forced_traversable() {
        let g = grid();
        let cells = g.entrance_cells(EntranceId(0));
        assert_eq!(cells, &[Cell::new(1, 5), Cell::new(1, 6), Cell::new(1, 7)]);
        for c in cells {
            assert!(g.inside()[*c]);
            assert!(!g.wall()[*c]);
            assert!(g.is_traversable(*c));
        }
    }

    #[test]
    fn exit_cells_on_boundary() {
        let g = grid();
        let exit: Vec<Cell> = g.exit_cells(ExitId(0)).unwrap().cells().collect();
        assert_eq!(exit, vec![Cell::new(11, 5), Cell::new(11, 6), Cell::new(11, 7)]);
        assert!(g.touches_exit(Cell::new(10, 6), ExitId(0)));
        assert!(!g.touches_exit(Cell::new(10, 4), ExitId(0)));
        assert!(!g.touches_exit(Cell::new(9, 6), ExitId(0)));
    }

    #[test]
    fn same_input_same_grid() {
        let geo = room();
        let a = Grid::build(&geo, 500.0).unwrap();
        let b = Grid::build(&geo, 500.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.x(), b.x());
        assert_eq!(a.traversable(), b.traversable());
    }

    #[test]
    fn invalid_cell_size() {
        assert!(matches!(Grid::build(&room(), 0.0), Err(GridError::InvalidCellSize(_))));
        assert!(matches!(Grid::build(&room(), f64::NAN), Err(GridError::InvalidCellSize(_))));
    }

    #[test]
    fn exit_far_away_is_rejected() {
        let mut b = GeometryBuilder::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5_000.0, 0.0),
            Point::new(5_000.0, 5_000.0),
            Point::new(0.0, 5_000.0),
        ]);
        b.add_exit(Segment::new(Point::new(90_000.0, 0.0), Point::new(90_000.0, 500.0)));
        let geo = b.build().unwrap();
        assert!(matches!(Grid::build(&geo, 500.0), Err(GridError::ExitOffGrid(ExitId(0)))));
    }
}

#[cfg(test)]
mod neighbors {
    use ca_core::Neighbor;
    use super::helpers::grid;
    use crate::Cell;

    #[test]
    fn interior_cell_has_all_five() {
        let g = grid();
        assert_eq!(g.neighbors(Cell::new(5, 5)).len(), 5);
    }

    #[test]
    fn corner_omits_walls() {
        let g = grid();
        let n = g.neighbors(Cell::new(2, 2));
        let keys: Vec<_> = n.keys().collect();
        assert_eq!(keys, vec![Neighbor::Stay, Neighbor::Top, Neighbor::Right]);
        assert_eq!(n.get(Neighbor::Top), Some(&Cell::new(2, 3)));
    }

    #[test]
    fn every_neighbor_is_traversable() {
        let g = grid();
        for c in g.traversable().cells() {
            for (_, t) in g.neighbors(c).iter() {
                assert!(g.is_traversable(*t));
            }
        }
    }
}

#[cfg(test)]
mod fields {
    use crate::{Cell, CellMask, ScalarField};

    #[test]
    fn layout_and_indexing() {
        let f = ScalarField::from_fn(3, 2, |c| (c.i * 10 + c.j) as f64);
        assert_eq!(f[(2, 1)], 21.0);
        assert_eq!(f.as_slice(), &[0.0, 1.0, 10.0, 11.0, 20.0, 21.0]);
        assert_eq!(f.get(Cell::new(3, 0)), None);
        assert_eq!(f.max_finite(), Some(21.0));
    }

    #[test]
    fn mask_helpers() {
        let a = CellMask::from_fn(2, 2, |c| c.i == 0);
        let b = CellMask::from_fn(2, 2, |c| c.j == 0);
        let u = a.or(&b);
        assert_eq!(u.count(), 3);
        assert_eq!(u.cells().collect::<Vec<_>>(), vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0)]);
    }
}
