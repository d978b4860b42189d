//! Integration tests for ca-output.

#[cfg(test)]
mod helpers {
    use ca_core::{Point, ScenarioParams, Segment, SimConfig};
    use ca_geometry::GeometryBuilder;
    use ca_sim::{Sim, SimBuilder};

    pub fn sim(total_steps: u64, snapshot_interval_steps: u64, peds: usize) -> Sim {
        let mut b = GeometryBuilder::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4_000.0, 0.0),
            Point::new(4_000.0, 3_000.0),
            Point::new(0.0, 3_000.0),
        ]);
        b.add_exit(Segment::new(Point::new(4_000.0, 1_000.0), Point::new(4_000.0, 2_000.0)));
        let config = SimConfig {
            total_steps,
            seed: 1,
            num_threads: 0,
            snapshot_interval_steps,
        };
        let params = ScenarioParams { init_pedestrians: peds, ..Default::default() };
        SimBuilder::new(config, b.build().unwrap(), params).build().unwrap()
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{SpaceUsageRow, StepSummaryRow, TrajectoryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn traj_row(ped_id: u32, step: u64) -> TrajectoryRow {
        TrajectoryRow { step, ped_id, x: 250.0 * ped_id as f64, y: 1_500.0, exit_id: 0 }
    }

    fn headers(dir: &TempDir, file: &str) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("trajectories.csv").exists());
        assert!(dir.path().join("step_summaries.csv").exists());
        assert!(dir.path().join("space_usage.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&dir, "trajectories.csv"), ["step", "id", "x", "y", "exit_id"]);
        assert_eq!(
            headers(&dir, "step_summaries.csv"),
            ["step", "pedestrians", "moved", "conflicts", "injected", "exited"]
        );
        assert_eq!(headers(&dir, "space_usage.csv"), ["i", "j", "x", "y", "count"]);
    }

    #[test]
    fn csv_trajectory_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_trajectories(&[traj_row(0, 5), traj_row(1, 5), traj_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "5"); // step
        assert_eq!(&rows[1][1], "1"); // id
        assert_eq!(&rows[2][2], "500"); // x
        assert_eq!(&rows[2][3], "1500"); // y
    }

    #[test]
    fn csv_summary_and_usage_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow {
            step:        3,
            pedestrians: 10,
            moved:       7,
            conflicts:   1,
            injected:    0,
            exited:      2,
        })
        .unwrap();
        w.write_space_usage(&[SpaceUsageRow { i: 2, j: 4, x: 500.0, y: 1_500.0, count: 9 }]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["3", "10", "7", "1", "0", "2"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("space_usage.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["2", "4", "500", "1500", "9"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_missing_directory_is_an_error() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("does/not/exist")).is_err());
    }
}

#[cfg(test)]
mod recorder_tests {
    use super::helpers::sim;
    use crate::TrajectoryRecorder;

    #[test]
    fn one_row_per_pedestrian_per_step() {
        let mut s = sim(8, 1, 5);
        let mut rec = TrajectoryRecorder::new();
        s.run(&mut rec).unwrap();

        assert_eq!(rec.rows().len(), 8 * 5);
        for (k, chunk) in rec.rows().chunks(5).enumerate() {
            assert!(chunk.iter().all(|r| r.step == k as u64));
            let ids: Vec<u32> = chunk.iter().map(|r| r.ped_id).collect();
            assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn rows_match_final_positions() {
        let mut s = sim(4, 1, 3);
        let mut rec = TrajectoryRecorder::new();
        s.run(&mut rec).unwrap();
        let last: Vec<_> = rec.rows().iter().filter(|r| r.step == 3).collect();
        for (row, ped) in last.iter().zip(s.peds.iter()) {
            let c = s.grid.centre(ped.cell);
            assert_eq!((row.x, row.y), (c.x, c.y));
            assert_eq!(row.exit_id, ped.exit.0);
        }
    }

    #[test]
    fn space_usage_counts_every_visit() {
        let mut s = sim(12, 1, 4);
        let mut rec = TrajectoryRecorder::new();
        s.run(&mut rec).unwrap();

        let usage = rec.space_usage().unwrap();
        assert_eq!(usage.steps(), 12);
        let total: u64 = usage.rows().iter().map(|r| r.count).sum();
        assert_eq!(total, 12 * 4);

        let share: f64 = usage.normalized().as_slice().iter().sum();
        assert!((share - 4.0).abs() < 1e-9, "normalised usage sums to the head count, got {share}");
        for row in usage.rows() {
            assert!(s.grid.is_traversable(ca_grid::Cell::new(row.i as usize, row.j as usize)));
        }
    }

    #[test]
    fn nothing_recorded_without_snapshots() {
        let mut s = sim(5, 0, 2);
        let mut rec = TrajectoryRecorder::new();
        s.run(&mut rec).unwrap();
        assert!(rec.rows().is_empty());
        assert!(rec.space_usage().is_none());
    }
}

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use super::helpers::sim;
    use crate::{CsvWriter, SimOutputObserver};

    #[test]
    fn integration_csv() {
        let mut s = sim(6, 2, 3);
        let dir = TempDir::new().unwrap();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        s.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // interval 2 → snapshots at steps 0, 2, 4 (3 steps × 3 pedestrians).
        let mut rdr = csv::Reader::from_path(dir.path().join("trajectories.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 9);

        let mut rdr = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 6);

        let mut rdr = csv::Reader::from_path(dir.path().join("space_usage.csv")).unwrap();
        let total: u64 = rdr
            .records()
            .map(|r| r.unwrap()[4].parse::<u64>().unwrap())
            .sum();
        assert_eq!(total, 9);
        assert_eq!(obs.space_usage().map(|u| u.steps()), Some(3));
    }
}
