//! Scenario loading tests for the waiting_room runner.

#[cfg(test)]
mod scenario_tests {
    use std::path::Path;

    use ca_sim::{NoopObserver, SimBuilder};

    use crate::scenario::Scenario;

    fn bundled() -> Scenario {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/platform_hall.json");
        Scenario::load(&path).unwrap()
    }

    #[test]
    fn bundled_scenario_parses() {
        let s = bundled();
        assert_eq!(s.geometry.holes.len(), 2);
        assert_eq!(s.geometry.exits.len(), 2);
        assert_eq!(s.params.init_pedestrians, 40);
        assert!(s.params.remove_at_exit);
        assert_eq!(s.config.snapshot_interval_steps, 2);
        // Omitted fields keep their defaults.
        assert_eq!(s.config.num_threads, 0);
        assert_eq!(s.params.exit, ca_core::ScenarioParams::default().exit);
    }

    #[test]
    fn builtin_round_trips_through_json() {
        let s = Scenario::builtin();
        let json = serde_json::to_string(&s).unwrap();
        let back: Scenario = serde_json::from_str(&json).unwrap();
        assert_eq!(back.params.init_pedestrians, s.params.init_pedestrians);
        assert_eq!(back.params.standing_pedestrians, s.params.standing_pedestrians);
        assert_eq!(back.params.aggregation, s.params.aggregation);
        assert_eq!(back.geometry.outer, s.geometry.outer);
        assert_eq!(back.geometry.attractions, s.geometry.attractions);
        assert_eq!(back.cell_size, s.cell_size);
    }

    #[test]
    fn scenarios_run() {
        for mut s in [Scenario::builtin(), bundled()] {
            s.config.total_steps = 20;
            let geometry = s.geometry.build().unwrap();
            let mut sim = SimBuilder::new(s.config, geometry, s.params)
                .cell_size(s.cell_size)
                .build()
                .unwrap();
            sim.run(&mut NoopObserver).unwrap();
            assert_eq!(sim.now.0, 20);
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Scenario::load(Path::new("no/such/scenario.json")).is_err());
    }
}
