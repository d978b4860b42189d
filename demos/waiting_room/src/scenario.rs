//! JSON scenario files and the built-in waiting room.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ca_core::{DEFAULT_CELL_SIZE, Point, ScenarioParams, SimConfig, Segment};
use ca_geometry::{AttractionKind, GeometryBuilder, Polygon};

/// Everything needed to build one simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub geometry: GeometryBuilder,
    #[serde(default)]
    pub params: ScenarioParams,
    #[serde(default)]
    pub config: SimConfig,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
}

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening scenario {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// A 10 m × 8 m hall with a pillar, one door on the west wall, two exits,
    /// a sunny floor patch and a wall-mounted timetable.
    pub fn builtin() -> Self {
        let p = Point::new;
        let mut geometry = GeometryBuilder::new(vec![
            p(0.0, 0.0),
            p(10_000.0, 0.0),
            p(10_000.0, 8_000.0),
            p(0.0, 8_000.0),
        ]);
        geometry.add_hole(vec![
            p(4_000.0, 3_500.0),
            p(5_000.0, 3_500.0),
            p(5_000.0, 4_500.0),
            p(4_000.0, 4_500.0),
        ]);
        geometry.add_entrance(Segment::new(p(0.0, 3_000.0), p(0.0, 4_500.0)), 0.5, 2);
        geometry.add_exit(Segment::new(p(10_000.0, 1_000.0), p(10_000.0, 2_500.0)));
        geometry.add_exit(Segment::new(p(6_000.0, 8_000.0), p(7_500.0, 8_000.0)));
        geometry.add_attraction(
            Polygon::rect(p(6_500.0, 2_000.0), p(8_500.0, 4_000.0)),
            AttractionKind::Ground,
        );
        geometry.add_attraction(Polygon::rect(p(2_000.0, 0.0), p(4_000.0, 500.0)), AttractionKind::Mounted);

        Self {
            geometry,
            params: ScenarioParams {
                init_pedestrians: 30,
                max_pedestrians: 60,
                standing_pedestrians: 3,
                remove_at_exit: true,
                ..Default::default()
            },
            config: SimConfig {
                total_steps: 500,
                seed: 42,
                ..Default::default()
            },
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}
