//! Plain data row types written by output backends.

/// One pedestrian's position at the end of a committed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRow {
    pub step:    u64,
    pub ped_id:  u32,
    /// Cell centre, millimetres.
    pub x:       f64,
    pub y:       f64,
    pub exit_id: u32,
}

/// Summary statistics for one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    pub step:        u64,
    pub pedestrians: u64,
    pub moved:       u64,
    pub conflicts:   u64,
    pub injected:    u64,
    pub exited:      u64,
}

/// Accumulated visits of one cell over a run.  Only cells visited at least
/// once are emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceUsageRow {
    pub i:     u32,
    pub j:     u32,
    pub x:     f64,
    pub y:     f64,
    pub count: u64,
}
