//! Direction-persistence prior.
//!
//! Rows are the last movement direction, columns the candidate key, both in
//! [`Neighbor::ALL`] order (`stay, left, top, right, bottom`).  A pedestrian
//! that just moved prefers to keep going:
//!
//! | relative move | weight |
//! |---------------|--------|
//! | stay          | 0.25   |
//! | forward       | 0.50   |
//! | turn left     | 0.10   |
//! | turn right    | 0.10   |
//! | back          | 0.05   |
//!
//! A pedestrian that stood still weighs staying 0.4 and each direction 0.15.

use ca_core::{Neighbor, NeighborMap};

const STAY: f64 = 0.25;
const FORWARD: f64 = 0.50;
const TURN: f64 = 0.10;
const BACK: f64 = 0.05;

/// `PERSISTENCE[last.index()][candidate.index()]`
pub const PERSISTENCE: [[f64; 5]; 5] = [
    // from stay
    [0.40, 0.15, 0.15, 0.15, 0.15],
    // from left:   stay, left=fwd, top=turn, right=back, bottom=turn
    [STAY, FORWARD, TURN, BACK, TURN],
    // from top:    stay, left=turn, top=fwd, right=turn, bottom=back
    [STAY, TURN, FORWARD, TURN, BACK],
    // from right:  stay, left=back, top=turn, right=fwd, bottom=turn
    [STAY, BACK, TURN, FORWARD, TURN],
    // from bottom: stay, left=turn, top=back, right=turn, bottom=fwd
    [STAY, TURN, BACK, TURN, FORWARD],
];

/// The prior row for `last`, restricted to the keys of `present` and
/// normalised to sum to 1 over them.
pub fn persistence_weights<T>(last: Neighbor, present: &NeighborMap<T>) -> NeighborMap<f64> {
    let row = &PERSISTENCE[last.index()];
    let total: f64 = present.keys().map(|k| row[k.index()]).sum();
    present
        .keys()
        .map(|k| (k, if total > 0.0 { row[k.index()] / total } else { 0.0 }))
        .collect()
}
