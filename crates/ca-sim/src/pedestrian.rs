//! Pedestrian records (`PedestrianStore`) and their RNGs (`PedestrianRngs`).
//!
//! # Why two structs?
//!
//! The intent phase needs `&mut` access to every pedestrian's RNG while the
//! grid, the floor fields and the current positions are shared read-only
//! (possibly across Rayon workers).  Keeping the RNGs out of the store lets
//! both borrows coexist without interior mutability.
//!
//! Both are keyed by [`PedId`] in `BTreeMap`s, so iteration is always in
//! ascending id order and the two key sets stay aligned as long as every
//! spawn and removal goes through [`Sim`](crate::Sim).

use std::collections::BTreeMap;

use ca_core::{ExitId, Neighbor, PedId, PedRng};
use ca_grid::Cell;

use crate::{SimError, SimResult};

#[cfg(feature = "fx-hash")]
type CellIndex = rustc_hash::FxHashMap<Cell, PedId>;
#[cfg(not(feature = "fx-hash"))]
type CellIndex = std::collections::HashMap<Cell, PedId>;

// ── Pedestrian ────────────────────────────────────────────────────────────────

/// One simulated pedestrian.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pedestrian {
    pub id:         PedId,
    pub cell:       Cell,
    /// Direction of the last committed step; `Stay` if it did not move.
    pub direction:  Neighbor,
    /// Never leaves its cell.
    pub standing:   bool,
    pub exit:       ExitId,
    /// Consecutive steps spent on the same cell.
    pub not_moving: u32,
}

// ── PedestrianRngs ────────────────────────────────────────────────────────────

/// Per-pedestrian deterministic RNGs, separated from [`PedestrianStore`].
#[derive(Default)]
pub struct PedestrianRngs {
    pub inner: BTreeMap<PedId, PedRng>,
}

impl PedestrianRngs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the RNG of a freshly spawned pedestrian.
    pub(crate) fn insert(&mut self, global_seed: u64, ped: PedId) {
        self.inner.insert(ped, PedRng::new(global_seed, ped));
    }

    pub(crate) fn remove(&mut self, ped: PedId) -> Option<PedRng> {
        self.inner.remove(&ped)
    }

    #[inline]
    pub fn get_mut(&mut self, ped: PedId) -> Option<&mut PedRng> {
        self.inner.get_mut(&ped)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Disjoint mutable references to the RNGs of `peds`, in the same order.
    ///
    /// `peds` must be strictly ascending.  Returns `None` if any id has no
    /// RNG.  A single merge walk over the map; no aliasing tricks needed.
    pub fn get_many_mut(&mut self, peds: &[PedId]) -> Option<Vec<&mut PedRng>> {
        let mut out = Vec::with_capacity(peds.len());
        let mut wanted = peds.iter().peekable();
        for (id, rng) in self.inner.iter_mut() {
            match wanted.peek() {
                None => break,
                Some(&&next) if next == *id => {
                    out.push(rng);
                    wanted.next();
                }
                Some(&&next) if next < *id => return None,
                Some(_) => {}
            }
        }
        (wanted.peek().is_none()).then_some(out)
    }
}

// ── PedestrianStore ───────────────────────────────────────────────────────────

/// Arena of pedestrian records keyed by stable id, plus a cell → pedestrian
/// occupancy index.
///
/// Ids are handed out in increasing order and never reused within a run.
#[derive(Clone, Debug, Default)]
pub struct PedestrianStore {
    peds:      BTreeMap<PedId, Pedestrian>,
    occupancy: CellIndex,
    next_id:   u32,
}

impl PedestrianStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.peds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.peds.is_empty()
    }

    #[inline]
    pub fn get(&self, id: PedId) -> Option<&Pedestrian> {
        self.peds.get(&id)
    }

    /// Pedestrians in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Pedestrian> + '_ {
        self.peds.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = PedId> + '_ {
        self.peds.keys().copied()
    }

    /// Occupied cells, in ascending pedestrian id order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.peds.values().map(|p| p.cell)
    }

    #[inline]
    pub fn occupant(&self, cell: Cell) -> Option<PedId> {
        self.occupancy.get(&cell).copied()
    }

    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        !self.occupancy.contains_key(&cell)
    }

    /// Place a new pedestrian on `cell`.
    pub(crate) fn spawn(&mut self, cell: Cell, exit: ExitId, standing: bool) -> SimResult<PedId> {
        if !self.is_free(cell) {
            return Err(SimError::CellOccupied(cell));
        }
        let id = PedId(self.next_id);
        self.next_id += 1;
        self.peds.insert(id, Pedestrian {
            id,
            cell,
            direction: Neighbor::Stay,
            standing,
            exit,
            not_moving: 0,
        });
        self.occupancy.insert(cell, id);
        Ok(id)
    }

    pub(crate) fn remove(&mut self, id: PedId) -> Option<Pedestrian> {
        let ped = self.peds.remove(&id)?;
        self.occupancy.remove(&ped.cell);
        Some(ped)
    }

    /// Move every pedestrian in `targets` to its target cell, update
    /// directions and not-moving counters, and rebuild the occupancy index.
    ///
    /// Returns how many pedestrians changed cell.  Fails if two pedestrians
    /// end on the same cell.
    pub(crate) fn commit(&mut self, targets: &BTreeMap<PedId, Cell>) -> SimResult<usize> {
        let mut moved = 0;
        for (id, &to) in targets {
            let Some(ped) = self.peds.get_mut(id) else {
                return Err(ca_core::CaError::PedestrianNotFound(*id).into());
            };
            if to == ped.cell {
                ped.direction = Neighbor::Stay;
                ped.not_moving += 1;
            } else {
                debug_assert!(ped.cell.is_adjacent(to), "{} jumped {} -> {to}", ped.id, ped.cell);
                ped.direction = ped.cell.direction_to(to).unwrap_or(Neighbor::Stay);
                ped.cell = to;
                ped.not_moving = 0;
                moved += 1;
            }
        }

        let mut occupancy = CellIndex::default();
        for ped in self.peds.values() {
            if let Some(other) = occupancy.insert(ped.cell, ped.id) {
                return Err(SimError::Occupancy { cell: ped.cell, a: other, b: ped.id });
            }
        }
        self.occupancy = occupancy;
        Ok(moved)
    }
}
