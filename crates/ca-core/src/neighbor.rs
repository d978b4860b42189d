//! Von Neumann neighbor keys and a fixed-size map keyed by them.
//!
//! A pedestrian's candidate moves are its own cell plus the four orthogonal
//! neighbors.  The same enum doubles as the "last movement direction" of a
//! pedestrian, so the direction-persistence prior can be a plain 5×5 table.
//!
//! Index convention: `i` grows to the right, `j` grows to the top.

/// One of the five candidate target cells of a pedestrian.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Neighbor {
    /// The pedestrian's own cell.
    #[default]
    Stay,
    /// `(i - 1, j)`
    Left,
    /// `(i, j + 1)`
    Top,
    /// `(i + 1, j)`
    Right,
    /// `(i, j - 1)`
    Bottom,
}

impl Neighbor {
    /// All keys in table order.
    pub const ALL: [Neighbor; 5] = [
        Neighbor::Stay,
        Neighbor::Left,
        Neighbor::Top,
        Neighbor::Right,
        Neighbor::Bottom,
    ];

    /// Row/column of this key in 5-element tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Neighbor::Stay   => 0,
            Neighbor::Left   => 1,
            Neighbor::Top    => 2,
            Neighbor::Right  => 3,
            Neighbor::Bottom => 4,
        }
    }

    /// `(di, dj)` index offset of the key relative to the pedestrian's cell.
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Neighbor::Stay   => (0, 0),
            Neighbor::Left   => (-1, 0),
            Neighbor::Top    => (0, 1),
            Neighbor::Right  => (1, 0),
            Neighbor::Bottom => (0, -1),
        }
    }

    /// Inverse of [`offset`](Self::offset).  `None` for non-orthogonal or
    /// multi-cell offsets.
    pub fn from_offset(di: isize, dj: isize) -> Option<Neighbor> {
        Neighbor::ALL.into_iter().find(|n| n.offset() == (di, dj))
    }

    /// The opposite direction (`Stay` is its own opposite).
    pub const fn opposite(self) -> Neighbor {
        match self {
            Neighbor::Stay   => Neighbor::Stay,
            Neighbor::Left   => Neighbor::Right,
            Neighbor::Top    => Neighbor::Bottom,
            Neighbor::Right  => Neighbor::Left,
            Neighbor::Bottom => Neighbor::Top,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Neighbor::Stay   => "stay",
            Neighbor::Left   => "left",
            Neighbor::Top    => "top",
            Neighbor::Right  => "right",
            Neighbor::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for Neighbor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── NeighborMap ───────────────────────────────────────────────────────────────

/// A map from [`Neighbor`] to `T` backed by a fixed array.
///
/// Absent keys are `None`; iteration is always in [`Neighbor::ALL`] order so
/// that weighted draws over a map are reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborMap<T> {
    slots: [Option<T>; 5],
}

impl<T> NeighborMap<T> {
    pub fn new() -> Self {
        Self { slots: [None, None, None, None, None] }
    }

    #[inline]
    pub fn insert(&mut self, key: Neighbor, value: T) -> Option<T> {
        self.slots[key.index()].replace(value)
    }

    #[inline]
    pub fn remove(&mut self, key: Neighbor) -> Option<T> {
        self.slots[key.index()].take()
    }

    #[inline]
    pub fn get(&self, key: Neighbor) -> Option<&T> {
        self.slots[key.index()].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, key: Neighbor) -> Option<&mut T> {
        self.slots[key.index()].as_mut()
    }

    #[inline]
    pub fn contains_key(&self, key: Neighbor) -> bool {
        self.slots[key.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Present keys in table order.
    pub fn keys(&self) -> impl Iterator<Item = Neighbor> + '_ {
        Neighbor::ALL.into_iter().filter(|k| self.contains_key(*k))
    }

    /// Present `(key, &value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Neighbor, &T)> + '_ {
        Neighbor::ALL
            .into_iter()
            .filter_map(|k| self.slots[k.index()].as_ref().map(|v| (k, v)))
    }

    /// Present `(key, &mut value)` pairs in table order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Neighbor, &mut T)> + '_ {
        Neighbor::ALL
            .into_iter()
            .zip(self.slots.iter_mut())
            .filter_map(|(k, s)| s.as_mut().map(|v| (k, v)))
    }

    /// Map every present value, keeping the key set.
    pub fn map<U, F: FnMut(Neighbor, &T) -> U>(&self, mut f: F) -> NeighborMap<U> {
        let mut out = NeighborMap::new();
        for (k, v) in self.iter() {
            out.insert(k, f(k, v));
        }
        out
    }
}

impl<T> Default for NeighborMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(Neighbor, T)> for NeighborMap<T> {
    fn from_iter<I: IntoIterator<Item = (Neighbor, T)>>(iter: I) -> Self {
        let mut map = NeighborMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
