//! Identifier newtypes.
//!
//! Every id is `Copy + Ord` and is used as a `BTreeMap` key, which keeps all
//! per-pedestrian and per-exit loops in a fixed order.  Ids print with a
//! one-letter tag (`p7`, `x0`, `e1`, `a2`) to keep log lines short.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.0)
            }
        }
    };
}

typed_id! {
    /// A simulated pedestrian.  Handed out in increasing order and never
    /// reused within a run.
    pub struct PedId(u32) = "p";
}

typed_id! {
    /// An exit segment, numbered in floor-plan order.
    pub struct ExitId(u32) = "x";
}

typed_id! {
    pub struct EntranceId(u32) = "e";
}

typed_id! {
    pub struct AttractionId(u32) = "a";
}
