//! Node, edge-key and CSR edge identifiers.
//!
//! Each identifier is a distinct newtype so a `NodeId` cannot be passed where
//! an `EdgeKey` is expected.  They order and hash like their integer, which
//! keeps `BTreeMap` adjacency deterministic.  Use `.index()` to address the
//! per-node and per-edge arrays.

use std::fmt;

/// Declare an identifier newtype over an unsigned integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Placeholder for "no id": the inner type's `MAX`, never issued.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Position in a per-node or per-edge array.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road-network node.  Nodes are never removed, so a `NodeId`
    /// stays valid for the lifetime of the network that issued it.
    pub struct NodeId(u32);
}

typed_id! {
    /// Distinguishes parallel edges sharing the same ordered `(from, to)` pair.
    ///
    /// Keys are only unique per node pair: `A→B` key 0 and `B→C` key 0 are
    /// unrelated edges.
    pub struct EdgeKey(u32);
}

typed_id! {
    /// Index of a directed edge in a simplified graph's CSR arrays.  Only
    /// meaningful for the graph that produced it.
    pub struct EdgeId(u32);
}
