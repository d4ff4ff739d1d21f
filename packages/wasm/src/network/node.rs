//! Node identifiers and category tags.
//!
//! Nodes are the points of the network. Each node has:
//! - A stable index-based identifier
//! - Position (x, y) and velocity (vx, vy), stored by the engine
//! - A category tag selecting its vertical band in spring motion

use std::fmt;

/// Node identifier; the node's index in the engine's buffers.
///
/// It wraps a u32 for compact storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Index into SoA buffers.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Band a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Category(pub u8);

impl Category {
    /// Category of the `index`-th spawned node when there are `bands` bands.
    #[inline]
    pub fn for_index(index: usize, bands: u8) -> Self {
        Self((index % bands.max(1) as usize) as u8)
    }

    /// Pick this category's entry from a per-band table, wrapping around.
    #[inline]
    pub fn select<T: Copy>(self, table: &[T]) -> Option<T> {
        if table.is_empty() {
            None
        } else {
            Some(table[self.0 as usize % table.len()])
        }
    }
}
