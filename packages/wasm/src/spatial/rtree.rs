//! Neighbour queries over node positions, backed by an rstar R*-tree.
//!
//! Link building only needs "who is near whom" at setup time, so the tree is
//! bulk-loaded once per layout and queried for pairs; single inserts and
//! radius lookups exist for incremental callers.

use rstar::primitives::GeomWithData;
use rstar::{PointDistance, RTree};

use crate::network::NodeId;

/// A node position tagged with its id.
pub type NodePoint = GeomWithData<[f32; 2], NodeId>;

/// Proximity index over network nodes.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load an index from `(id, x, y)` tuples.
    pub fn from_points(points: &[(NodeId, f32, f32)]) -> Self {
        let mut index = Self::new();
        index.rebuild(points);
        index
    }

    /// Replace the contents with `points` in one bulk load.
    pub fn rebuild(&mut self, points: &[(NodeId, f32, f32)]) {
        self.tree = RTree::bulk_load(
            points
                .iter()
                .map(|&(id, x, y)| NodePoint::new([x, y], id))
                .collect(),
        );
    }

    pub fn insert(&mut self, id: NodeId, x: f32, y: f32) {
        self.tree.insert(NodePoint::new([x, y], id));
    }

    /// Ids of nodes at most `radius` away from `(x, y)`.
    pub fn in_radius(&self, x: f32, y: f32, radius: f32) -> Vec<NodeId> {
        self.tree
            .locate_within_distance([x, y], radius * radius)
            .map(|p| p.data)
            .collect()
    }

    /// Every unordered pair of distinct nodes strictly closer than `distance`.
    ///
    /// Each pair appears once as `(low, high)`; the list is sorted.
    pub fn pairs_within(&self, distance: f32) -> Vec<(NodeId, NodeId)> {
        let limit = distance * distance;
        let mut pairs: Vec<(NodeId, NodeId)> = self
            .tree
            .iter()
            .flat_map(|p| {
                let origin = *p.geom();
                self.tree
                    .locate_within_distance(origin, limit)
                    .filter(move |q| p.data < q.data && q.distance_2(&origin) < limit)
                    .map(move |q| (p.data, q.data))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
