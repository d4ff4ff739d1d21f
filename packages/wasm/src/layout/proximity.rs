//! Distance-threshold links.
//!
//! Every pair of nodes strictly closer than the link distance is connected.
//! The R-tree keeps this near-linear for the small, dense clusters the
//! backdrop spawns.

use crate::network::{Link, NodeId};
use crate::spatial::SpatialIndex;

/// All links between nodes closer than `link_distance`.
pub fn build(points: &[(NodeId, f32, f32)], link_distance: f32) -> Vec<Link> {
    if points.len() < 2 || !(link_distance > 0.0) {
        return Vec::new();
    }
    let index = SpatialIndex::from_points(points);
    index
        .pairs_within(link_distance)
        .into_iter()
        .filter_map(|(a, b)| Link::new(a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single() {
        assert!(build(&[], 100.0).is_empty());
        assert!(build(&[(NodeId(0), 1.0, 1.0)], 100.0).is_empty());
    }

    #[test]
    fn test_threshold() {
        let points = [
            (NodeId(0), 0.0, 0.0),
            (NodeId(1), 100.0, 0.0),
            (NodeId(2), 300.0, 0.0),
        ];
        let links = build(&points, 160.0);
        assert_eq!(links, vec![Link::new(NodeId(0), NodeId(1)).unwrap()]);

        assert_eq!(build(&points, 250.0).len(), 2);
        assert_eq!(build(&points, 1000.0).len(), 3);
    }

    #[test]
    fn test_non_positive_distance_links_nothing() {
        let points = [(NodeId(0), 0.0, 0.0), (NodeId(1), 0.0, 0.0)];
        assert!(build(&points, 0.0).is_empty());
        assert!(build(&points, f32::NAN).is_empty());
    }
}
