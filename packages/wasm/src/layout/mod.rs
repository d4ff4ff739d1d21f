//! Link topology builders.
//!
//! Links are chosen once, right after nodes are spawned, and stay fixed until
//! the next setup. Each builder returns normalized [`Link`]s, sorted and free
//! of duplicates, that reference only the nodes it was given.

pub mod layered;
pub mod proximity;

use crate::config::Topology;
use crate::network::{Category, Link, NodeId};

/// Build links for `topology` over nodes given as `(id, x, y)` plus their
/// categories (indexed like `points`).
pub fn build_links(
    topology: Topology,
    points: &[(NodeId, f32, f32)],
    categories: &[Category],
) -> Vec<Link> {
    match topology {
        Topology::Proximity { link_distance } => proximity::build(points, link_distance),
        Topology::Layered => {
            let ids: Vec<NodeId> = points.iter().map(|&(id, _, _)| id).collect();
            layered::build(&ids, categories)
        }
    }
}
