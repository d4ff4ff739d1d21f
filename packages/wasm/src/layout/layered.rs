//! Fixed band adjacency.
//!
//! Nodes are grouped by category. Within a band, nodes are chained in spawn
//! order; between neighbouring bands, the k-th node of band `c` links to the
//! k-th node of band `c + 1`. The result is a ladder-like lattice whose shape
//! depends only on counts, never on positions.

use std::collections::BTreeMap;

use crate::network::{Category, Link, NodeId};

/// Build the band lattice. `categories[i]` is the band of `ids[i]`.
pub fn build(ids: &[NodeId], categories: &[Category]) -> Vec<Link> {
    let mut bands: BTreeMap<Category, Vec<NodeId>> = BTreeMap::new();
    for (&id, &category) in ids.iter().zip(categories) {
        bands.entry(category).or_default().push(id);
    }

    let mut links = Vec::new();
    for members in bands.values() {
        links.extend(members.windows(2).filter_map(|w| Link::new(w[0], w[1])));
    }

    let ordered: Vec<&Vec<NodeId>> = bands.values().collect();
    for pair in ordered.windows(2) {
        let (upper, lower) = (pair[0], pair[1]);
        links.extend(
            upper
                .iter()
                .zip(lower.iter())
                .filter_map(|(&a, &b)| Link::new(a, b)),
        );
    }

    links.sort_unstable();
    links.dedup();
    links
}
