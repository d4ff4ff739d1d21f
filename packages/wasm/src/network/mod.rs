//! The decorative node-link network.
//!
//! Topology lives in a petgraph undirected graph so every link is an
//! unordered pair of existing nodes. Positions and velocities are kept in a
//! Structure of Arrays (SoA) layout next to it, which is what the motion
//! update and the renderer iterate over every frame.

mod engine;
mod link;
mod node;

pub use engine::NetworkEngine;
pub use link::{Link, LinkId};
pub use node::{Category, NodeId};
