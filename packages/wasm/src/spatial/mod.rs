//! Spatial indexing for proximity queries.
//!
//! This module provides an R-tree based spatial index used to find node
//! pairs closer than the link distance without an all-pairs scan.

mod rtree;

pub use rtree::SpatialIndex;
