//! NetworkEngine - node buffers plus link topology.
//!
//! The NetworkEngine stores the link topology using petgraph's undirected
//! Graph and maintains SoA (Structure of Arrays) buffers for positions,
//! velocities and categories. Node indices in the graph and in the buffers
//! always agree because nodes are only ever appended or cleared wholesale.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::Rng;
use tracing::debug;

use super::link::{Link, LinkId};
use super::node::{Category, NodeId};
use crate::config::{NetworkConfig, NodeMotion, Span};
use crate::layout;
use crate::viewport::Viewport;

/// The node-link network of one animation instance.
///
/// This struct manages:
/// - Link topology via petgraph
/// - Position/velocity buffers in SoA layout
/// - Per-node category tags
pub struct NetworkEngine {
    /// Undirected topology. Node weights are their stable ids.
    graph: UnGraph<NodeId, ()>,

    /// X positions (SoA layout)
    pos_x: Vec<f32>,

    /// Y positions (SoA layout)
    pos_y: Vec<f32>,

    /// X velocities (SoA layout)
    vel_x: Vec<f32>,

    /// Y velocities (SoA layout)
    vel_y: Vec<f32>,

    /// Band of each node
    categories: Vec<Category>,
}

impl NetworkEngine {
    /// Create a new empty engine.
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            pos_x: Vec::new(),
            pos_y: Vec::new(),
            vel_x: Vec::new(),
            vel_y: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Create an engine with pre-allocated capacity.
    pub fn with_capacity(node_capacity: usize, link_capacity: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(node_capacity, link_capacity),
            pos_x: Vec::with_capacity(node_capacity),
            pos_y: Vec::with_capacity(node_capacity),
            vel_x: Vec::with_capacity(node_capacity),
            vel_y: Vec::with_capacity(node_capacity),
            categories: Vec::with_capacity(node_capacity),
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Replace the network with `config.count` randomly placed nodes and the
    /// links chosen by `config.topology`.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        config: &NetworkConfig,
        viewport: &Viewport,
        rng: &mut R,
    ) {
        self.clear();

        let spawn_x = config.spawn_x.scaled(viewport.width);
        let spawn_y = config.spawn_y.scaled(viewport.height);
        for i in 0..config.count {
            let x = spawn_x.sample(rng);
            let y = spawn_y.sample(rng);
            let vx = config.initial_velocity.sample(rng);
            let vy = config.initial_velocity.sample(rng);
            self.add_node(x, y, vx, vy, Category::for_index(i, config.categories));
        }

        let points: Vec<_> = (0..self.pos_x.len())
            .map(|i| (NodeId(i as u32), self.pos_x[i], self.pos_y[i]))
            .collect();
        let links = layout::build_links(config.topology, &points, &self.categories);
        for link in &links {
            self.add_link(link.a, link.b);
        }

        debug!(
            nodes = self.node_count(),
            links = self.link_count(),
            "network populated"
        );
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Append a node.
    pub fn add_node(&mut self, x: f32, y: f32, vx: f32, vy: f32, category: Category) -> NodeId {
        let id = NodeId(self.pos_x.len() as u32);
        self.graph.add_node(id);

        self.pos_x.push(x);
        self.pos_y.push(y);
        self.vel_x.push(vx);
        self.vel_y.push(vy);
        self.categories.push(category);

        id
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Get a node's position.
    pub fn position(&self, id: NodeId) -> Option<(f32, f32)> {
        let i = id.index();
        (i < self.pos_x.len()).then(|| (self.pos_x[i], self.pos_y[i]))
    }

    /// Get a node's velocity.
    pub fn velocity(&self, id: NodeId) -> Option<(f32, f32)> {
        let i = id.index();
        (i < self.vel_x.len()).then(|| (self.vel_x[i], self.vel_y[i]))
    }

    /// Get a node's band.
    pub fn category(&self, id: NodeId) -> Option<Category> {
        self.categories.get(id.index()).copied()
    }

    // =========================================================================
    // Link Operations
    // =========================================================================

    /// Link two nodes.
    ///
    /// Returns `None` for unknown nodes, self-links and pairs that are
    /// already linked in either order.
    pub fn add_link(&mut self, a: NodeId, b: NodeId) -> Option<LinkId> {
        let link = Link::new(a, b)?;
        let count = self.pos_x.len();
        if link.b.index() >= count {
            return None;
        }

        let (ia, ib) = (NodeIndex::new(link.a.index()), NodeIndex::new(link.b.index()));
        if self.graph.find_edge(ia, ib).is_some() {
            return None;
        }
        let index = self.graph.add_edge(ia, ib, ());
        Some(LinkId(index.index() as u32))
    }

    /// Get the number of links.
    pub fn link_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// All links, normalized and sorted.
    pub fn links(&self) -> Vec<Link> {
        let mut links: Vec<Link> = self
            .graph
            .edge_references()
            .filter_map(|e| {
                let a = *self.graph.node_weight(e.source())?;
                let b = *self.graph.node_weight(e.target())?;
                Link::new(a, b)
            })
            .collect();
        links.sort_unstable();
        links
    }

    /// Current Euclidean length of a link.
    pub fn link_length(&self, link: &Link) -> f32 {
        match (self.position(link.a), self.position(link.b)) {
            (Some((ax, ay)), Some((bx, by))) => (ax - bx).hypot(ay - by),
            _ => 0.0,
        }
    }

    // =========================================================================
    // Motion
    // =========================================================================

    /// Advance every node by one frame.
    ///
    /// Order per node: integrate position, apply the bounds or spring rule,
    /// add jitter, clamp speed to `config.max_speed`.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        config: &NetworkConfig,
        viewport: &Viewport,
        rng: &mut R,
    ) {
        let jitter = Span::new(-config.jitter, config.jitter);

        for i in 0..self.pos_x.len() {
            self.pos_x[i] += self.vel_x[i];
            self.pos_y[i] += self.vel_y[i];

            match &config.motion {
                NodeMotion::Bounce { x, y } => {
                    reflect(self.pos_x[i], &mut self.vel_x[i], x.scaled(viewport.width));
                    reflect(self.pos_y[i], &mut self.vel_y[i], y.scaled(viewport.height));
                }
                NodeMotion::Spring {
                    x,
                    band_targets,
                    stiffness,
                    damping,
                } => {
                    reflect(self.pos_x[i], &mut self.vel_x[i], x.scaled(viewport.width));
                    let band = self.categories[i].select(band_targets).unwrap_or(0.5);
                    let target = band * viewport.height;
                    self.vel_y[i] += (target - self.pos_y[i]) * stiffness;
                    self.vel_x[i] *= damping;
                    self.vel_y[i] *= damping;
                }
            }

            self.vel_x[i] += jitter.sample(rng);
            self.vel_y[i] += jitter.sample(rng);

            let (vx, vy) = clamp_speed(self.vel_x[i], self.vel_y[i], config.max_speed);
            self.vel_x[i] = vx;
            self.vel_y[i] = vy;
        }
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Get X positions slice.
    pub fn positions_x(&self) -> &[f32] {
        &self.pos_x
    }

    /// Get Y positions slice.
    pub fn positions_y(&self) -> &[f32] {
        &self.pos_y
    }

    /// Get X velocities slice.
    pub fn velocities_x(&self) -> &[f32] {
        &self.vel_x
    }

    /// Get Y velocities slice.
    pub fn velocities_y(&self) -> &[f32] {
        &self.vel_y
    }

    /// Positions interleaved as `[x0, y0, x1, y1, ...]`.
    pub fn interleaved_positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.pos_x.len() * 2);
        for (&x, &y) in self.pos_x.iter().zip(&self.pos_y) {
            out.push(x);
            out.push(y);
        }
        out
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Get the bounding box of all nodes as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        if self.pos_x.is_empty() {
            return None;
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for (&x, &y) in self.pos_x.iter().zip(&self.pos_y) {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        Some((min_x, min_y, max_x, max_y))
    }

    /// Remove all nodes and links.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.pos_x.clear();
        self.pos_y.clear();
        self.vel_x.clear();
        self.vel_y.clear();
        self.categories.clear();
    }
}

impl Default for NetworkEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Point the velocity back inside `[bounds.min, bounds.max]` when the
/// coordinate has left it.
#[inline]
fn reflect(pos: f32, vel: &mut f32, bounds: Span) {
    if pos < bounds.min {
        *vel = vel.abs();
    } else if pos > bounds.max {
        *vel = -vel.abs();
    }
}

/// Scale `(vx, vy)` down so its magnitude is at most `max`.
#[inline]
fn clamp_speed(vx: f32, vy: f32, max: f32) -> (f32, f32) {
    let speed = vx.hypot(vy);
    if speed > max && speed > 0.0 {
        let k = max / speed;
        (vx * k, vy * k)
    } else {
        (vx, vy)
    }
}
