//! One backdrop instance: state, setup and the per-frame pipeline.
//!
//! `Animation` owns everything that changes between frames (particles, the
//! network, the frame counter and the random source) and knows nothing about
//! timing. Callers decide when a frame happens; see [`crate::schedule`].

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::BackdropConfig;
use crate::error::Result;
use crate::network::NetworkEngine;
use crate::particles::ParticleField;
use crate::render::{backdrop, layers, Surface};
use crate::viewport::Viewport;

/// Animation state for a single canvas.
pub struct Animation {
    config: BackdropConfig,
    viewport: Viewport,
    seed: u64,
    rng: SmallRng,
    /// Frames advanced since construction. Drives dune phase and pulses.
    frame: u64,
    particles: ParticleField,
    network: NetworkEngine,
}

impl Animation {
    /// Validate `config` and lay out the first scene.
    ///
    /// Uses `config.seed` when set, otherwise a seed drawn from entropy.
    pub fn new(config: BackdropConfig, viewport: Viewport) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, viewport, seed)
    }

    /// Like [`Animation::new`] with an explicit seed.
    pub fn with_seed(config: BackdropConfig, viewport: Viewport, seed: u64) -> Result<Self> {
        config.validate()?;

        let node_capacity = config.network.count;
        let mut animation = Self {
            viewport,
            seed,
            rng: SmallRng::seed_from_u64(seed),
            frame: 0,
            particles: ParticleField::new(),
            network: NetworkEngine::with_capacity(node_capacity, node_capacity * 2),
            config,
        };
        animation.init(viewport);
        Ok(animation)
    }

    /// Rebuild particles and the network for `viewport`.
    ///
    /// The random source restarts from the instance seed, so calling this
    /// twice with the same viewport yields the same scene.
    pub fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rng = SmallRng::seed_from_u64(self.seed);
        self.particles
            .populate(&self.config.particles, &self.viewport, &mut self.rng);
        self.network
            .populate(&self.config.network, &self.viewport, &mut self.rng);

        info!(
            width = viewport.width,
            height = viewport.height,
            dpr = viewport.dpr,
            particles = self.particles.len(),
            nodes = self.network.node_count(),
            links = self.network.link_count(),
            seed = self.seed,
            "backdrop initialized"
        );
    }

    /// Re-lay out for a new display size. The frame counter keeps running so
    /// dunes do not jump back to their starting phase.
    pub fn resize(&mut self, viewport: Viewport) {
        debug!(frame = self.frame, "resize");
        self.init(viewport);
    }

    /// Update particles and network without drawing, then advance the frame.
    pub fn step(&mut self) {
        self.particles
            .update(&self.config.particles, &self.viewport, &mut self.rng);
        self.network
            .update(&self.config.network, &self.viewport, &mut self.rng);
        self.frame += 1;
    }

    /// Paint the current state without advancing it.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        self.paint_scenery(surface);
        self.paint_particles(surface);
        self.paint_network(surface);
    }

    /// Run one full frame: background, dunes, particles (update then draw),
    /// network (update then draw), then advance the frame counter.
    pub fn advance<S: Surface>(&mut self, surface: &mut S) {
        self.paint_scenery(surface);

        self.particles
            .update(&self.config.particles, &self.viewport, &mut self.rng);
        self.paint_particles(surface);

        self.network
            .update(&self.config.network, &self.viewport, &mut self.rng);
        self.paint_network(surface);

        self.frame += 1;
    }

    fn paint_scenery<S: Surface>(&self, surface: &mut S) {
        backdrop::paint_background(surface, &self.config.palette, &self.viewport);
        backdrop::paint_dunes(
            surface,
            &self.config.dunes,
            self.config.dune_style,
            &self.viewport,
            self.frame,
        );
    }

    fn paint_particles<S: Surface>(&self, surface: &mut S) {
        layers::draw_particles(
            surface,
            &self.particles,
            &self.config.particles,
            self.config.palette.particle,
        );
    }

    fn paint_network<S: Surface>(&self, surface: &mut S) {
        layers::draw_network(
            surface,
            &self.network,
            &self.config.network,
            &self.config.palette,
            self.frame,
        );
    }

    /// The validated config this animation was built from.
    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Viewport of the current layout.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seed every `init` restarts the random source from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The dust field.
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// The node-link network.
    pub fn network(&self) -> &NetworkEngine {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, Span};
    use crate::error::BackdropError;
    use crate::render::{DrawCommand, RecordingSurface};

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 1.0)
    }

    #[test]
    fn test_default_counts() {
        let anim = Animation::with_seed(BackdropConfig::default(), viewport(), 1).unwrap();
        assert_eq!(anim.particles().len(), 90);
        assert_eq!(anim.network().node_count(), 24);
        assert_eq!(anim.frame(), 0);
        assert_eq!(anim.seed(), 1);
        for link in anim.network().links() {
            assert!(link.a < link.b && link.b.0 < 24);
        }
    }

    #[test]
    fn test_config_seed_is_used() {
        let config = BackdropConfig {
            seed: Some(77),
            ..BackdropConfig::default()
        };
        let anim = Animation::new(config, viewport()).unwrap();
        assert_eq!(anim.seed(), 77);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = Animation::with_seed(BackdropConfig::default(), viewport(), 42).unwrap();
        let b = Animation::with_seed(BackdropConfig::default(), viewport(), 42).unwrap();
        assert_eq!(a.particles().particles(), b.particles().particles());
        assert_eq!(a.network().positions_x(), b.network().positions_x());
        assert_eq!(a.network().links(), b.network().links());
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut anim = Animation::with_seed(BackdropConfig::default(), viewport(), 9).unwrap();
        let first = anim.network().interleaved_positions();
        let first_links = anim.network().links();
        for _ in 0..30 {
            anim.step();
        }
        anim.init(viewport());
        assert_eq!(anim.network().interleaved_positions(), first);
        assert_eq!(anim.network().links(), first_links);
    }

    #[test]
    fn test_resize_keeps_frame_and_fits_new_bounds() {
        let mut anim = Animation::with_seed(BackdropConfig::default(), viewport(), 3).unwrap();
        for _ in 0..10 {
            anim.step();
        }
        let small = Viewport::new(400.0, 300.0, 2.0);
        anim.resize(small);

        assert_eq!(anim.frame(), 10);
        assert_eq!(anim.viewport(), small);
        for p in anim.particles().particles() {
            assert!(small.contains(p.x, p.y));
        }
        let (min_x, min_y, max_x, max_y) = anim.network().bounds().unwrap();
        assert!(min_x >= 0.0 && max_x < 400.0);
        assert!(min_y >= 0.0 && max_y < 300.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BackdropConfig::default();
        config.particles.speed_x = Span::new(1.0, f32::NAN);
        match Animation::with_seed(config, viewport(), 0) {
            Err(BackdropError::InvalidConfig(msg)) => assert!(msg.contains("speedX")),
            other => panic!("expected invalid config, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_advance_pipeline_order() {
        let vp = viewport();
        let mut anim = Animation::with_seed(BackdropConfig::default(), vp, 5).unwrap();
        let mut surface = RecordingSurface::new(vp);
        anim.advance(&mut surface);

        let cmds = surface.commands();
        assert!(matches!(cmds[0], DrawCommand::FillRect(..)));
        assert!(matches!(cmds[1], DrawCommand::FillRect(..)));
        for cmd in &cmds[2..5] {
            assert!(matches!(cmd, DrawCommand::StrokePath(..)));
        }
        assert_eq!(cmds[5], DrawCommand::Save);
        let restore = cmds.iter().position(|c| *c == DrawCommand::Restore).unwrap();
        assert_eq!(restore, 5 + 2 + 90);

        let links = anim.network().link_count() as usize;
        let tail = &cmds[restore + 1..];
        assert_eq!(tail.len(), links + 24 * 2);
        assert!(tail[..links].iter().all(|c| matches!(c, DrawCommand::Line(..))));
        assert_eq!(anim.frame(), 1);
    }

    #[test]
    fn test_render_does_not_advance() {
        let vp = viewport();
        let anim = Animation::with_seed(BackdropConfig::default(), vp, 5).unwrap();
        let mut a = RecordingSurface::new(vp);
        let mut b = RecordingSurface::new(vp);
        anim.render(&mut a);
        anim.render(&mut b);
        assert_eq!(a.commands(), b.commands());
        assert_eq!(anim.frame(), 0);
    }

    #[test]
    fn test_presets_stay_finite() {
        for &preset in Preset::ALL {
            let vp = Viewport::new(1280.0, 720.0, 1.5);
            let mut anim = Animation::with_seed(preset.config(), vp, 11).unwrap();
            let mut surface = RecordingSurface::new(vp);
            for _ in 0..300 {
                surface.clear();
                anim.advance(&mut surface);
            }
            assert!(surface.all_finite(), "{} produced non-finite geometry", preset.label());
            assert_eq!(surface.save_depth(), 0);
        }
    }

    #[test]
    fn test_empty_viewport_is_harmless() {
        let vp = Viewport::new(0.0, 0.0, 1.0);
        let mut anim = Animation::with_seed(BackdropConfig::default(), vp, 2).unwrap();
        let mut surface = RecordingSurface::new(vp);
        for _ in 0..5 {
            anim.advance(&mut surface);
        }
        assert!(surface.all_finite());
    }
}
