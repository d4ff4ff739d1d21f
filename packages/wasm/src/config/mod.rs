//! Backdrop configuration.
//!
//! Every knob of the animation lives here: palette, dune layers, particle
//! ranges and network topology/motion. All structs deserialize from camelCase
//! JS objects with per-field defaults, so callers only spell out what they
//! change. The defaults reproduce the [`Preset::Dryland`] skin.

mod options;
mod preset;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BackdropError, Result};
use crate::render::color::{ColorStop, Rgba};
use crate::render::CompositeMode;

pub use options::BackdropOptions;
pub use preset::Preset;

/// A closed sampling range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform sample in `[min, max)`; returns `min` when the span is empty.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.r#gen::<f32>() * (self.max - self.min)
    }

    /// Both ends multiplied by `extent` (fractions of a viewport edge to pixels).
    #[inline]
    pub fn scaled(self, extent: f32) -> Self {
        Self::new(self.min * extent, self.max * extent)
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    fn check(&self, field: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(BackdropError::config(field, "bounds must be finite"));
        }
        if self.min > self.max {
            return Err(BackdropError::config(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Colors for every layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    /// Linear gradient stops painted from the top-left to the bottom-right corner.
    pub background: Vec<ColorStop>,
    /// Center color of the radial haze; fades to transparent at the rim.
    pub haze: Rgba,
    /// Haze center as fractions of (width, height).
    pub haze_center: (f32, f32),
    /// Haze radius as a fraction of the width.
    pub haze_radius: f32,
    pub particle: Rgba,
    pub link: Rgba,
    pub node: Rgba,
    pub halo: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: vec![
                ColorStop::new(0.0, Rgba::rgb(0x3a, 0x1a, 0x18)),
                ColorStop::new(0.3, Rgba::rgb(0x6b, 0x3d, 0x26)),
                ColorStop::new(0.7, Rgba::rgb(0x1a, 0x1d, 0x38)),
                ColorStop::new(1.0, Rgba::rgb(0x0f, 0x0f, 0x10)),
            ],
            haze: Rgba::new(255, 255, 255, 0.08),
            haze_center: (0.5, 0.4),
            haze_radius: 0.6,
            particle: Rgba::WHITE,
            link: Rgba::rgb(255, 214, 170),
            node: Rgba::rgb(255, 236, 214),
            halo: Rgba::rgb(255, 180, 120),
        }
    }
}

/// One parallax ribbon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuneLayer {
    /// Peak deviation from the baseline, in pixels.
    pub amplitude: f32,
    /// Phase advance per frame.
    pub speed: f32,
    /// Baseline as a fraction of the height.
    pub offset_y: f32,
    pub color: Rgba,
}

impl DuneLayer {
    pub fn new(amplitude: f32, speed: f32, offset_y: f32, color: Rgba) -> Self {
        Self {
            amplitude,
            speed,
            offset_y,
            color,
        }
    }
}

/// How dune ribbons are painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DuneStyle {
    /// Contour line only.
    #[serde(rename_all = "camelCase")]
    Stroke { line_width: f32 },
    /// Closed shape filled down to the bottom edge.
    Fill,
}

impl Default for DuneStyle {
    fn default() -> Self {
        Self::Stroke { line_width: 2.0 }
    }
}

fn default_dunes() -> Vec<DuneLayer> {
    vec![
        DuneLayer::new(40.0, 0.04, 0.65, Rgba::new(255, 255, 255, 0.08)),
        DuneLayer::new(60.0, 0.025, 0.72, Rgba::new(255, 255, 255, 0.06)),
        DuneLayer::new(90.0, 0.015, 0.8, Rgba::new(255, 255, 255, 0.04)),
    ]
}

/// Per-edge distance a particle may travel past the viewport before recycling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitBounds {
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for ExitBounds {
    fn default() -> Self {
        Self {
            right: 20.0,
            top: 20.0,
            bottom: 20.0,
        }
    }
}

/// Drifting dust.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleConfig {
    pub count: usize,
    /// Spawn and re-entry height, as fractions of the viewport height.
    pub spawn_y: Span,
    pub speed_x: Span,
    pub speed_y: Span,
    pub radius: Span,
    /// Initial age, so a fresh field does not pulse in unison.
    pub initial_life: Span,
    pub exit: ExitBounds,
    /// X coordinate recycled particles restart from.
    pub reentry_x: f32,
    pub alpha_base: f32,
    pub alpha_amplitude: f32,
    /// Radians of alpha oscillation per frame of age.
    pub alpha_frequency: f32,
    pub blend: CompositeMode,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 90,
            spawn_y: Span::new(0.1, 0.8),
            speed_x: Span::new(0.2, 0.6),
            speed_y: Span::new(-0.05, 0.05),
            radius: Span::new(0.5, 1.5),
            initial_life: Span::new(0.0, 200.0),
            exit: ExitBounds::default(),
            reentry_x: -10.0,
            alpha_base: 0.08,
            alpha_amplitude: 0.08,
            alpha_frequency: 0.05,
            blend: CompositeMode::Lighter,
        }
    }
}

/// How links between nodes are chosen at setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Topology {
    /// Link every pair closer than `link_distance` pixels.
    #[serde(rename_all = "camelCase")]
    Proximity { link_distance: f32 },
    /// Fixed pattern: chain each category band, then bridge neighbouring bands.
    Layered,
}

impl Default for Topology {
    fn default() -> Self {
        Self::Proximity {
            link_distance: 160.0,
        }
    }
}

/// Per-frame node motion rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeMotion {
    /// Reverse a velocity component whenever the node is outside the box
    /// (fractions of width and height).
    Bounce { x: Span, y: Span },
    /// Pull each node toward its category's band (fraction of height) with a
    /// damped spring; horizontal motion still bounces inside `x`.
    #[serde(rename_all = "camelCase")]
    Spring {
        x: Span,
        band_targets: Vec<f32>,
        stiffness: f32,
        damping: f32,
    },
}

impl Default for NodeMotion {
    fn default() -> Self {
        Self::Bounce {
            x: Span::new(0.2, 0.8),
            y: Span::new(0.15, 0.6),
        }
    }
}

/// Coefficients of the sine pulses driving link alpha and node glow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PulseConfig {
    pub link_base: f32,
    pub link_amplitude: f32,
    pub link_time_frequency: f32,
    pub link_length_frequency: f32,
    pub node_base: f32,
    pub node_amplitude: f32,
    pub node_time_frequency: f32,
    pub node_x_frequency: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            link_base: 0.12,
            link_amplitude: 0.08,
            link_time_frequency: 0.03,
            link_length_frequency: 0.02,
            node_base: 0.6,
            node_amplitude: 0.4,
            node_time_frequency: 0.04,
            node_x_frequency: 0.01,
        }
    }
}

/// The node-link graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    pub count: usize,
    /// Spawn box as fractions of (width, height).
    pub spawn_x: Span,
    pub spawn_y: Span,
    /// Initial velocity range for both components.
    pub initial_velocity: Span,
    pub topology: Topology,
    pub motion: NodeMotion,
    /// Number of category bands; node `i` belongs to band `i % categories`.
    pub categories: u8,
    /// Per-frame velocity noise, sampled from `[-jitter, jitter)`.
    pub jitter: f32,
    /// Upper bound on velocity magnitude after every update.
    pub max_speed: f32,
    pub node_radius: f32,
    pub halo_radius: f32,
    pub link_width: f32,
    pub pulse: PulseConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            count: 24,
            spawn_x: Span::new(0.25, 0.75),
            spawn_y: Span::new(0.2, 0.55),
            initial_velocity: Span::new(-0.3, 0.3),
            topology: Topology::default(),
            motion: NodeMotion::default(),
            categories: 1,
            jitter: 0.02,
            max_speed: 0.4,
            node_radius: 2.0,
            halo_radius: 10.0,
            link_width: 1.0,
            pulse: PulseConfig::default(),
        }
    }
}

/// Complete description of one backdrop instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackdropConfig {
    pub palette: Palette,
    pub dunes: Vec<DuneLayer>,
    pub dune_style: DuneStyle,
    pub particles: ParticleConfig,
    pub network: NetworkConfig,
    /// Fixed seed for reproducible layouts; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            dunes: default_dunes(),
            dune_style: DuneStyle::default(),
            particles: ParticleConfig::default(),
            network: NetworkConfig::default(),
            seed: None,
        }
    }
}

impl BackdropConfig {
    /// Reject configs that would produce non-finite geometry.
    pub fn validate(&self) -> Result<()> {
        let finite = |field: &str, v: f32| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(BackdropError::config(field, "must be finite"))
            }
        };

        let palette = &self.palette;
        finite("palette.hazeCenter", palette.haze_center.0)?;
        finite("palette.hazeCenter", palette.haze_center.1)?;
        finite("palette.hazeRadius", palette.haze_radius)?;
        if palette.haze_radius < 0.0 {
            return Err(BackdropError::config("palette.hazeRadius", "must not be negative"));
        }
        for stop in &palette.background {
            if !(0.0..=1.0).contains(&stop.offset) {
                return Err(BackdropError::config(
                    "palette.background",
                    format!("stop offset {} outside [0, 1]", stop.offset),
                ));
            }
        }

        for layer in &self.dunes {
            finite("dunes.amplitude", layer.amplitude)?;
            finite("dunes.speed", layer.speed)?;
            finite("dunes.offsetY", layer.offset_y)?;
        }
        if let DuneStyle::Stroke { line_width } = self.dune_style {
            finite("duneStyle.lineWidth", line_width)?;
        }

        let p = &self.particles;
        p.spawn_y.check("particles.spawnY")?;
        p.speed_x.check("particles.speedX")?;
        p.speed_y.check("particles.speedY")?;
        p.radius.check("particles.radius")?;
        p.initial_life.check("particles.initialLife")?;
        if p.speed_x.min <= 0.0 {
            return Err(BackdropError::config(
                "particles.speedX",
                "must be positive so particles reach the right edge",
            ));
        }
        if p.radius.min < 0.0 {
            return Err(BackdropError::config("particles.radius", "must not be negative"));
        }
        finite("particles.exit.right", p.exit.right)?;
        finite("particles.exit.top", p.exit.top)?;
        finite("particles.exit.bottom", p.exit.bottom)?;
        finite("particles.reentryX", p.reentry_x)?;
        finite("particles.alphaBase", p.alpha_base)?;
        finite("particles.alphaAmplitude", p.alpha_amplitude)?;
        finite("particles.alphaFrequency", p.alpha_frequency)?;

        let n = &self.network;
        n.spawn_x.check("network.spawnX")?;
        n.spawn_y.check("network.spawnY")?;
        n.initial_velocity.check("network.initialVelocity")?;
        if n.categories == 0 {
            return Err(BackdropError::config("network.categories", "must be at least 1"));
        }
        finite("network.jitter", n.jitter)?;
        if n.jitter < 0.0 {
            return Err(BackdropError::config("network.jitter", "must not be negative"));
        }
        if !(n.max_speed.is_finite() && n.max_speed > 0.0) {
            return Err(BackdropError::config("network.maxSpeed", "must be positive"));
        }
        finite("network.nodeRadius", n.node_radius)?;
        finite("network.haloRadius", n.halo_radius)?;
        finite("network.linkWidth", n.link_width)?;

        if let Topology::Proximity { link_distance } = n.topology {
            if !(link_distance.is_finite() && link_distance > 0.0) {
                return Err(BackdropError::config(
                    "network.topology.linkDistance",
                    "must be positive",
                ));
            }
        }

        match &n.motion {
            NodeMotion::Bounce { x, y } => {
                x.check("network.motion.x")?;
                y.check("network.motion.y")?;
            }
            NodeMotion::Spring {
                x,
                band_targets,
                stiffness,
                damping,
            } => {
                x.check("network.motion.x")?;
                if band_targets.is_empty() {
                    return Err(BackdropError::config(
                        "network.motion.bandTargets",
                        "needs at least one band",
                    ));
                }
                for &t in band_targets {
                    finite("network.motion.bandTargets", t)?;
                }
                if !(stiffness.is_finite() && *stiffness >= 0.0) {
                    return Err(BackdropError::config(
                        "network.motion.stiffness",
                        "must not be negative",
                    ));
                }
                if !(*damping > 0.0 && *damping <= 1.0) {
                    return Err(BackdropError::config(
                        "network.motion.damping",
                        "must be in (0, 1]",
                    ));
                }
            }
        }

        let pulse = &n.pulse;
        for v in [
            pulse.link_base,
            pulse.link_amplitude,
            pulse.link_time_frequency,
            pulse.link_length_frequency,
            pulse.node_base,
            pulse.node_amplitude,
            pulse.node_time_frequency,
            pulse.node_x_frequency,
        ] {
            finite("network.pulse", v)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_is_valid() {
        BackdropConfig::default().validate().unwrap();
    }

    #[test]
    fn test_span_sample_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let span = Span::new(-0.3, 0.3);
        for _ in 0..1000 {
            let v = span.sample(&mut rng);
            assert!(v >= -0.3 && v < 0.3, "sampled {v}");
        }
        assert_eq!(Span::new(2.0, 2.0).sample(&mut rng), 2.0);
    }

    #[test]
    fn test_span_scaled() {
        assert_eq!(Span::new(0.25, 0.75).scaled(800.0), Span::new(200.0, 600.0));
    }

    #[test]
    fn test_validate_rejects_inverted_span() {
        let mut config = BackdropConfig::default();
        config.particles.speed_x = Span::new(0.6, 0.2);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("particles.speedX"));
    }

    #[test]
    fn test_validate_rejects_stalled_or_leftward_particles() {
        for speed_x in [Span::new(-0.6, -0.2), Span::new(0.0, 0.4), Span::new(-0.1, 0.5)] {
            let mut config = BackdropConfig::default();
            config.particles.speed_x = speed_x;
            let err = config.validate().unwrap_err();
            assert!(
                err.to_string().contains("particles.speedX"),
                "{speed_x:?} accepted"
            );
        }
    }

    #[test]
    fn test_span_contains() {
        let span = Span::new(0.2, 0.6);
        assert!(span.contains(0.2) && span.contains(0.6));
        assert!(!span.contains(0.1) && !span.contains(0.7));
    }

    #[test]
    fn test_validate_rejects_bad_network() {
        let mut config = BackdropConfig::default();
        config.network.max_speed = 0.0;
        assert!(config.validate().is_err());

        let mut config = BackdropConfig::default();
        config.network.categories = 0;
        assert!(config.validate().is_err());

        let mut config = BackdropConfig::default();
        config.network.topology = Topology::Proximity {
            link_distance: f32::NAN,
        };
        assert!(config.validate().is_err());

        let mut config = BackdropConfig::default();
        config.network.motion = NodeMotion::Spring {
            x: Span::new(0.1, 0.9),
            band_targets: vec![0.3],
            stiffness: 0.001,
            damping: 1.5,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "particles": { "count": 12 },
            "network": { "count": 5, "topology": { "kind": "layered" } },
            "duneStyle": { "kind": "fill" },
            "seed": 42
        }"#;
        let config: BackdropConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.particles.count, 12);
        assert_eq!(config.particles.speed_x, Span::new(0.2, 0.6));
        assert_eq!(config.network.count, 5);
        assert_eq!(config.network.topology, Topology::Layered);
        assert_eq!(config.dune_style, DuneStyle::Fill);
        assert_eq!(config.dunes.len(), 3);
        assert_eq!(config.seed, Some(42));
        config.validate().unwrap();
    }

    #[test]
    fn test_motion_json() {
        let json = r#"{
            "kind": "spring",
            "x": { "min": 0.1, "max": 0.9 },
            "bandTargets": [0.3, 0.5],
            "stiffness": 0.002,
            "damping": 0.96
        }"#;
        let motion: NodeMotion = serde_json::from_str(json).unwrap();
        match motion {
            NodeMotion::Spring { band_targets, .. } => assert_eq!(band_targets, vec![0.3, 0.5]),
            other => panic!("unexpected motion {other:?}"),
        }
    }
}
