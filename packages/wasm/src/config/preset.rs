//! Built-in skins.
//!
//! The three hero backdrops share one renderer and differ only in palette,
//! counts, dune style, topology and node motion.

use serde::{Deserialize, Serialize};

use super::{
    BackdropConfig, DuneLayer, DuneStyle, NetworkConfig, NodeMotion, Palette, ParticleConfig,
    Span, Topology,
};
use crate::render::color::{ColorStop, Rgba};

/// Named starting points for a [`BackdropConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    /// Warm desert dusk with white contour dunes and a proximity graph.
    #[default]
    Dryland,
    /// Deep violet evening, filled dunes, nodes settling into three bands.
    Dusk,
    /// Teal water tones, contour dunes, two bands of proximity-linked nodes.
    Oasis,
}

impl Preset {
    pub const ALL: &'static [Preset] = &[Preset::Dryland, Preset::Dusk, Preset::Oasis];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Dryland => "Dryland",
            Preset::Dusk => "Dusk",
            Preset::Oasis => "Oasis",
        }
    }

    /// Full configuration for this skin.
    pub fn config(self) -> BackdropConfig {
        match self {
            Preset::Dryland => BackdropConfig::default(),
            Preset::Dusk => dusk(),
            Preset::Oasis => oasis(),
        }
    }
}

fn dusk() -> BackdropConfig {
    BackdropConfig {
        palette: Palette {
            background: vec![
                ColorStop::new(0.0, Rgba::rgb(0x2b, 0x14, 0x3a)),
                ColorStop::new(0.4, Rgba::rgb(0x7a, 0x35, 0x4a)),
                ColorStop::new(0.75, Rgba::rgb(0x23, 0x1b, 0x3d)),
                ColorStop::new(1.0, Rgba::rgb(0x0c, 0x0a, 0x14)),
            ],
            haze: Rgba::new(255, 190, 150, 0.1),
            haze_center: (0.5, 0.35),
            haze_radius: 0.55,
            particle: Rgba::rgb(255, 224, 196),
            link: Rgba::rgb(255, 170, 140),
            node: Rgba::rgb(255, 228, 210),
            halo: Rgba::rgb(255, 120, 110),
        },
        dunes: vec![
            DuneLayer::new(35.0, 0.03, 0.7, Rgba::new(58, 26, 48, 0.55)),
            DuneLayer::new(55.0, 0.02, 0.78, Rgba::new(40, 18, 36, 0.7)),
            DuneLayer::new(80.0, 0.012, 0.86, Rgba::new(20, 10, 22, 0.85)),
        ],
        dune_style: DuneStyle::Fill,
        particles: ParticleConfig {
            count: 120,
            speed_x: Span::new(0.15, 0.45),
            blend: crate::render::CompositeMode::Screen,
            ..ParticleConfig::default()
        },
        network: NetworkConfig {
            count: 30,
            spawn_x: Span::new(0.15, 0.85),
            spawn_y: Span::new(0.2, 0.6),
            topology: Topology::Layered,
            motion: NodeMotion::Spring {
                x: Span::new(0.1, 0.9),
                band_targets: vec![0.25, 0.4, 0.55],
                stiffness: 0.0015,
                damping: 0.97,
            },
            categories: 3,
            ..NetworkConfig::default()
        },
        seed: None,
    }
}

fn oasis() -> BackdropConfig {
    BackdropConfig {
        palette: Palette {
            background: vec![
                ColorStop::new(0.0, Rgba::rgb(0x0d, 0x2b, 0x33)),
                ColorStop::new(0.35, Rgba::rgb(0x1d, 0x55, 0x5a)),
                ColorStop::new(0.7, Rgba::rgb(0x14, 0x24, 0x3b)),
                ColorStop::new(1.0, Rgba::rgb(0x06, 0x0d, 0x12)),
            ],
            haze: Rgba::new(200, 255, 245, 0.07),
            haze_center: (0.5, 0.45),
            haze_radius: 0.65,
            particle: Rgba::rgb(220, 255, 250),
            link: Rgba::rgb(150, 235, 225),
            node: Rgba::rgb(225, 255, 250),
            halo: Rgba::rgb(90, 220, 200),
        },
        dunes: vec![
            DuneLayer::new(30.0, 0.035, 0.68, Rgba::new(200, 255, 245, 0.07)),
            DuneLayer::new(50.0, 0.022, 0.76, Rgba::new(200, 255, 245, 0.05)),
            DuneLayer::new(75.0, 0.014, 0.84, Rgba::new(200, 255, 245, 0.035)),
        ],
        dune_style: DuneStyle::Stroke { line_width: 1.5 },
        particles: ParticleConfig {
            count: 70,
            ..ParticleConfig::default()
        },
        network: NetworkConfig {
            count: 18,
            topology: Topology::Proximity {
                link_distance: 180.0,
            },
            motion: NodeMotion::Spring {
                x: Span::new(0.2, 0.8),
                band_targets: vec![0.3, 0.5],
                stiffness: 0.001,
                damping: 0.98,
            },
            categories: 2,
            ..NetworkConfig::default()
        },
        seed: None,
    }
}
