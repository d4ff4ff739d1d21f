//! Particles and the node-link network.

use super::color::{ColorStop, Rgba};
use super::{Paint, RadialGradient, Surface};
use crate::config::{NetworkConfig, Palette, ParticleConfig, PulseConfig};
use crate::network::NetworkEngine;
use crate::particles::{particle_alpha, ParticleField};

/// Peak halo opacity relative to the node glow.
pub const HALO_ALPHA_SCALE: f32 = 0.35;

/// Opacity of a link of `length` pixels on `frame`.
#[inline]
pub fn link_alpha(frame: u64, length: f32, pulse: &PulseConfig) -> f32 {
    let t = frame as f32;
    let a = pulse.link_base
        + pulse.link_amplitude
            * (t * pulse.link_time_frequency + length * pulse.link_length_frequency).sin();
    a.clamp(0.0, 1.0)
}

/// Brightness of a node at horizontal position `x` on `frame`.
#[inline]
pub fn node_glow(frame: u64, x: f32, pulse: &PulseConfig) -> f32 {
    let t = frame as f32;
    let g = pulse.node_base
        + pulse.node_amplitude * (t * pulse.node_time_frequency + x * pulse.node_x_frequency).sin();
    g.clamp(0.0, 1.0)
}

/// Draw every particle as a disc under the configured blend mode.
///
/// The twinkle alpha scales `color`'s own alpha, so a translucent palette
/// entry caps the particle brightness.
///
/// The blend mode is scoped by `save`/`restore`, so later layers draw with
/// whatever mode was active before.
pub fn draw_particles<S: Surface>(
    surface: &mut S,
    field: &ParticleField,
    config: &ParticleConfig,
    color: Rgba,
) {
    surface.save();
    surface.set_composite(config.blend);
    for p in field.particles() {
        let paint = Paint::Solid(color.scale_alpha(particle_alpha(p.life, config)));
        surface.fill_circle((p.x, p.y), p.radius, &paint);
    }
    surface.restore();
}

/// Draw links first, then a halo and a disc per node on top of them.
pub fn draw_network<S: Surface>(
    surface: &mut S,
    network: &NetworkEngine,
    config: &NetworkConfig,
    palette: &Palette,
    frame: u64,
) {
    for link in network.links() {
        let (Some(from), Some(to)) = (network.position(link.a), network.position(link.b)) else {
            continue;
        };
        let alpha = link_alpha(frame, network.link_length(&link), &config.pulse);
        surface.line(from, to, palette.link.scale_alpha(alpha), config.link_width);
    }

    let xs = network.positions_x();
    let ys = network.positions_y();
    for (&x, &y) in xs.iter().zip(ys) {
        let glow = node_glow(frame, x, &config.pulse);

        let halo = Paint::Radial(RadialGradient {
            center: (x, y),
            inner_radius: 0.0,
            outer_radius: config.halo_radius,
            stops: vec![
                ColorStop::new(0.0, palette.halo.scale_alpha(glow * HALO_ALPHA_SCALE)),
                ColorStop::new(1.0, Rgba::TRANSPARENT),
            ],
        });
        surface.fill_circle((x, y), config.halo_radius, &halo);
        surface.fill_circle(
            (x, y),
            config.node_radius,
            &Paint::Solid(palette.node.scale_alpha(glow)),
        );
    }
}
