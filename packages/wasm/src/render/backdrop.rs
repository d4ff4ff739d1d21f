//! Background gradients and dune ribbons.
//!
//! Both are pure functions of the viewport, the palette/layer parameters and
//! the frame counter; nothing here holds state between frames.

use super::color::{ColorStop, Rgba};
use super::{LinearGradient, Paint, Point, RadialGradient, Rect, Surface};
use crate::config::{DuneLayer, DuneStyle, Palette};
use crate::viewport::Viewport;

/// Horizontal distance between dune samples, in pixels.
pub const DUNE_SAMPLE_STEP: f32 = 6.0;

/// Repaint the whole viewport: a diagonal linear gradient, then a radial haze
/// that brightens the upper center.
pub fn paint_background<S: Surface>(surface: &mut S, palette: &Palette, viewport: &Viewport) {
    let (w, h) = (viewport.width, viewport.height);
    let full = Rect::covering(viewport);

    let base = if palette.background.is_empty() {
        Paint::Solid(Rgba::rgb(0, 0, 0))
    } else {
        Paint::Linear(LinearGradient {
            start: (0.0, 0.0),
            end: (w, h),
            stops: palette.background.clone(),
        })
    };
    surface.fill_rect(full, &base);

    let center = (w * palette.haze_center.0, h * palette.haze_center.1);
    let haze = Paint::Radial(RadialGradient {
        center,
        inner_radius: 0.0,
        outer_radius: w * palette.haze_radius,
        stops: vec![
            ColorStop::new(0.0, palette.haze),
            ColorStop::new(1.0, Rgba::TRANSPARENT),
        ],
    });
    surface.fill_rect(full, &haze);
}

/// Height of dune layer `index` at column `x` on `frame`.
///
/// Sum of a short sine wave and a long cosine swell travelling in opposite
/// directions; the layer index offsets both phases so ribbons never align.
#[inline]
pub fn dune_height(layer: &DuneLayer, index: usize, x: f32, frame: u64, height: f32) -> f32 {
    let t = frame as f32;
    let i = index as f32;
    let base = height * layer.offset_y;
    base + (x * 0.01 + t * layer.speed * 2.0 + i * 1.3).sin() * layer.amplitude * 0.4
        + (x * 0.003 - t * layer.speed * 1.5 + i).cos() * layer.amplitude * 0.6
}

/// Sample a layer every [`DUNE_SAMPLE_STEP`] pixels from `x = 0` to `x = width`.
pub fn dune_profile(layer: &DuneLayer, index: usize, frame: u64, viewport: &Viewport) -> Vec<Point> {
    let steps = (viewport.width / DUNE_SAMPLE_STEP).floor() as usize;
    (0..=steps)
        .map(|k| {
            let x = k as f32 * DUNE_SAMPLE_STEP;
            (x, dune_height(layer, index, x, frame, viewport.height))
        })
        .collect()
}

/// Draw every dune layer, back to front in config order.
pub fn paint_dunes<S: Surface>(
    surface: &mut S,
    layers: &[DuneLayer],
    style: DuneStyle,
    viewport: &Viewport,
    frame: u64,
) {
    for (index, layer) in layers.iter().enumerate() {
        let mut points = dune_profile(layer, index, frame, viewport);
        match style {
            DuneStyle::Stroke { line_width } => {
                surface.stroke_path(&points, layer.color, line_width);
            }
            DuneStyle::Fill => {
                let right = points.last().map(|p| p.0).unwrap_or(0.0);
                points.push((right, viewport.height));
                points.push((0.0, viewport.height));
                surface.fill_path(&points, &Paint::Solid(layer.color));
            }
        }
    }
}
