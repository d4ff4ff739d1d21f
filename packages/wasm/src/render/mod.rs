//! Drawing.
//!
//! The animation never talks to a canvas directly. It paints through the
//! [`Surface`] trait, which covers the handful of 2D-context capabilities the
//! backdrop needs: rectangles, polylines, discs, gradients and compositing.
//!
//! - `canvas`: browser implementation over `CanvasRenderingContext2d`
//! - `recording`: headless implementation that records draw commands
//! - `backdrop`: background gradients and dune ribbons
//! - `layers`: particles and the node-link network

pub mod backdrop;
pub mod canvas;
pub mod color;
pub mod layers;
pub mod recording;

use serde::{Deserialize, Serialize};

use crate::viewport::Viewport;
use color::{ColorStop, Rgba};

pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface};

/// A 2D point in CSS pixels.
pub type Point = (f32, f32);

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full viewport.
    pub fn covering(viewport: &Viewport) -> Self {
        Self::new(0.0, 0.0, viewport.width, viewport.height)
    }
}

/// Gradient along the line `start → end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<ColorStop>,
}

/// Gradient between two concentric circles.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

/// Fill source for shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Paint::Solid(color)
    }
}

/// How new pixels combine with what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositeMode {
    #[default]
    SourceOver,
    /// Additive blending.
    Lighter,
    Screen,
}

impl CompositeMode {
    /// Value for `globalCompositeOperation`.
    pub fn as_canvas_str(self) -> &'static str {
        match self {
            CompositeMode::SourceOver => "source-over",
            CompositeMode::Lighter => "lighter",
            CompositeMode::Screen => "screen",
        }
    }
}

/// The drawing capabilities the backdrop relies on.
///
/// Implementations treat every call as infallible; a backend that can fail
/// logs and carries on, since a dropped frame is invisible a moment later.
pub trait Surface {
    /// Current display-area size and pixel ratio.
    fn viewport(&self) -> Viewport;

    /// Resize the backing store for `viewport` and reset the transform so
    /// drawing happens in CSS pixels.
    fn configure(&mut self, viewport: &Viewport);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    /// Fill the closed polygon through `points`.
    fn fill_path(&mut self, points: &[Point], paint: &Paint);

    /// Stroke the open polyline through `points`.
    fn stroke_path(&mut self, points: &[Point], color: Rgba, width: f32);

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f32);

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);

    fn set_composite(&mut self, mode: CompositeMode);

    /// Push the drawing state (composite mode included).
    fn save(&mut self);

    /// Pop the drawing state pushed by the matching [`Surface::save`].
    fn restore(&mut self);
}
