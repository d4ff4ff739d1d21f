//! Browser surface backed by a `<canvas>` 2D context.

use std::f64::consts::TAU;

use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use super::color::{ColorStop, Rgba};
use super::{CompositeMode, Paint, Point, Rect, Surface};
use crate::error::{describe_js, BackdropError, Result};
use crate::viewport::Viewport;

/// A canvas element and its 2D rendering context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up `<canvas id="{id}">` in the current document.
    ///
    /// Fails when there is no window or document, the element is missing or
    /// not a canvas, or the browser refuses a 2D context.
    pub fn from_element_id(id: &str) -> Result<Self> {
        let window = web_sys::window().ok_or(BackdropError::NoWindow)?;
        let document = window.document().ok_or(BackdropError::NoDocument)?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| BackdropError::CanvasNotFound(id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| BackdropError::NotACanvas(id.to_string()))?;
        Self::from_canvas(canvas, id)
    }

    /// Wrap an existing canvas element. `label` only names it in errors.
    pub fn from_canvas(canvas: HtmlCanvasElement, label: &str) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| BackdropError::ContextUnavailable(label.to_string()))?;
        Ok(Self { canvas, ctx })
    }

    fn make_gradient(&self, paint: &Paint) -> Option<CanvasGradient> {
        let (gradient, stops) = match paint {
            Paint::Solid(_) => return None,
            Paint::Linear(g) => (
                self.ctx.create_linear_gradient(
                    g.start.0 as f64,
                    g.start.1 as f64,
                    g.end.0 as f64,
                    g.end.1 as f64,
                ),
                &g.stops,
            ),
            Paint::Radial(g) => {
                let gradient = self.ctx.create_radial_gradient(
                    g.center.0 as f64,
                    g.center.1 as f64,
                    g.inner_radius.max(0.0) as f64,
                    g.center.0 as f64,
                    g.center.1 as f64,
                    g.outer_radius.max(0.0) as f64,
                );
                match gradient {
                    Ok(gradient) => (gradient, &g.stops),
                    Err(e) => {
                        warn!(error = %describe_js(&e), "createRadialGradient failed");
                        return None;
                    }
                }
            }
        };
        add_stops(&gradient, stops);
        Some(gradient)
    }

    fn apply_fill(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            _ => match self.make_gradient(paint) {
                Some(gradient) => self.ctx.set_fill_style_canvas_gradient(&gradient),
                None => self.ctx.set_fill_style_str(&Rgba::TRANSPARENT.to_css()),
            },
        }
    }

    fn trace_polyline(&self, points: &[Point]) {
        self.ctx.begin_path();
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(x as f64, y as f64);
            } else {
                self.ctx.line_to(x as f64, y as f64);
            }
        }
    }
}

fn add_stops(gradient: &CanvasGradient, stops: &[ColorStop]) {
    for stop in stops {
        if let Err(e) = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css())
        {
            warn!(offset = stop.offset, error = %describe_js(&e), "addColorStop failed");
        }
    }
}

fn log_failure(op: &str, result: std::result::Result<(), JsValue>) {
    if let Err(e) = result {
        warn!(op, error = %describe_js(&e), "canvas call failed");
    }
}

impl Surface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        Viewport::new(
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
            dpr as f32,
        )
    }

    fn configure(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.backing_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        log_failure(
            "setTransform",
            self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
        );
        let dpr = viewport.dpr as f64;
        log_failure("scale", self.ctx.scale(dpr, dpr));
        debug!(width, height, dpr, "canvas configured");
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.apply_fill(paint);
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn fill_path(&mut self, points: &[Point], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        self.trace_polyline(points);
        self.ctx.close_path();
        self.apply_fill(paint);
        self.ctx.fill();
    }

    fn stroke_path(&mut self, points: &[Point], color: Rgba, width: f32) {
        if points.len() < 2 {
            return;
        }
        self.trace_polyline(points);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f32) {
        self.trace_polyline(&[from, to]);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        self.ctx.begin_path();
        log_failure(
            "arc",
            self.ctx
                .arc(center.0 as f64, center.1 as f64, radius.max(0.0) as f64, 0.0, TAU),
        );
        self.apply_fill(paint);
        self.ctx.fill();
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        log_failure(
            "globalCompositeOperation",
            self.ctx
                .set_global_composite_operation(mode.as_canvas_str()),
        );
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }
}
