//! Headless surface that records draw calls.
//!
//! Used to drive the animation without a browser: tests inspect the command
//! list, and hosts that only need geometry can replay it elsewhere.

use super::color::Rgba;
use super::{CompositeMode, Paint, Point, Rect, Surface};
use crate::viewport::Viewport;

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Configure(Viewport),
    FillRect(Rect, Paint),
    FillPath(Vec<Point>, Paint),
    StrokePath(Vec<Point>, Rgba, f32),
    Line(Point, Point, Rgba, f32),
    FillCircle(Point, f32, Paint),
    Composite(CompositeMode),
    Save,
    Restore,
}

/// A [`Surface`] that appends every call to a command list.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
    composite: CompositeMode,
    saved: Vec<CompositeMode>,
}

impl RecordingSurface {
    /// Create a surface reporting `viewport` as its display size.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
            composite: CompositeMode::SourceOver,
            saved: Vec::new(),
        }
    }

    /// Change the reported display size, as a browser resize would.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands, keeping the viewport.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Current composite mode after save/restore bookkeeping.
    pub fn composite(&self) -> CompositeMode {
        self.composite
    }

    /// Depth of unmatched `save` calls.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Whether every recorded coordinate, radius and width is finite.
    pub fn all_finite(&self) -> bool {
        let pt = |p: &Point| p.0.is_finite() && p.1.is_finite();
        let paint_ok = |paint: &Paint| match paint {
            Paint::Solid(c) => c.a.is_finite(),
            Paint::Linear(g) => pt(&g.start) && pt(&g.end),
            Paint::Radial(g) => {
                pt(&g.center) && g.inner_radius.is_finite() && g.outer_radius.is_finite()
            }
        };
        self.commands.iter().all(|cmd| match cmd {
            DrawCommand::Configure(vp) => vp.width.is_finite() && vp.height.is_finite(),
            DrawCommand::FillRect(r, paint) => {
                r.x.is_finite()
                    && r.y.is_finite()
                    && r.width.is_finite()
                    && r.height.is_finite()
                    && paint_ok(paint)
            }
            DrawCommand::FillPath(points, paint) => points.iter().all(pt) && paint_ok(paint),
            DrawCommand::StrokePath(points, _, w) => points.iter().all(pt) && w.is_finite(),
            DrawCommand::Line(a, b, _, w) => pt(a) && pt(b) && w.is_finite(),
            DrawCommand::FillCircle(c, r, paint) => pt(c) && r.is_finite() && paint_ok(paint),
            DrawCommand::Composite(_) | DrawCommand::Save | DrawCommand::Restore => true,
        })
    }

    /// Count commands matching a predicate.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn configure(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
        self.composite = CompositeMode::SourceOver;
        self.saved.clear();
        self.commands.push(DrawCommand::Configure(*viewport));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect(rect, paint.clone()));
    }

    fn fill_path(&mut self, points: &[Point], paint: &Paint) {
        self.commands
            .push(DrawCommand::FillPath(points.to_vec(), paint.clone()));
    }

    fn stroke_path(&mut self, points: &[Point], color: Rgba, width: f32) {
        self.commands
            .push(DrawCommand::StrokePath(points.to_vec(), color, width));
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Line(from, to, color, width));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        self.commands
            .push(DrawCommand::FillCircle(center, radius, paint.clone()));
    }

    fn set_composite(&mut self, mode: CompositeMode) {
        self.composite = mode;
        self.commands.push(DrawCommand::Composite(mode));
    }

    fn save(&mut self) {
        self.saved.push(self.composite);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(mode) = self.saved.pop() {
            self.composite = mode;
        }
        self.commands.push(DrawCommand::Restore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_restore_tracks_composite() {
        let mut surface = RecordingSurface::new(Viewport::default());
        surface.save();
        surface.set_composite(CompositeMode::Lighter);
        assert_eq!(surface.composite(), CompositeMode::Lighter);
        surface.restore();
        assert_eq!(surface.composite(), CompositeMode::SourceOver);
        assert_eq!(surface.save_depth(), 0);
        assert_eq!(surface.commands().len(), 3);
    }

    #[test]
    fn test_all_finite_flags_nan() {
        let mut surface = RecordingSurface::new(Viewport::default());
        surface.line((0.0, 0.0), (1.0, 1.0), Rgba::WHITE, 1.0);
        assert!(surface.all_finite());
        surface.fill_circle((f32::NAN, 0.0), 1.0, &Paint::Solid(Rgba::WHITE));
        assert!(!surface.all_finite());
    }
}
