//! Display-area dimensions.

/// Size of the drawing area in CSS pixels plus the device pixel ratio.
///
/// All simulation coordinates live in CSS pixels; the surface scales by
/// `dpr` so drawing stays sharp on high-density displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    /// Create a viewport, replacing unusable values.
    ///
    /// Negative or non-finite sizes collapse to 0 and a non-positive or
    /// non-finite pixel ratio falls back to 1.
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            width: sanitize(width),
            height: sanitize(height),
            dpr: if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    /// Size of the backing store in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).ceil() as u32,
            (self.height * self.dpr).ceil() as u32,
        )
    }

    /// Whether a point lies inside `[0, width) x [0, height)`.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x < self.width && y >= 0.0 && y < self.height
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        let vp = Viewport::new(-5.0, f32::NAN, 0.0);
        assert_eq!(vp.width, 0.0);
        assert_eq!(vp.height, 0.0);
        assert_eq!(vp.dpr, 1.0);
        assert!(vp.is_empty());
    }

    #[test]
    fn test_backing_size() {
        let vp = Viewport::new(801.0, 600.0, 1.5);
        assert_eq!(vp.backing_size(), (1202, 900));
    }

    #[test]
    fn test_contains_is_half_open() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        assert!(vp.contains(0.0, 0.0));
        assert!(vp.contains(799.9, 599.9));
        assert!(!vp.contains(800.0, 10.0));
        assert!(!vp.contains(10.0, -0.1));
    }
}
