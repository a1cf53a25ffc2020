//! Render surface geometry.
//!
//! The surface is the rectangle (in the same coordinate space as incoming
//! pointer events, usually CSS pixels relative to the viewport) that displays
//! the remote host's frames.  Pointer events are validated against it and
//! re-expressed relative to its top-left corner.

/// Bounding rectangle of the render surface.
///
/// Coordinates are `f64` because browsers report fractional positions after
/// zooming or sub-pixel layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl SurfaceRect {
    /// Creates a rectangle from its four edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Width of the surface.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height of the surface.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Returns `true` if `(x, y)` lies strictly inside the rectangle.
    ///
    /// Points on an edge are outside.  NaN coordinates are always outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.left && x < self.right && y > self.top && y < self.bottom
    }

    /// Converts a client coordinate into surface-local wire units.
    ///
    /// The offset is truncated toward zero; values beyond the `i32` range
    /// saturate and NaN becomes 0.
    pub fn to_local(&self, x: f64, y: f64) -> (i32, i32) {
        ((x - self.left) as i32, (y - self.top) as i32)
    }
}

impl Default for SurfaceRect {
    /// A 1920×1080 surface at the origin.
    fn default() -> Self {
        Self::from_size(1920.0, 1080.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> SurfaceRect {
        SurfaceRect::new(100.0, 50.0, 900.0, 650.0)
    }

    #[test]
    fn test_contains_interior_point() {
        assert!(rect().contains(500.0, 300.0));
    }

    #[test]
    fn test_edges_are_outside() {
        let r = rect();
        assert!(!r.contains(100.0, 300.0));
        assert!(!r.contains(900.0, 300.0));
        assert!(!r.contains(500.0, 50.0));
        assert!(!r.contains(500.0, 650.0));
    }

    #[test]
    fn test_points_beyond_edges_are_outside() {
        let r = rect();
        assert!(!r.contains(99.0, 300.0));
        assert!(!r.contains(500.0, 651.0));
        assert!(!r.contains(-1.0, -1.0));
    }

    #[test]
    fn test_nan_is_outside() {
        assert!(!rect().contains(f64::NAN, 300.0));
    }

    #[test]
    fn test_to_local_subtracts_top_left() {
        assert_eq!(rect().to_local(150.0, 80.0), (50, 30));
    }

    #[test]
    fn test_to_local_truncates_fractions_toward_zero() {
        let r = SurfaceRect::new(0.5, 0.5, 10.0, 10.0);
        assert_eq!(r.to_local(3.9, 0.2), (3, 0));
    }

    #[test]
    fn test_size() {
        let r = rect();
        assert_eq!(r.width(), 800.0);
        assert_eq!(r.height(), 600.0);
    }
}
