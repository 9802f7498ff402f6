//! Visible rendering area in CSS pixels.

use glam::Vec2;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Build from the `f64` sizes the browser reports, rounding down but never
    /// below one pixel on either axis.
    pub fn from_inner_size(width: f64, height: f64) -> Self {
        Self {
            width: (width.max(1.0)) as u32,
            height: (height.max(1.0)) as u32,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Drawing-buffer size for the given device pixel ratio.
    pub fn drawing_buffer(&self, pixel_ratio: f32) -> (u32, u32) {
        let w = (self.width as f32 * pixel_ratio).floor().max(1.0) as u32;
        let h = (self.height as f32 * pixel_ratio).floor().max(1.0) as u32;
        (w, h)
    }

    /// Resolution uniform for screen-space effects, kept fractional per axis.
    pub fn resolution(&self, pixel_ratio: f32) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * pixel_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_axes() {
        assert!(matches!(
            Viewport::new(0, 600),
            Err(Error::EmptyViewport { width: 0, height: 600 })
        ));
        assert!(Viewport::new(800, 0).is_err());
    }

    #[test]
    fn aspect_and_sizes() {
        let vp = Viewport::new(800, 600).unwrap();
        assert!((vp.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(vp.drawing_buffer(2.0), (1600, 1200));
        assert_eq!(vp.resolution(1.5), Vec2::new(1200.0, 900.0));
    }

    #[test]
    fn inner_size_is_clamped() {
        let vp = Viewport::from_inner_size(0.0, 412.7);
        assert_eq!((vp.width(), vp.height()), (1, 412));
    }
}
