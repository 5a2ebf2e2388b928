use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pixel extents of the render surface, used to normalise pointer deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Extents as floats, with zero dimensions treated as 1.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width.max(1) as f32, self.height.max(1) as f32)
    }

    /// Width over height, never dividing by zero.
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Linear RGBA colour. Hex literals are sRGB-encoded and are decoded to
/// linear on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLACK: Color = Color([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Opaque colour from a `0xRRGGBB` sRGB literal.
    pub fn hex(rgb: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((rgb >> shift) & 0xff) as f32 / 255.0);
        Self([channel(16), channel(8), channel(0), 1.0])
    }

    pub fn rgb(&self) -> [f32; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }
}

/// Standard sRGB transfer function, inverted.
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else if c >= 1.0 {
        1.0
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_decodes_channels() {
        let c = Color::hex(0xff8000);
        assert_eq!(c.0[0], 1.0);
        assert!((c.0[1] - 0.2158605).abs() < 1e-5);
        assert_eq!(c.0[2], 0.0);
        assert_eq!(c.0[3], 1.0);
    }

    #[test]
    fn hex_is_decoded_to_linear() {
        let grey = Color::hex(0x808080);
        assert!(grey.0[0] < 128.0 / 255.0);
        assert!((Color::hex(0x0a0a0a).0[0] - (10.0 / 255.0) / 12.92).abs() < 1e-7);
        assert_eq!(Color::hex(0xffffff).rgb(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::hex(0x00ff00).with_alpha(0.5);
        assert_eq!(c.rgb(), [0.0, 1.0, 0.0]);
        assert_eq!(c.0[3], 0.5);
    }

    #[test]
    fn zero_surface_is_safe() {
        let s = SurfaceSize::new(0, 0);
        assert_eq!(s.extent(), Vec2::ONE);
        assert_eq!(s.aspect(), 1.0);
    }

    #[test]
    fn surface_aspect() {
        let s = SurfaceSize::new(800, 600);
        assert!((s.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }
}
