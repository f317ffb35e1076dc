use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorRgb([f32; 3]);

/// 8-bit sRGB color with alpha, the canvas storage format.
pub type ColorRgba8 = [u8; 4];

impl ColorRgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    pub const fn r(&self) -> f32 {
        self.0[0]
    }

    pub const fn g(&self) -> f32 {
        self.0[1]
    }

    pub const fn b(&self) -> f32 {
        self.0[2]
    }

    pub fn into_srgb8(self) -> [u8; 3] {
        use palette::{LinSrgb, Srgb};
        assert!((0.0..=1.0).contains(&self.r()));
        assert!((0.0..=1.0).contains(&self.g()));
        assert!((0.0..=1.0).contains(&self.b()));
        let linear = LinSrgb::<f32>::new(self.r(), self.g(), self.b());
        let srgb = Srgb::<f32>::from_linear(linear);
        srgb.into_format().into()
    }

    pub fn into_srgba8(self) -> ColorRgba8 {
        let [r, g, b] = self.into_srgb8();
        [r, g, b, u8::MAX]
    }
}

pub fn lerp_color(a: &ColorRgb, b: &ColorRgb, t: f32) -> ColorRgb {
    ColorRgb::new(
        lerp_scalar(a.r(), b.r(), t),
        lerp_scalar(a.g(), b.g(), t),
        lerp_scalar(a.b(), b.b(), t),
    )
}
