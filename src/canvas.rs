use super::*;

/// RGBA8 pixel buffer, row-major with the top row first.
///
/// [`Canvas::normalized_coordinates`] is the mapping camera rays are
/// generated against: row 0 maps to viewport `y = +1`.
#[derive(Clone)]
pub struct Canvas {
    buffer: imagelib::RgbaImage,
}

impl Canvas {
    #[inline]
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: imagelib::RgbaImage::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: ColorRgba8) -> Result<()> {
        ensure!(
            self.contains(x, y),
            "Pixel ({x}, {y}) is outside canvas {}x{}",
            self.width(),
            self.height()
        );
        self.buffer.put_pixel(x, y, imagelib::Rgba(color));
        Ok(())
    }

    pub fn fill(&mut self, color: ColorRgba8) {
        self.buffer
            .pixels_mut()
            .for_each(|pixel| *pixel = imagelib::Rgba(color));
    }

    pub fn pixel(&self, x: u32, y: u32) -> Result<ColorRgba8> {
        ensure!(
            self.contains(x, y),
            "Pixel ({x}, {y}) is outside canvas {}x{}",
            self.width(),
            self.height()
        );
        Ok(self.buffer.get_pixel(x, y).0)
    }

    /// Center of pixel `(x, y)` in viewport coordinates `[-1, 1]^2`.
    #[inline]
    pub fn normalized_coordinates(&self, x: u32, y: u32) -> Point2 {
        self.normalized_coordinates_at(x as f32 + 0.5, y as f32 + 0.5)
    }

    /// Continuous pixel position in viewport coordinates. `(0, 0)` is the
    /// top-left corner of the canvas and maps to `(-1, 1)`.
    pub fn normalized_coordinates_at(&self, x: f32, y: f32) -> Point2 {
        // Normalize 0..size -> 0..1.
        let px = x / self.width() as f32;
        let py = y / self.height() as f32;

        // Flip Y so the top row is +1.
        let py = 1.0 - py;

        // Scale 0..1 -> -1..1.
        Point2::new(2.0 * px - 1.0, 2.0 * py - 1.0)
    }

    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Encodes the canvas, format picked from the extension of `path`.
    pub fn export(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .with_context(|| format!("Failed to export canvas to {}", path.display()))?;
        info!("Wrote to {}", path.display());
        Ok(())
    }
}
