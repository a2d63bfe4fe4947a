//! Color strategies for surface faces

/// RGBA color type
pub type TerrainColor = [f32; 4];

/// Build an opaque gray from a value in `[0, 1]`
#[inline]
pub fn gray(value: f32) -> TerrainColor {
    let v = value.clamp(0.0, 1.0);
    [v, v, v, 1.0]
}

/// Trait for computing a surface color from elevation and position
///
/// Implementations must be pure: the same inputs always yield the same color.
pub trait ColorClassifier {
    /// Color for terrain of `height` at planar position `(x, y)`
    fn color(&self, height: f32, x: f32, y: f32) -> TerrainColor;
}

/// Grayscale by height relative to a maximum
#[derive(Debug, Clone, Copy)]
pub struct GrayscaleClassifier {
    /// Height rendered as white
    pub max_height: f32,
}

impl Default for GrayscaleClassifier {
    fn default() -> Self {
        Self { max_height: 1.0 }
    }
}

impl ColorClassifier for GrayscaleClassifier {
    fn color(&self, height: f32, _x: f32, _y: f32) -> TerrainColor {
        if self.max_height > 0.0 {
            gray(height / self.max_height)
        } else {
            gray(0.0)
        }
    }
}

/// Same color everywhere
#[derive(Debug, Clone, Copy)]
pub struct UniformColor(pub TerrainColor);

impl ColorClassifier for UniformColor {
    fn color(&self, _height: f32, _x: f32, _y: f32) -> TerrainColor {
        self.0
    }
}
