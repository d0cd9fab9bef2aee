use crate::foundation::core::{Canvas, Point};

/// Equirectangular projection of (longitude, latitude) onto the canvas.
///
/// Longitude `[-180, 180]` maps linearly onto `x ∈ [0, width]`; latitude `[-90, 90]` maps onto
/// `y ∈ [height, 0]` (screen rows grow downwards). Inputs are not clamped: out-of-range degrees
/// land off-canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    width: f64,
    height: f64,
}

impl CoordinateMapper {
    /// Mapper for a canvas of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: f64::from(canvas.width),
            height: f64::from(canvas.height),
        }
    }

    /// Project degrees onto screen space.
    pub fn map(&self, longitude: f64, latitude: f64) -> Point {
        Point::new(
            (longitude + 180.0) / 360.0 * self.width,
            (90.0 - latitude) / 180.0 * self.height,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/mapper.rs"]
mod tests;
