//! Off-screen raster that resolves pointer positions to shape indices.

use kurbo::Point;

use super::{color_to_index, PickRegistry};
use crate::raster::Raster;
use crate::shapes::{PickShape, Rgb8};
use crate::viewport::ViewportTransform;

/// Block edge for mode sampling, in buffer pixels.
const SAMPLE_BLOCK: i64 = 4;

/// The hidden pick raster plus its sampling logic.
///
/// The raster always matches the transform's buffer size, so positions that
/// land on the visible label layer land on the same pixels here.
#[derive(Debug, Clone)]
pub struct OffscreenPickSurface {
    raster: Raster,
}

impl Default for OffscreenPickSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl OffscreenPickSurface {
    pub fn new() -> Self {
        Self {
            raster: Raster::new(0, 0),
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Redraw the surface from the registry, resizing the raster to the
    /// transform's current buffer dimensions first.
    pub fn render(&mut self, registry: &PickRegistry, transform: &ViewportTransform) {
        let (width, height) = transform.buffer_size();
        if width != self.raster.width() || height != self.raster.height() {
            self.raster.resize(width, height);
        }
        registry.render(&mut self.raster, transform);
    }

    /// Resolve an image-space position to the pick index drawn there.
    ///
    /// The buffer covers only the image area, so the mapping is the linear
    /// (non-affine) image → buffer scale. Samples a 4x4 block and takes the
    /// most frequent color, which keeps a single stray pixel from flipping
    /// the result. Ties go to the shape rather than the background. Returns
    /// `None` over empty space.
    pub fn sample_index(&self, image_point: Point, transform: &ViewportTransform) -> Option<usize> {
        let buffer = transform.to_canvas(image_point, false);
        let x = buffer.x.floor() as i64;
        let y = buffer.y.floor() as i64;
        color_to_index(Rgb8::from_packed(self.block_mode(x, y)))
    }

    /// Resolve an image-space position straight to the registered shape.
    pub fn pick<'a>(
        &self,
        registry: &'a PickRegistry,
        image_point: Point,
        transform: &ViewportTransform,
    ) -> Option<&'a PickShape> {
        self.sample_index(image_point, transform)
            .and_then(|index| registry.get(index))
    }

    fn block_mode(&self, x: i64, y: i64) -> u32 {
        let mut counts: Vec<(u32, u32)> = Vec::with_capacity(16);
        for dy in 0..SAMPLE_BLOCK {
            for dx in 0..SAMPLE_BLOCK {
                let value = self.raster.get(x + dx, y + dy);
                match counts.iter_mut().find(|(v, _)| *v == value) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((value, 1)),
                }
            }
        }
        counts
            .into_iter()
            .max_by_key(|&(value, count)| (count, value))
            .map(|(value, _)| value)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::RectShape;
    use kurbo::{Rect, Size};

    fn setup() -> (OffscreenPickSurface, PickRegistry, ViewportTransform) {
        let transform =
            ViewportTransform::new(Size::new(100.0, 100.0), Size::new(100.0, 100.0)).unwrap();
        let mut registry = PickRegistry::new();
        registry.register(PickShape::Rect(RectShape::new(Rect::new(
            10.0, 10.0, 30.0, 20.0,
        ))));
        let mut surface = OffscreenPickSurface::new();
        surface.render(&registry, &transform);
        (surface, registry, transform)
    }

    #[test]
    fn test_sample_hit_and_miss() {
        let (surface, registry, transform) = setup();
        assert_eq!(surface.sample_index(Point::new(20.0, 15.0), &transform), Some(0));
        assert_eq!(surface.sample_index(Point::new(80.0, 80.0), &transform), None);
        assert!(surface.pick(&registry, Point::new(20.0, 15.0), &transform).is_some());
    }

    #[test]
    fn test_mode_rejects_minority_sliver() {
        let (surface, _, transform) = setup();
        // Block at buffer (18, 18): only 4 of 16 pixels are inside the rect.
        assert_eq!(surface.sample_index(Point::new(9.0, 9.0), &transform), None);
    }

    #[test]
    fn test_mode_tie_prefers_shape() {
        let (surface, _, transform) = setup();
        // Block at buffer (38, 38): 8 rect pixels vs 8 background pixels.
        assert_eq!(surface.sample_index(Point::new(19.0, 19.0), &transform), Some(0));
    }

    #[test]
    fn test_topmost_shape_wins_overlap() {
        let transform =
            ViewportTransform::new(Size::new(100.0, 100.0), Size::new(100.0, 100.0)).unwrap();
        let mut registry = PickRegistry::new();
        registry.register(PickShape::Rect(RectShape::new(Rect::new(
            10.0, 10.0, 50.0, 50.0,
        ))));
        registry.register(PickShape::Rect(RectShape::new(Rect::new(
            20.0, 20.0, 40.0, 40.0,
        ))));
        let mut surface = OffscreenPickSurface::new();
        surface.render(&registry, &transform);
        assert_eq!(surface.sample_index(Point::new(30.0, 30.0), &transform), Some(1));
        assert_eq!(surface.sample_index(Point::new(12.0, 30.0), &transform), Some(0));
    }

    #[test]
    fn test_render_tracks_buffer_size() {
        let (mut surface, registry, mut transform) = setup();
        assert_eq!(surface.raster().width(), 200);
        transform.set_scale(2.0, None);
        surface.render(&registry, &transform);
        assert_eq!(surface.raster().width(), 400);
    }
}
