//! Axis-aligned rectangle region.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Pickable, Rgb8, ShapeId, ShapeStyle};
use crate::raster::Raster;
use crate::viewport::ViewportTransform;

/// A filled rectangular region, e.g. the body of a bounding-box label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    pub(crate) id: ShapeId,
    /// Region in image coordinates.
    pub rect: Rect,
}

impl RectShape {
    pub fn new(rect: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            rect,
        }
    }

    /// Rebuild with a caller-provided id so identity survives geometry
    /// updates between registry rebuilds.
    pub fn with_id(id: ShapeId, rect: Rect) -> Self {
        Self { id, rect }
    }

    fn canvas_rect(&self, transform: &ViewportTransform) -> Rect {
        // The drawing buffer covers the image area only, so the mapping is
        // the linear scale without the letterbox offset.
        let p0 = transform.to_canvas(Point::new(self.rect.x0, self.rect.y0), false);
        let p1 = transform.to_canvas(Point::new(self.rect.x1, self.rect.y1), false);
        Rect::new(p0.x, p0.y, p1.x, p1.y)
    }
}

impl Pickable for RectShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn render_solid(&self, raster: &mut Raster, transform: &ViewportTransform, color: Rgb8) {
        raster.fill_rect(self.canvas_rect(transform), color.packed());
    }

    fn render_styled(&self, raster: &mut Raster, transform: &ViewportTransform, style: &ShapeStyle) {
        let rect = self.canvas_rect(transform);
        if let Some(fill) = style.fill {
            raster.fill_rect(rect, fill.packed());
        }
        let width = transform.to_canvas_scalar(style.stroke_width).max(1.0);
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ];
        for i in 0..4 {
            raster.stroke_line(corners[i], corners[(i + 1) % 4], width, style.stroke.packed());
        }
    }

    fn contains(&self, point: Point) -> bool {
        self.rect.abs().contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn transform() -> ViewportTransform {
        ViewportTransform::new(Size::new(100.0, 100.0), Size::new(100.0, 100.0)).unwrap()
    }

    #[test]
    fn test_contains() {
        let shape = RectShape::new(Rect::new(10.0, 10.0, 30.0, 20.0));
        assert!(shape.contains(Point::new(15.0, 15.0)));
        assert!(!shape.contains(Point::new(35.0, 15.0)));
    }

    #[test]
    fn test_contains_normalizes_inverted_rect() {
        let shape = RectShape::new(Rect::new(30.0, 20.0, 10.0, 10.0));
        assert!(shape.contains(Point::new(15.0, 15.0)));
    }

    #[test]
    fn test_render_solid_paints_interior() {
        let transform = transform();
        let (w, h) = transform.buffer_size();
        let mut raster = Raster::new(w, h);
        let shape = RectShape::new(Rect::new(10.0, 10.0, 30.0, 20.0));
        shape.render_solid(&mut raster, &transform, Rgb8::new(0, 0, 5));
        // Image (20, 15) lands at buffer (40, 30) under the 2x super-sample.
        assert_eq!(raster.get(40, 30), 5);
        assert_eq!(raster.get(10, 10), 0);
    }

    #[test]
    fn test_with_id_preserves_identity() {
        let id = Uuid::new_v4();
        let a = RectShape::with_id(id, Rect::new(0.0, 0.0, 1.0, 1.0));
        let b = RectShape::with_id(id, Rect::new(5.0, 5.0, 9.0, 9.0));
        assert_eq!(a.id(), b.id());
    }
}
