//! Circular control handle.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Pickable, Rgb8, ShapeId, ShapeStyle};
use crate::raster::Raster;
use crate::viewport::ViewportTransform;

/// Default handle radius in image pixels.
pub const VERTEX_RADIUS: f64 = 6.0;

/// A draggable control point, drawn as a solid disc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexShape {
    pub(crate) id: ShapeId,
    pub center: Point,
    /// Radius in image pixels.
    pub radius: f64,
}

impl VertexShape {
    pub fn new(center: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            radius: VERTEX_RADIUS,
        }
    }

    pub fn with_id(id: ShapeId, center: Point) -> Self {
        Self {
            id,
            center,
            radius: VERTEX_RADIUS,
        }
    }
}

impl Pickable for VertexShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn render_solid(&self, raster: &mut Raster, transform: &ViewportTransform, color: Rgb8) {
        let center = transform.to_canvas(self.center, false);
        let radius = transform.to_canvas_scalar(self.radius);
        raster.fill_circle(center, radius, color.packed());
    }

    fn render_styled(&self, raster: &mut Raster, transform: &ViewportTransform, style: &ShapeStyle) {
        let center = transform.to_canvas(self.center, false);
        let radius = transform.to_canvas_scalar(self.radius);
        let fill = style.fill.unwrap_or(Rgb8::white());
        raster.fill_circle(center, radius, fill.packed());
        raster.fill_circle(center, (radius - 2.0).max(1.0), style.stroke.packed());
    }

    fn contains(&self, point: Point) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    #[test]
    fn test_contains_within_radius() {
        let vertex = VertexShape::new(Point::new(10.0, 10.0));
        assert!(vertex.contains(Point::new(10.0, 10.0)));
        assert!(vertex.contains(Point::new(10.0, 10.0 + VERTEX_RADIUS)));
        assert!(!vertex.contains(Point::new(10.0, 10.0 + VERTEX_RADIUS + 0.1)));
    }

    #[test]
    fn test_render_solid_scales_radius() {
        let transform =
            ViewportTransform::new(Size::new(100.0, 100.0), Size::new(100.0, 100.0)).unwrap();
        let (w, h) = transform.buffer_size();
        let mut raster = Raster::new(w, h);
        let vertex = VertexShape::new(Point::new(50.0, 50.0));
        vertex.render_solid(&mut raster, &transform, Rgb8::new(0, 0, 1));
        assert_eq!(raster.get(100, 100), 1);
        // 6 image px becomes 12 buffer px; just outside stays background.
        assert_eq!(raster.get(100, 114), 0);
    }
}
