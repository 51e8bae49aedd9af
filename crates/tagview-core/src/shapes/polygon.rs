//! Closed polygon region.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Pickable, Rgb8, ShapeId, ShapeStyle};
use crate::raster::Raster;
use crate::viewport::ViewportTransform;

/// A filled polygon given by its vertex loop in image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    pub(crate) id: ShapeId,
    pub points: Vec<Point>,
}

impl PolygonShape {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
        }
    }

    pub fn with_id(id: ShapeId, points: Vec<Point>) -> Self {
        Self { id, points }
    }

    fn canvas_points(&self, transform: &ViewportTransform) -> Vec<Point> {
        self.points
            .iter()
            .map(|p| transform.to_canvas(*p, false))
            .collect()
    }
}

impl Pickable for PolygonShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn render_solid(&self, raster: &mut Raster, transform: &ViewportTransform, color: Rgb8) {
        raster.fill_polygon(&self.canvas_points(transform), color.packed());
    }

    fn render_styled(&self, raster: &mut Raster, transform: &ViewportTransform, style: &ShapeStyle) {
        let points = self.canvas_points(transform);
        if let Some(fill) = style.fill {
            raster.fill_polygon(&points, fill.packed());
        }
        if points.len() >= 2 {
            let width = transform.to_canvas_scalar(style.stroke_width).max(1.0);
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                raster.stroke_line(a, b, width, style.stroke.packed());
            }
        }
    }

    fn contains(&self, point: Point) -> bool {
        // Even-odd ray cast, matching the raster's fill rule.
        let mut inside = false;
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            if (a.y <= point.y && b.y > point.y) || (b.y <= point.y && a.y > point.y) {
                let t = (point.y - a.y) / (b.y - a.y);
                if point.x < a.x + t * (b.x - a.x) {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_poly() -> PolygonShape {
        PolygonShape::new(vec![
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 30.0),
            Point::new(10.0, 30.0),
        ])
    }

    #[test]
    fn test_contains_inside_and_outside() {
        let poly = square_poly();
        assert!(poly.contains(Point::new(20.0, 20.0)));
        assert!(!poly.contains(Point::new(40.0, 20.0)));
        assert!(!poly.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let poly = PolygonShape::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert!(!poly.contains(Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_concave_polygon() {
        // An L shape: the notch must test outside.
        let poly = PolygonShape::new(vec![
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 20.0),
            Point::new(20.0, 20.0),
            Point::new(20.0, 40.0),
            Point::new(0.0, 40.0),
        ]);
        assert!(poly.contains(Point::new(10.0, 30.0)));
        assert!(poly.contains(Point::new(30.0, 10.0)));
        assert!(!poly.contains(Point::new(30.0, 30.0)));
    }
}
