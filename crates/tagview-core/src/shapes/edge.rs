//! Thick line segment, e.g. a polygon edge offered for midpoint insertion.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{point_to_segment_dist, Pickable, Rgb8, ShapeId, ShapeStyle};
use crate::raster::Raster;
use crate::viewport::ViewportTransform;

/// Default edge hit thickness in image pixels.
pub const EDGE_THICKNESS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeShape {
    pub(crate) id: ShapeId,
    pub start: Point,
    pub end: Point,
    /// Stroke thickness in image pixels.
    pub thickness: f64,
}

impl EdgeShape {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            thickness: EDGE_THICKNESS,
        }
    }

    pub fn with_id(id: ShapeId, start: Point, end: Point) -> Self {
        Self {
            id,
            start,
            end,
            thickness: EDGE_THICKNESS,
        }
    }
}

impl Pickable for EdgeShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn render_solid(&self, raster: &mut Raster, transform: &ViewportTransform, color: Rgb8) {
        raster.stroke_line(
            transform.to_canvas(self.start, false),
            transform.to_canvas(self.end, false),
            transform.to_canvas_scalar(self.thickness),
            color.packed(),
        );
    }

    fn render_styled(&self, raster: &mut Raster, transform: &ViewportTransform, style: &ShapeStyle) {
        raster.stroke_line(
            transform.to_canvas(self.start, false),
            transform.to_canvas(self.end, false),
            transform.to_canvas_scalar(style.stroke_width).max(1.0),
            style.stroke.packed(),
        );
    }

    fn contains(&self, point: Point) -> bool {
        point_to_segment_dist(point, self.start, self.end) <= self.thickness / 2.0
    }
}
