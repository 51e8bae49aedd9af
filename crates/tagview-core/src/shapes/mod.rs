//! Pickable shape primitives.
//!
//! Every shape can draw itself twice: once onto the visible label layer in
//! its owning label's style, and once onto the off-screen pick surface in
//! an exact solid color chosen by the registry. Identity is a stable
//! [`ShapeId`]; labels keep the same ids across frames so picking results
//! stay meaningful after a registry rebuild.

mod edge;
mod polygon;
mod rectangle;
mod vertex;

pub use edge::EdgeShape;
pub use polygon::PolygonShape;
pub use rectangle::RectShape;
pub use vertex::VertexShape;

use kurbo::{Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::raster::Raster;
use crate::viewport::ViewportTransform;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Opaque RGB color (the raster has no alpha channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Pack into the raster's `0x00RRGGBB` pixel format.
    pub fn packed(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    pub fn from_packed(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }
}

impl From<Color> for Rgb8 {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
        }
    }
}

impl From<Rgb8> for Color {
    fn from(color: Rgb8) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, 255)
    }
}

/// Style properties for visible-layer rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke: Rgb8,
    /// Stroke width in image pixels.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill: Option<Rgb8>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: Rgb8::black(),
            stroke_width: 2.0,
            fill: None,
        }
    }
}

/// Common capability set for pickable primitives.
pub trait Pickable {
    /// Stable identity.
    fn id(&self) -> ShapeId;

    /// Draw onto the pick surface in exactly `color`, ignoring style.
    fn render_solid(&self, raster: &mut Raster, transform: &ViewportTransform, color: Rgb8);

    /// Draw onto the visible layer with the given style.
    fn render_styled(&self, raster: &mut Raster, transform: &ViewportTransform, style: &ShapeStyle);

    /// Geometric membership test in image coordinates.
    fn contains(&self, point: Point) -> bool;
}

/// Closed enum over the pickable primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PickShape {
    Rect(RectShape),
    Polygon(PolygonShape),
    Vertex(VertexShape),
    Edge(EdgeShape),
}

impl PickShape {
    pub fn id(&self) -> ShapeId {
        match self {
            PickShape::Rect(s) => s.id(),
            PickShape::Polygon(s) => s.id(),
            PickShape::Vertex(s) => s.id(),
            PickShape::Edge(s) => s.id(),
        }
    }

    pub fn render_solid(&self, raster: &mut Raster, transform: &ViewportTransform, color: Rgb8) {
        match self {
            PickShape::Rect(s) => s.render_solid(raster, transform, color),
            PickShape::Polygon(s) => s.render_solid(raster, transform, color),
            PickShape::Vertex(s) => s.render_solid(raster, transform, color),
            PickShape::Edge(s) => s.render_solid(raster, transform, color),
        }
    }

    pub fn render_styled(
        &self,
        raster: &mut Raster,
        transform: &ViewportTransform,
        style: &ShapeStyle,
    ) {
        match self {
            PickShape::Rect(s) => s.render_styled(raster, transform, style),
            PickShape::Polygon(s) => s.render_styled(raster, transform, style),
            PickShape::Vertex(s) => s.render_styled(raster, transform, style),
            PickShape::Edge(s) => s.render_styled(raster, transform, style),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        match self {
            PickShape::Rect(s) => s.contains(point),
            PickShape::Polygon(s) => s.contains(point),
            PickShape::Vertex(s) => s.contains(point),
            PickShape::Edge(s) => s.contains(point),
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb8_pack_round_trip() {
        let color = Rgb8::new(0x12, 0x34, 0x56);
        assert_eq!(color.packed(), 0x123456);
        assert_eq!(Rgb8::from_packed(0x123456), color);
    }

    #[test]
    fn test_rgb8_peniko_conversion() {
        let color = Rgb8::new(10, 20, 30);
        let peniko: Color = color.into();
        assert_eq!(Rgb8::from(peniko), color);
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        assert!((point_to_segment_dist(Point::new(-4.0, 0.0), a, b) - 4.0).abs() < 1e-9);
        // Degenerate segment falls back to point distance.
        assert!((point_to_segment_dist(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-9);
    }
}
