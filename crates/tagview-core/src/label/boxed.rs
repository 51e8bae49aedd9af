//! Bounding-box label with four corner handles.

use kurbo::{Point, Rect};
use uuid::Uuid;

use super::{AttributeValue, CursorStyle, Label, LabelId, LabelTemplate};
use crate::raster::Raster;
use crate::shapes::{PickShape, Pickable, RectShape, ShapeId, ShapeStyle, VertexShape};
use crate::viewport::ViewportTransform;

/// Minimum usable edge length in image pixels; smaller boxes are treated
/// as accidental clicks and dropped.
pub const MIN_BOX_EDGE: f64 = 4.0;

/// Corner handles, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

const CORNERS: [Corner; 4] = [
    Corner::TopLeft,
    Corner::TopRight,
    Corner::BottomRight,
    Corner::BottomLeft,
];

#[derive(Debug, Clone, Copy)]
enum Drag {
    Move { anchor: Point, origin: Rect },
    Resize { corner: Corner },
}

/// Axis-aligned bounding-box annotation.
///
/// Dragging the body moves the whole box; dragging a corner handle resizes
/// it. A label created at a point starts as a zero-size seed, so the first
/// gesture after creation resizes from the bottom-right corner.
pub struct BoxLabel {
    id: LabelId,
    rect: Rect,
    category: String,
    attributes: Vec<(String, AttributeValue)>,
    style: ShapeStyle,
    body: ShapeId,
    corner_ids: [ShapeId; 4],
    drag: Option<Drag>,
}

impl BoxLabel {
    /// Seed a new box at a point from the active template.
    pub fn new(template: &LabelTemplate, point: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            rect: Rect::new(point.x, point.y, point.x, point.y),
            category: template.category.clone(),
            attributes: template.attributes.clone(),
            style: ShapeStyle::default(),
            body: Uuid::new_v4(),
            corner_ids: [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()],
            drag: None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn attributes(&self) -> &[(String, AttributeValue)] {
        &self.attributes
    }

    pub fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    fn corner_point(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.rect.x0, self.rect.y0),
            Corner::TopRight => Point::new(self.rect.x1, self.rect.y0),
            Corner::BottomRight => Point::new(self.rect.x1, self.rect.y1),
            Corner::BottomLeft => Point::new(self.rect.x0, self.rect.y1),
        }
    }

    fn corner_for_shape(&self, shape: ShapeId) -> Option<Corner> {
        self.corner_ids
            .iter()
            .position(|id| *id == shape)
            .map(|i| CORNERS[i])
    }

    fn is_seed(&self) -> bool {
        let r = self.rect.abs();
        r.width() < f64::EPSILON && r.height() < f64::EPSILON
    }
}

impl Label for BoxLabel {
    fn id(&self) -> LabelId {
        self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn default_pick_shapes(&self) -> Vec<PickShape> {
        vec![PickShape::Rect(RectShape::with_id(self.body, self.rect))]
    }

    fn targeted_pick_shapes(&self) -> Vec<PickShape> {
        // Handles come after the body so they win overlap ties.
        let mut shapes = self.default_pick_shapes();
        for (i, corner) in CORNERS.iter().enumerate() {
            shapes.push(PickShape::Vertex(VertexShape::with_id(
                self.corner_ids[i],
                self.corner_point(*corner),
            )));
        }
        shapes
    }

    fn owns_shape(&self, shape: ShapeId) -> bool {
        shape == self.body || self.corner_ids.contains(&shape)
    }

    fn is_geometrically_valid(&self) -> bool {
        let r = self.rect.abs();
        r.width() >= MIN_BOX_EDGE && r.height() >= MIN_BOX_EDGE
    }

    fn render_styled(&self, raster: &mut Raster, transform: &ViewportTransform, selected: bool) {
        RectShape::with_id(self.body, self.rect).render_styled(raster, transform, &self.style);
        if selected {
            let handle_style = ShapeStyle {
                fill: Some(self.style.stroke),
                ..self.style
            };
            for (i, corner) in CORNERS.iter().enumerate() {
                VertexShape::with_id(self.corner_ids[i], self.corner_point(*corner))
                    .render_styled(raster, transform, &handle_style);
            }
        }
    }

    fn pointer_down(&mut self, point: Point, target: Option<ShapeId>) {
        self.drag = match target {
            Some(shape) => {
                if let Some(corner) = self.corner_for_shape(shape) {
                    Some(Drag::Resize { corner })
                } else {
                    Some(Drag::Move {
                        anchor: point,
                        origin: self.rect,
                    })
                }
            }
            None if self.is_seed() => Some(Drag::Resize {
                corner: Corner::BottomRight,
            }),
            None => Some(Drag::Move {
                anchor: point,
                origin: self.rect,
            }),
        };
    }

    fn pointer_move(&mut self, point: Point) -> bool {
        match self.drag {
            Some(Drag::Move { anchor, origin }) => {
                let dx = point.x - anchor.x;
                let dy = point.y - anchor.y;
                self.rect = Rect::new(origin.x0 + dx, origin.y0 + dy, origin.x1 + dx, origin.y1 + dy);
                true
            }
            Some(Drag::Resize { corner }) => {
                match corner {
                    Corner::TopLeft => {
                        self.rect.x0 = point.x;
                        self.rect.y0 = point.y;
                    }
                    Corner::TopRight => {
                        self.rect.x1 = point.x;
                        self.rect.y0 = point.y;
                    }
                    Corner::BottomRight => {
                        self.rect.x1 = point.x;
                        self.rect.y1 = point.y;
                    }
                    Corner::BottomLeft => {
                        self.rect.x0 = point.x;
                        self.rect.y1 = point.y;
                    }
                }
                true
            }
            None => false,
        }
    }

    fn pointer_up(&mut self, _point: Point) {
        // Dragging a corner past its opposite can invert the rect.
        self.rect = self.rect.abs();
        self.drag = None;
    }

    fn cursor_for(&self, shape: ShapeId) -> CursorStyle {
        if shape == self.body {
            return CursorStyle::Move;
        }
        match self.corner_for_shape(shape) {
            Some(Corner::TopLeft) | Some(Corner::BottomRight) => CursorStyle::ResizeNwSe,
            Some(Corner::TopRight) | Some(Corner::BottomLeft) => CursorStyle::ResizeNeSw,
            None => CursorStyle::Default,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> LabelTemplate {
        LabelTemplate {
            category: "car".to_owned(),
            attributes: vec![("occluded".to_owned(), AttributeValue::Switch(false))],
        }
    }

    #[test]
    fn test_seed_box_is_invalid_until_resized() {
        let mut label = BoxLabel::new(&template(), Point::new(10.0, 10.0));
        assert!(!label.is_geometrically_valid());
        label.pointer_down(Point::new(10.0, 10.0), None);
        label.pointer_move(Point::new(40.0, 30.0));
        label.pointer_up(Point::new(40.0, 30.0));
        assert!(label.is_geometrically_valid());
        assert_eq!(label.rect(), Rect::new(10.0, 10.0, 40.0, 30.0));
    }

    #[test]
    fn test_body_drag_moves_box() {
        let mut label = BoxLabel::new(&template(), Point::new(10.0, 10.0));
        label.pointer_down(Point::new(10.0, 10.0), None);
        label.pointer_move(Point::new(30.0, 30.0));
        label.pointer_up(Point::new(30.0, 30.0));
        let body = match &label.default_pick_shapes()[0] {
            PickShape::Rect(rect) => rect.id(),
            other => panic!("unexpected shape: {other:?}"),
        };
        label.pointer_down(Point::new(20.0, 20.0), Some(body));
        label.pointer_move(Point::new(25.0, 22.0));
        label.pointer_up(Point::new(25.0, 22.0));
        assert_eq!(label.rect(), Rect::new(15.0, 12.0, 35.0, 32.0));
    }

    #[test]
    fn test_corner_drag_past_opposite_normalizes() {
        let mut label = BoxLabel::new(&template(), Point::new(10.0, 10.0));
        label.pointer_down(Point::new(10.0, 10.0), None);
        label.pointer_move(Point::new(30.0, 30.0));
        label.pointer_up(Point::new(30.0, 30.0));
        let shapes = label.targeted_pick_shapes();
        // Index 1 is the top-left handle.
        let top_left = shapes[1].id();
        label.pointer_down(Point::new(10.0, 10.0), Some(top_left));
        label.pointer_move(Point::new(50.0, 50.0));
        label.pointer_up(Point::new(50.0, 50.0));
        let rect = label.rect();
        assert!(rect.x0 <= rect.x1 && rect.y0 <= rect.y1);
        assert_eq!(rect, Rect::new(30.0, 30.0, 50.0, 50.0));
    }

    #[test]
    fn test_ownership_and_cursors() {
        let label = BoxLabel::new(&template(), Point::new(0.0, 0.0));
        let shapes = label.targeted_pick_shapes();
        assert_eq!(shapes.len(), 5);
        for shape in &shapes {
            assert!(label.owns_shape(shape.id()));
        }
        assert_eq!(label.cursor_for(shapes[0].id()), CursorStyle::Move);
        assert_eq!(label.cursor_for(shapes[1].id()), CursorStyle::ResizeNwSe);
        assert_eq!(label.cursor_for(shapes[2].id()), CursorStyle::ResizeNeSw);
        assert!(!label.owns_shape(Uuid::new_v4()));
    }
}
