//! Ordered shape registry backing the pick surface.

use crate::shapes::{PickShape, ShapeId};

use super::index_to_color;
use crate::raster::Raster;
use crate::viewport::ViewportTransform;

/// Shapes registered for picking, in draw order.
///
/// A shape's position in the list is its pick index: later entries draw on
/// top and therefore win ties under the pointer. The registry is rebuilt
/// from scratch whenever the label set or the viewport changes, so entries
/// are snapshots rather than live references.
#[derive(Debug, Clone, Default)]
pub struct PickRegistry {
    shapes: Vec<PickShape>,
}

impl PickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Append a shape and return its pick index.
    pub fn register(&mut self, shape: PickShape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn register_all<I: IntoIterator<Item = PickShape>>(&mut self, shapes: I) {
        self.shapes.extend(shapes);
    }

    pub fn get(&self, index: usize) -> Option<&PickShape> {
        self.shapes.get(index)
    }

    pub fn shapes(&self) -> &[PickShape] {
        &self.shapes
    }

    /// Drop repeated registrations of the same shape id, keeping the first
    /// occurrence so earlier indices stay valid.
    pub fn remove_duplicates(&mut self) {
        let mut seen: Vec<ShapeId> = Vec::with_capacity(self.shapes.len());
        self.shapes.retain(|shape| {
            let id = shape.id();
            if seen.contains(&id) {
                false
            } else {
                seen.push(id);
                true
            }
        });
    }

    /// Paint every registered shape onto `raster` in its encoded color.
    pub fn render(&self, raster: &mut Raster, transform: &ViewportTransform) {
        raster.clear(0);
        for (index, shape) in self.shapes.iter().enumerate() {
            shape.render_solid(raster, transform, index_to_color(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Pickable, RectShape, VertexShape};
    use kurbo::{Point, Rect};
    use uuid::Uuid;

    #[test]
    fn test_register_returns_draw_order_indices() {
        let mut registry = PickRegistry::new();
        let a = registry.register(PickShape::Rect(RectShape::new(Rect::new(
            0.0, 0.0, 10.0, 10.0,
        ))));
        let b = registry.register(PickShape::Vertex(VertexShape::new(Point::new(5.0, 5.0))));
        assert_eq!((a, b), (0, 1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let id = Uuid::new_v4();
        let mut registry = PickRegistry::new();
        registry.register(PickShape::Rect(RectShape::with_id(
            id,
            Rect::new(0.0, 0.0, 1.0, 1.0),
        )));
        registry.register(PickShape::Vertex(VertexShape::new(Point::new(5.0, 5.0))));
        registry.register(PickShape::Rect(RectShape::with_id(
            id,
            Rect::new(2.0, 2.0, 3.0, 3.0),
        )));
        registry.remove_duplicates();
        assert_eq!(registry.len(), 2);
        // The earliest registration survives at its original index.
        match registry.get(0) {
            Some(PickShape::Rect(rect)) => {
                assert_eq!(rect.id(), id);
                assert!(rect.rect.x0.abs() < f64::EPSILON);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_clear_empties() {
        let mut registry = PickRegistry::new();
        registry.register(PickShape::Vertex(VertexShape::new(Point::new(1.0, 1.0))));
        registry.clear();
        assert!(registry.is_empty());
    }
}
