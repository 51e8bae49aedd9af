//! Ordered label collection with z-order maintenance.

use std::fmt;

use super::{Label, LabelId};
use crate::raster::Raster;
use crate::shapes::{PickShape, ShapeId};
use crate::viewport::ViewportTransform;

/// Labels in draw order, back to front.
#[derive(Default)]
pub struct LabelStore {
    labels: Vec<Box<dyn Label>>,
}

impl LabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Label> {
        self.labels.iter().map(|label| label.as_ref())
    }

    /// Append on top of the stack and return the label's id.
    pub fn push(&mut self, label: Box<dyn Label>) -> LabelId {
        let id = label.id();
        self.labels.push(label);
        id
    }

    pub fn get(&self, id: LabelId) -> Option<&dyn Label> {
        self.labels
            .iter()
            .find(|label| label.id() == id)
            .map(|label| label.as_ref())
    }

    pub fn get_mut(&mut self, id: LabelId) -> Option<&mut Box<dyn Label>> {
        self.labels.iter_mut().find(|label| label.id() == id)
    }

    pub fn remove(&mut self, id: LabelId) -> Option<Box<dyn Label>> {
        let index = self.index_of(id)?;
        Some(self.labels.remove(index))
    }

    /// Which label owns a pick shape, searching front to back.
    pub fn owner_of(&self, shape: ShapeId) -> Option<LabelId> {
        self.labels
            .iter()
            .rev()
            .find(|label| label.owns_shape(shape))
            .map(|label| label.id())
    }

    pub fn bring_to_front(&mut self, id: LabelId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.labels.len() => {
                let label = self.labels.remove(index);
                self.labels.push(label);
                true
            }
            _ => false,
        }
    }

    pub fn send_to_back(&mut self, id: LabelId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                let label = self.labels.remove(index);
                self.labels.insert(0, label);
                true
            }
            _ => false,
        }
    }

    /// Move one step toward the front.
    pub fn raise(&mut self, id: LabelId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.labels.len() => {
                self.labels.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Move one step toward the back.
    pub fn lower(&mut self, id: LabelId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.labels.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Drop labels whose geometry is no longer meaningful. Returns true when
    /// the caller's selection was among the dropped labels and must be
    /// cleared.
    pub fn retain_valid(&mut self, selected: Option<LabelId>) -> bool {
        let mut selection_lost = false;
        self.labels.retain(|label| {
            if label.is_geometrically_valid() {
                true
            } else {
                if selected == Some(label.id()) {
                    selection_lost = true;
                }
                false
            }
        });
        selection_lost
    }

    /// Pick shapes for every label in draw order; the selected label
    /// contributes its targeted set (edit handles included).
    pub fn pick_shapes(&self, selected: Option<LabelId>) -> Vec<PickShape> {
        let mut shapes = Vec::new();
        for label in &self.labels {
            if selected == Some(label.id()) {
                shapes.extend(label.targeted_pick_shapes());
            } else {
                shapes.extend(label.default_pick_shapes());
            }
        }
        shapes
    }

    /// Draw every label onto the visible layer in z order.
    pub fn render_all(
        &self,
        raster: &mut Raster,
        transform: &ViewportTransform,
        selected: Option<LabelId>,
    ) {
        for label in &self.labels {
            label.render_styled(raster, transform, selected == Some(label.id()));
        }
    }

    fn index_of(&self, id: LabelId) -> Option<usize> {
        self.labels.iter().position(|label| label.id() == id)
    }
}

impl fmt::Debug for LabelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.labels.iter().map(|label| label.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{BoxLabel, LabelTemplate};
    use kurbo::Point;

    fn boxed(x: f64) -> Box<dyn Label> {
        let mut label = BoxLabel::new(&LabelTemplate::default(), Point::new(x, 0.0));
        label.pointer_down(Point::new(x, 0.0), None);
        label.pointer_move(Point::new(x + 20.0, 20.0));
        label.pointer_up(Point::new(x + 20.0, 20.0));
        Box::new(label)
    }

    fn order(store: &LabelStore) -> Vec<LabelId> {
        store.iter().map(|label| label.id()).collect()
    }

    #[test]
    fn test_z_order_operations() {
        let mut store = LabelStore::new();
        let a = store.push(boxed(0.0));
        let b = store.push(boxed(30.0));
        let c = store.push(boxed(60.0));

        assert!(store.bring_to_front(a));
        assert_eq!(order(&store), vec![b, c, a]);

        assert!(store.send_to_back(c));
        assert_eq!(order(&store), vec![c, b, a]);

        assert!(store.raise(b));
        assert_eq!(order(&store), vec![c, a, b]);

        assert!(store.lower(a));
        assert_eq!(order(&store), vec![a, c, b]);

        // Boundary positions are no-ops.
        assert!(!store.raise(b));
        assert!(!store.lower(a));
        assert!(!store.bring_to_front(b));
        assert!(!store.send_to_back(a));
    }

    #[test]
    fn test_retain_valid_reports_lost_selection() {
        let mut store = LabelStore::new();
        let seed = store.push(Box::new(BoxLabel::new(
            &LabelTemplate::default(),
            Point::new(5.0, 5.0),
        )));
        let kept = store.push(boxed(30.0));
        assert!(store.retain_valid(Some(seed)));
        assert_eq!(order(&store), vec![kept]);
        assert!(!store.retain_valid(Some(kept)));
    }

    #[test]
    fn test_selected_label_contributes_handles() {
        let mut store = LabelStore::new();
        let a = store.push(boxed(0.0));
        store.push(boxed(30.0));
        assert_eq!(store.pick_shapes(None).len(), 2);
        // Body plus four corner handles.
        assert_eq!(store.pick_shapes(Some(a)).len(), 6);
    }

    #[test]
    fn test_owner_of_prefers_topmost() {
        let mut store = LabelStore::new();
        let a = store.push(boxed(0.0));
        let shape = store.pick_shapes(None)[0].id();
        assert_eq!(store.owner_of(shape), Some(a));
        assert_eq!(store.owner_of(uuid::Uuid::new_v4()), None);
    }
}
