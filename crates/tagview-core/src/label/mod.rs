//! Label model seam.
//!
//! The viewport controller never knows concrete label kinds; it talks to
//! [`Label`] trait objects. A label owns a set of pick shapes, reacts to
//! forwarded pointer gestures in image coordinates, and reports whether its
//! geometry is still meaningful. [`BoxLabel`] is the built-in bounding-box
//! kind; other kinds plug in through a creation factory.

mod boxed;
mod store;

pub use boxed::{BoxLabel, Corner, MIN_BOX_EDGE};
pub use store::LabelStore;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::raster::Raster;
use crate::shapes::{PickShape, ShapeId};
use crate::viewport::ViewportTransform;

/// Unique identifier for labels.
pub type LabelId = Uuid;

/// Value of a single category attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// On/off toggle.
    Switch(bool),
    /// Selected entry of a fixed list: index plus its display value.
    List(usize, String),
}

/// The currently chosen category and attribute values, applied to every
/// label created until the template changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelTemplate {
    pub category: String,
    pub attributes: Vec<(String, AttributeValue)>,
}

/// Pointer cursor a label requests for one of its shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorStyle {
    Default,
    Crosshair,
    Move,
    Grab,
    Grabbing,
    ResizeNwSe,
    ResizeNeSw,
}

/// A single annotation drawn over the image.
///
/// All points are image coordinates; the controller resolves display
/// positions and pick targets before forwarding.
pub trait Label {
    fn id(&self) -> LabelId;

    fn category(&self) -> &str;

    /// Shapes registered for picking while the label is not selected.
    fn default_pick_shapes(&self) -> Vec<PickShape>;

    /// Shapes registered while selected; includes edit handles.
    fn targeted_pick_shapes(&self) -> Vec<PickShape>;

    fn owns_shape(&self, shape: ShapeId) -> bool;

    fn on_selected(&mut self) {}

    fn on_deselected(&mut self) {}

    /// Whether the geometry still denotes something; labels that return
    /// false are dropped by [`LabelStore::retain_valid`].
    fn is_geometrically_valid(&self) -> bool;

    /// Draw onto the visible label layer.
    fn render_styled(&self, raster: &mut Raster, transform: &ViewportTransform, selected: bool);

    /// Begin a gesture on the label. `target` is the resolved pick shape
    /// under the pointer, if any.
    fn pointer_down(&mut self, point: Point, target: Option<ShapeId>);

    /// Continue a gesture; returns whether the geometry changed.
    fn pointer_move(&mut self, point: Point) -> bool;

    /// Finish a gesture.
    fn pointer_up(&mut self, point: Point);

    fn double_click(&mut self, _target: Option<ShapeId>) {}

    fn cursor_for(&self, shape: ShapeId) -> CursorStyle;

    /// Concrete-type escape hatch for callers that created the label.
    fn as_any(&self) -> &dyn std::any::Any;
}
