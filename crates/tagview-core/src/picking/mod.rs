//! Color-indexed picking.
//!
//! Shapes are drawn to an off-screen raster where each shape's pixels carry
//! its registry index encoded as an exact RGB color. Hit testing is then a
//! pixel read: sample the raster under the pointer, decode the color, look
//! the index up in the registry. Black is reserved for "nothing here".

mod color;
mod registry;
mod surface;

pub use color::{color_to_index, index_to_color};
pub use registry::PickRegistry;
pub use surface::OffscreenPickSurface;
