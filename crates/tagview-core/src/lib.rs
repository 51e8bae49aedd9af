//! Core of an interactive 2D image-annotation surface.
//!
//! The crate answers three questions for an annotation UI:
//!
//! * **What is under the pointer?** Color-indexed picking: every interactive
//!   shape is drawn to an off-screen raster in a unique solid color, so a
//!   hit test is a pixel read ([`picking`]).
//! * **Where is that on screen?** A viewport transform maps between image
//!   pixels, a super-sampled drawing buffer, and display pixels under zoom,
//!   pan, and letterboxing ([`viewport`]).
//! * **What does this gesture mean?** An interaction state machine turns
//!   pointer and key events into label selection, creation, dragging,
//!   panning, and zoom-to-point ([`viewer`]).
//!
//! The embedding layer supplies decoded [`input`] events and an image; it
//! gets back rendered layers and [`viewer::ViewerEvent`]s. No windowing or
//! GPU dependency is involved.

pub mod defer;
pub mod error;
pub mod input;
pub mod label;
pub mod picking;
pub mod raster;
pub mod shapes;
pub mod viewer;
pub mod viewport;

pub use error::{ViewportError, ViewportResult};
pub use viewer::{AnnotationViewport, CreationMode, LabelFactory, ViewerEvent};
pub use viewport::ViewportTransform;
