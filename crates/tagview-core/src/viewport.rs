//! Viewport transform: zoom, letterboxing, scroll, and the image ↔ buffer ↔
//! display coordinate pipeline.
//!
//! Three coordinate spaces are involved:
//!
//! * **image**: native pixels of the annotated image;
//! * **canvas/buffer**: the super-sampled drawing buffer shared by the
//!   label layer and the pick surface;
//! * **display**: on-screen pixels relative to the container origin.
//!
//! The image is letterboxed inside the container: the axis that does not
//! fill the container gets symmetric `padding`. Zooming scales the canvas
//! beyond the container and `scroll` selects the visible window.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{ViewportError, ViewportResult};

/// Lowest accepted zoom scale (inclusive).
pub const MIN_SCALE: f64 = 1.0;
/// Highest accepted zoom scale (exclusive).
pub const MAX_SCALE: f64 = 3.0;
/// Multiplicative zoom step for wheel and keyboard zoom.
pub const SCALE_RATIO: f64 = 1.05;
/// Fixed super-sample factor between display pixels and buffer pixels.
pub const SUPER_SAMPLE_RATIO: f64 = 2.0;

/// Stateful mapping between image, buffer, and display coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    image_size: Size,
    container_size: Size,
    scale: f64,
    display_to_image_ratio: f64,
    canvas_size: Size,
    padding: Vec2,
    scroll: Vec2,
}

impl ViewportTransform {
    /// Build a transform at scale 1.0.
    ///
    /// Degenerate image or container dimensions are fatal here; every later
    /// operation assumes a usable backing geometry.
    pub fn new(image_size: Size, container_size: Size) -> ViewportResult<Self> {
        if image_size.width <= 0.0 || image_size.height <= 0.0 {
            return Err(ViewportError::EmptyImage);
        }
        if container_size.width <= 0.0 || container_size.height <= 0.0 {
            return Err(ViewportError::EmptyContainer);
        }
        let mut transform = Self {
            image_size,
            container_size,
            scale: MIN_SCALE,
            display_to_image_ratio: 1.0,
            canvas_size: Size::ZERO,
            padding: Vec2::ZERO,
            scroll: Vec2::ZERO,
        };
        transform.recompute_layout();
        Ok(transform)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn container_size(&self) -> Size {
        self.container_size
    }

    /// Canvas (display-resolution) size of the drawn image area.
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Letterbox padding in display pixels, per axis.
    pub fn padding(&self) -> Vec2 {
        self.padding
    }

    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    pub fn display_to_image_ratio(&self) -> f64 {
        self.display_to_image_ratio
    }

    /// Buffer dimensions in whole pixels. The label layer and the pick
    /// surface both use this, so coordinates decoded from one are valid in
    /// the other.
    pub fn buffer_size(&self) -> (usize, usize) {
        let width = (self.canvas_size.width * SUPER_SAMPLE_RATIO).round();
        let height = (self.canvas_size.height * SUPER_SAMPLE_RATIO).round();
        (width.max(0.0) as usize, height.max(0.0) as usize)
    }

    /// Whether the zoomed canvas overflows the container on either axis,
    /// i.e. whether panning can move anything.
    pub fn content_exceeds_container(&self) -> bool {
        self.canvas_size.width > self.container_size.width + 1e-9
            || self.canvas_size.height > self.container_size.height + 1e-9
    }

    pub fn can_zoom_in(&self) -> bool {
        self.scale <= MAX_SCALE / SCALE_RATIO
    }

    pub fn can_zoom_out(&self) -> bool {
        self.scale >= MIN_SCALE * SCALE_RATIO
    }

    /// Image point → buffer pixels. Affine adds the letterbox offset;
    /// non-affine is the pure scaling used for sizes and deltas.
    pub fn to_canvas(&self, point: Point, affine: bool) -> Point {
        let ratio = self.display_to_image_ratio * SUPER_SAMPLE_RATIO;
        let mut out = Point::new(point.x * ratio, point.y * ratio);
        if affine {
            out += self.padding * SUPER_SAMPLE_RATIO;
        }
        out
    }

    /// Buffer pixels → image point; exact inverse of [`Self::to_canvas`].
    pub fn to_image(&self, point: Point, affine: bool) -> Point {
        let ratio = self.display_to_image_ratio * SUPER_SAMPLE_RATIO;
        let mut p = point;
        if affine {
            p -= self.padding * SUPER_SAMPLE_RATIO;
        }
        Point::new(p.x / ratio, p.y / ratio)
    }

    /// Scale an image-space length into buffer pixels.
    pub fn to_canvas_scalar(&self, value: f64) -> f64 {
        value * self.display_to_image_ratio * SUPER_SAMPLE_RATIO
    }

    /// Image point → display pixels relative to the container origin,
    /// accounting for letterbox padding and the current scroll.
    pub fn image_to_display(&self, point: Point) -> Point {
        Point::new(
            point.x * self.display_to_image_ratio + self.padding.x - self.scroll.x,
            point.y * self.display_to_image_ratio + self.padding.y - self.scroll.y,
        )
    }

    /// Display pixels → image point; inverse of [`Self::image_to_display`].
    pub fn display_to_image(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.padding.x + self.scroll.x) / self.display_to_image_ratio,
            (point.y - self.padding.y + self.scroll.y) / self.display_to_image_ratio,
        )
    }

    /// Request a new zoom scale, optionally keeping the image point under
    /// `pivot` (display pixels) fixed on screen.
    ///
    /// Scales outside `[MIN_SCALE, MAX_SCALE)` are rejected with no state
    /// change; callers surface that through disabled zoom affordances, not
    /// errors. Returns whether the scale was applied.
    pub fn set_scale(&mut self, scale: f64, pivot: Option<Point>) -> bool {
        if !(MIN_SCALE..MAX_SCALE).contains(&scale) {
            return false;
        }
        let old_scale = self.scale;
        // Default pivot is the center of the visible canvas area, so plain
        // zoom-in keeps the view centered.
        let pivot = pivot.or_else(|| {
            (scale > MIN_SCALE).then(|| {
                Point::new(
                    self.container_size.width.min(self.canvas_size.width) / 2.0,
                    self.container_size.height.min(self.canvas_size.height) / 2.0,
                )
            })
        });

        self.scale = scale;
        self.recompute_layout();

        if let Some(pivot) = pivot {
            let factor = scale / old_scale;
            // Per axis, and only where the canvas actually overflows:
            // new_scroll = factor * (old_scroll + pivot) - pivot.
            if self.canvas_size.width > self.container_size.width {
                self.scroll.x = factor * (self.scroll.x + pivot.x) - pivot.x;
            }
            if self.canvas_size.height > self.container_size.height {
                self.scroll.y = factor * (self.scroll.y + pivot.y) - pivot.y;
            }
        }
        self.clamp_scroll();
        true
    }

    /// Adopt a new container size at the current scale. Calling this twice
    /// with the same size leaves the state untouched.
    pub fn resize(&mut self, container_size: Size) {
        if container_size.width <= 0.0 || container_size.height <= 0.0 {
            return;
        }
        self.container_size = container_size;
        self.recompute_layout();
        self.clamp_scroll();
    }

    /// Pan by a display-pixel delta, clamped to the scrollable range.
    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll += delta;
        self.clamp_scroll();
    }

    /// Set the scroll offset directly, clamped to the scrollable range.
    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.scroll = scroll;
        self.clamp_scroll();
    }

    fn recompute_layout(&mut self) {
        let image_aspect = self.image_size.width / self.image_size.height;
        let container = self.container_size;
        if container.width / container.height > image_aspect {
            // Container is wider than the image: height fills first.
            let height = container.height * self.scale;
            self.canvas_size = Size::new(height * image_aspect, height);
            self.display_to_image_ratio = height / self.image_size.height;
        } else {
            let width = container.width * self.scale;
            self.canvas_size = Size::new(width, width / image_aspect);
            self.display_to_image_ratio = width / self.image_size.width;
        }
        self.padding = Vec2::new(
            ((container.width - self.canvas_size.width) / 2.0).max(0.0),
            ((container.height - self.canvas_size.height) / 2.0).max(0.0),
        );
    }

    fn clamp_scroll(&mut self) {
        let max_x = (self.canvas_size.width - self.container_size.width).max(0.0);
        let max_y = (self.canvas_size.height - self.container_size.height).max(0.0);
        self.scroll.x = self.scroll.x.clamp(0.0, max_x);
        self.scroll.y = self.scroll.y.clamp(0.0, max_y);
    }
}
