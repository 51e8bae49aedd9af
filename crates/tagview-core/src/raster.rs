//! CPU raster backing the pick surface and the label layer.
//!
//! All primitives draw hard-edged pixels with no anti-aliasing. The pick
//! surface depends on that: every painted pixel carries an exact encoded
//! color, so a sampled block only ever contains colors that were actually
//! requested.

use kurbo::{Point, Rect, Vec2};

/// A packed `0x00RRGGBB` pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Raster {
    /// Create a raster filled with black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate to new dimensions, clearing all content.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    /// Fill the whole buffer with one color.
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Read a pixel, clamping coordinates into the buffer.
    /// An empty raster reads as black.
    pub fn get(&self, x: i64, y: i64) -> u32 {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixels[y * self.width + x]
    }

    /// Write a pixel; out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.pixels[y as usize * self.width + x as usize] = color;
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let x0 = rect.x0.min(rect.x1).round().max(0.0) as i64;
        let y0 = rect.y0.min(rect.y1).round().max(0.0) as i64;
        let x1 = rect.x0.max(rect.x1).round().min(self.width as f64) as i64;
        let y1 = rect.y0.max(rect.y1).round().min(self.height as f64) as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, color);
            }
        }
    }

    /// Fill a closed polygon with even-odd scanline spans.
    pub fn fill_polygon(&mut self, points: &[Point], color: u32) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let y0 = min_y.floor().max(0.0) as i64;
        let y1 = max_y.ceil().min(self.height as f64) as i64;
        let mut xs: Vec<f64> = Vec::new();
        for y in y0..y1 {
            // Sample at pixel centers so spans land on whole pixels.
            let scan = y as f64 + 0.5;
            xs.clear();
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                if (a.y <= scan && b.y > scan) || (b.y <= scan && a.y > scan) {
                    let t = (scan - a.y) / (b.y - a.y);
                    xs.push(a.x + t * (b.x - a.x));
                }
            }
            xs.sort_by(f64::total_cmp);
            for pair in xs.chunks_exact(2) {
                let x0 = pair[0].round().max(0.0) as i64;
                let x1 = pair[1].round().min(self.width as f64) as i64;
                for x in x0..x1 {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Fill a solid disc.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: u32) {
        if radius <= 0.0 {
            return;
        }
        let y0 = (center.y - radius).floor().max(0.0) as i64;
        let y1 = (center.y + radius).ceil().min(self.height as f64) as i64;
        for y in y0..y1 {
            let dy = y as f64 + 0.5 - center.y;
            let span = radius * radius - dy * dy;
            if span <= 0.0 {
                continue;
            }
            let half = span.sqrt();
            let x0 = (center.x - half).round().max(0.0) as i64;
            let x1 = (center.x + half).round().min(self.width as f64) as i64;
            for x in x0..x1 {
                self.set(x, y, color);
            }
        }
    }

    /// Stroke a thick line segment with square caps.
    pub fn stroke_line(&mut self, a: Point, b: Point, thickness: f64, color: u32) {
        let d = b - a;
        let len = d.hypot();
        if len < 1e-9 {
            self.fill_circle(a, thickness / 2.0, color);
            return;
        }
        let n = Vec2::new(-d.y, d.x) * (thickness / (2.0 * len));
        self.fill_polygon(&[a + n, b + n, b - n, a - n], color);
    }
}
