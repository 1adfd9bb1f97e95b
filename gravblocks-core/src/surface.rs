//! Drawing surface contract
//!
//! The simulation only needs three things from whatever it draws on:
//! the current dimensions, a filled-rectangle primitive and a full clear.
//! Dimensions are queried every tick, so a surface may be resized between
//! ticks.

use crate::color::Color;

/// Integer rectangle in surface units, as produced by rounding a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// Anything the simulation can render onto
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn fill_rect(&mut self, rect: PixelRect, color: Color);

    /// Fill the whole surface with one color
    fn fill(&mut self, color: Color) {
        let rect = PixelRect::new(0, 0, self.width().round() as i32, self.height().round() as i32);
        self.fill_rect(rect, color);
    }
}

/// In-memory RGB surface. Rectangles are clipped to the buffer.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    /// Resize, discarding the current contents
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::BLACK; width * height];
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Number of pixels that are not `background`
    pub fn count_not(&self, background: Color) -> usize {
        self.pixels.iter().filter(|&&p| p != background).count()
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let clip = |start: i32, len: i32, max: usize| {
            let lo = (start.max(0) as i64).min(max as i64);
            let hi = (start as i64 + len.max(0) as i64).min(max as i64);
            (lo as usize, hi.max(lo) as usize)
        };
        let (x0, x1) = clip(rect.x, rect.width, self.width);
        let (y0, y1) = clip(rect.y, rect.height, self.height);

        for y in y0..y1 {
            let row = y * self.width;
            self.pixels[row + x0..row + x1].fill(color);
        }
    }
}
