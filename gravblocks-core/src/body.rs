use crate::color::Color;
use crate::surface::{PixelRect, Surface};
use glam::Vec2;

/// A rectangular body in the simulation.
///
/// Position and size are continuous; rendering snaps to whole units through
/// [`Block::pixel_rect`] without touching the stored state.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub color: Color,
}

impl Block {
    pub fn new(pos: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            mass: 1.0,
            color,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Geometric center
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Rounded projection used for drawing
    pub fn pixel_rect(&self) -> PixelRect {
        PixelRect::new(
            self.pos.x.round() as i32,
            self.pos.y.round() as i32,
            self.size.x.round() as i32,
            self.size.y.round() as i32,
        )
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Advance the position by the current velocity over `elapsed_ms`
    pub fn integrate(&mut self, elapsed_ms: f32) {
        self.move_by(self.vel * elapsed_ms / 1000.0);
    }

    pub fn scale(&mut self, factor_w: f32, factor_h: f32) {
        self.size.x *= factor_w;
        self.size.y *= factor_h;
    }

    /// Forward Euler velocity update: `vel += delta * elapsed_ms / 1000`
    pub fn accelerate(&mut self, delta: Vec2, elapsed_ms: f32) {
        self.vel += delta * elapsed_ms / 1000.0;
    }

    /// Bounce off the surface walls.
    ///
    /// A wall is hit when the leading edge has reached or crossed it. The
    /// position is clamped back onto the surface, and if the velocity
    /// component points into the wall it is inverted and scaled by
    /// `1 - damping`. Both axes are checked on every call.
    ///
    /// A block larger than the surface gets a negative far-wall target and
    /// ends up off the near edge; that case is not corrected.
    pub fn resolve_wall_collision(&mut self, surface_width: f32, surface_height: f32, damping: f32) {
        let rebound = 1.0 - damping;
        let far = Vec2::new(surface_width - self.size.x, surface_height - self.size.y);

        for axis in 0..2 {
            if self.pos[axis] <= 0.0 {
                self.pos[axis] = 0.0;
                if self.vel[axis] < 0.0 {
                    self.vel[axis] = -self.vel[axis] * rebound;
                }
            }
            if self.pos[axis] >= far[axis] {
                self.pos[axis] = far[axis];
                if self.vel[axis] > 0.0 {
                    self.vel[axis] = -self.vel[axis] * rebound;
                }
            }
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.pixel_rect(), self.color);
    }
}
