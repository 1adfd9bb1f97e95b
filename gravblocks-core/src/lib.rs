pub mod body;
pub mod clock;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod forces;
pub mod input;
pub mod integrator;
pub mod scenario;
pub mod surface;

pub use body::Block;
pub use clock::{Clock, ManualClock, SystemClock};
pub use color::Color;
pub use config::{Population, SimConfig};
pub use engine::{Simulation, TickStats};
pub use error::{Result, SimError};
pub use forces::{ForceKey, ForceRegistry};
pub use glam::Vec2;
pub use input::{Direction, InputEvent};
pub use scenario::{populate, population_rng};
pub use surface::{FrameBuffer, PixelRect, Surface};

// Test helpers module (public for integration tests)
pub mod tests;
