//! Directional input events
//!
//! The front end translates its own key events into [`InputEvent`]s; the
//! core never binds to a platform event source.

use crate::error::SimError;
use glam::Vec2;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Right => "right",
        }
    }

    /// Force vector of the given magnitude in surface coordinates (y down)
    pub fn force(&self, magnitude: f32) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -magnitude),
            Direction::Left => Vec2::new(-magnitude, 0.0),
            Direction::Down => Vec2::new(0.0, magnitude),
            Direction::Right => Vec2::new(magnitude, 0.0),
        }
    }
}

impl FromStr for Direction {
    type Err = SimError;

    /// Accepts direction names, arrow key names and WASD
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "w" => Ok(Direction::Up),
            "left" | "arrowleft" | "a" => Ok(Direction::Left),
            "down" | "arrowdown" | "s" => Ok(Direction::Down),
            "right" | "arrowright" | "d" => Ok(Direction::Right),
            _ => Err(SimError::UnknownDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Activate(Direction),
    Deactivate(Direction),
}

impl InputEvent {
    pub fn direction(&self) -> Direction {
        match self {
            InputEvent::Activate(d) | InputEvent::Deactivate(d) => *d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_names() {
        assert_eq!("ArrowUp".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("a".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("right".parse::<Direction>().unwrap(), Direction::Right);
        assert!("q".parse::<Direction>().is_err());
    }

    #[test]
    fn up_points_toward_negative_y() {
        assert_eq!(Direction::Up.force(120.0), Vec2::new(0.0, -120.0));
        assert_eq!(Direction::Right.force(120.0), Vec2::new(120.0, 0.0));
        let total: Vec2 = Direction::ALL.iter().map(|d| d.force(7.0)).sum();
        assert_eq!(total, Vec2::ZERO);
    }
}
