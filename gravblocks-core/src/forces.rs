use crate::error::SimError;
use crate::input::Direction;
use glam::Vec2;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a constant force source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ForceKey {
    Push(Direction),
    Gravity,
}

impl ForceKey {
    pub fn name(&self) -> &'static str {
        match self {
            ForceKey::Push(dir) => dir.name(),
            ForceKey::Gravity => "gravity",
        }
    }
}

impl From<Direction> for ForceKey {
    fn from(dir: Direction) -> Self {
        ForceKey::Push(dir)
    }
}

impl FromStr for ForceKey {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("gravity") {
            return Ok(ForceKey::Gravity);
        }
        s.parse::<Direction>()
            .map(ForceKey::Push)
            .map_err(|_| SimError::UnknownForceKey(s.to_string()))
    }
}

impl fmt::Display for ForceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Currently active constant forces, applied to every block each tick
#[derive(Debug, Default, Clone)]
pub struct ForceRegistry {
    active: BTreeMap<ForceKey, Vec2>,
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a force under `key`. The first activation wins: a key that is
    /// already active keeps its vector. Returns whether the key was added.
    pub fn activate(&mut self, key: ForceKey, force: Vec2) -> bool {
        if self.active.contains_key(&key) {
            return false;
        }
        self.active.insert(key, force);
        tracing::debug!(key = %key, x = force.x, y = force.y, "force activated");
        true
    }

    /// Remove `key` if present. Returns whether anything was removed.
    pub fn deactivate(&mut self, key: ForceKey) -> bool {
        let removed = self.active.remove(&key).is_some();
        if removed {
            tracing::debug!(key = %key, "force deactivated");
        }
        removed
    }

    /// Visit every active force. Callers must not rely on the order; it is
    /// stable only so that replays are bit-identical.
    pub fn for_each(&self, mut visitor: impl FnMut(ForceKey, Vec2)) {
        for (key, force) in &self.active {
            visitor(*key, *force);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ForceKey, Vec2)> + '_ {
        self.active.iter().map(|(k, f)| (*k, *f))
    }

    pub fn get(&self, key: ForceKey) -> Option<Vec2> {
        self.active.get(&key).copied()
    }

    pub fn is_active(&self, key: ForceKey) -> bool {
        self.active.contains_key(&key)
    }

    /// Sum of all active forces
    pub fn total(&self) -> Vec2 {
        self.active.values().copied().sum()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_activation_wins() {
        let mut reg = ForceRegistry::new();
        assert!(reg.activate(ForceKey::Push(Direction::Up), Vec2::new(0.0, -120.0)));
        assert!(!reg.activate(ForceKey::Push(Direction::Up), Vec2::new(0.0, -999.0)));
        assert_eq!(reg.get(ForceKey::Push(Direction::Up)), Some(Vec2::new(0.0, -120.0)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn single_deactivate_removes_after_duplicates() {
        let mut reg = ForceRegistry::new();
        reg.activate(Direction::Left.into(), Vec2::new(-120.0, 0.0));
        reg.activate(Direction::Left.into(), Vec2::new(-120.0, 0.0));
        reg.activate(Direction::Left.into(), Vec2::new(-50.0, 0.0));

        assert!(reg.deactivate(Direction::Left.into()));
        assert!(!reg.is_active(Direction::Left.into()));
        assert!(reg.is_empty());
        assert!(!reg.deactivate(Direction::Left.into()));
    }

    #[test]
    fn for_each_visits_every_force() {
        let mut reg = ForceRegistry::new();
        reg.activate(ForceKey::Gravity, Vec2::new(0.0, 98.0));
        reg.activate(Direction::Right.into(), Vec2::new(120.0, 0.0));

        let mut sum = Vec2::ZERO;
        let mut seen = 0;
        reg.for_each(|_, f| {
            sum += f;
            seen += 1;
        });
        assert_eq!(seen, 2);
        assert_eq!(sum, Vec2::new(120.0, 98.0));
        assert_eq!(reg.total(), sum);
    }

    #[test]
    fn parses_force_keys() {
        assert_eq!("gravity".parse::<ForceKey>().unwrap(), ForceKey::Gravity);
        assert_eq!("down".parse::<ForceKey>().unwrap(), ForceKey::Push(Direction::Down));
        assert!(matches!(
            "sideways".parse::<ForceKey>(),
            Err(SimError::UnknownForceKey(k)) if k == "sideways"
        ));
    }
}
