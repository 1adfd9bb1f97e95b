use crate::body::Block;
use crate::clock::{Clock, SystemClock};
use crate::config::SimConfig;
use crate::error::Result;
use crate::forces::{ForceKey, ForceRegistry};
use crate::input::{Direction, InputEvent};
use crate::integrator::{advance_positions, apply_pairwise_gravity, apply_static_forces, resolve_walls};
use crate::surface::Surface;
use glam::Vec2;

/// Summary of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStats {
    pub tick: u64,
    pub elapsed_ms: f32,
    /// Largest pairwise acceleration magnitude seen since construction
    pub max_acceleration: f32,
}

/// Owns the blocks and active forces and advances them on every tick.
///
/// Time is read from the clock on each tick, so the driver interval only
/// has to be roughly periodic.
#[derive(Debug)]
pub struct Simulation<C: Clock = SystemClock> {
    blocks: Vec<Block>,
    forces: ForceRegistry,
    config: SimConfig,
    clock: C,
    last_tick_ms: f64,
    ticks: u64,
    max_acceleration: f32,
    degenerate_reported: bool,
}

impl Simulation<SystemClock> {
    pub fn with_system_clock(config: SimConfig) -> Result<Self> {
        Self::new(config, SystemClock::new())
    }
}

impl<C: Clock> Simulation<C> {
    /// Validate `config` and start the clock. The first tick measures time
    /// from here.
    pub fn new(config: SimConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let last_tick_ms = clock.now_ms();
        let mut sim = Self {
            blocks: Vec::new(),
            forces: ForceRegistry::new(),
            config,
            clock,
            last_tick_ms,
            ticks: 0,
            max_acceleration: 0.0,
            degenerate_reported: false,
        };
        sim.sync_constant_gravity();
        tracing::info!(
            damping = sim.config.damping,
            g = sim.config.gravitational_constant,
            constant_gravity = ?sim.config.constant_gravity,
            "simulation created"
        );
        Ok(sim)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Swap in a new configuration. Blocks and directional forces are kept;
    /// the `gravity` entry follows the new `constant_gravity`.
    pub fn reconfigure(&mut self, config: SimConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.forces.deactivate(ForceKey::Gravity);
        self.sync_constant_gravity();
        tracing::info!("simulation reconfigured");
        Ok(())
    }

    /// Change the pairwise attraction constant without touching anything else
    pub fn set_gravitational_constant(&mut self, g: f32) {
        self.config.gravitational_constant = g;
    }

    fn sync_constant_gravity(&mut self) {
        if let Some(g) = self.config.constant_gravity {
            self.forces.activate(ForceKey::Gravity, Vec2::new(0.0, g));
        }
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn extend_blocks(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    /// Replace all blocks, keeping forces and the clock
    pub fn replace_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    pub fn activate(&mut self, key: ForceKey, force: Vec2) -> bool {
        self.forces.activate(key, force)
    }

    pub fn deactivate(&mut self, key: ForceKey) -> bool {
        self.forces.deactivate(key)
    }

    /// Map a directional event to a push of `config.push_force`
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Activate(dir) => {
                self.press(dir);
            }
            InputEvent::Deactivate(dir) => {
                self.release(dir);
            }
        }
    }

    pub fn press(&mut self, dir: Direction) -> bool {
        let force = dir.force(self.config.push_force);
        self.forces.activate(ForceKey::Push(dir), force)
    }

    pub fn release(&mut self, dir: Direction) -> bool {
        self.forces.deactivate(ForceKey::Push(dir))
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn max_acceleration(&self) -> f32 {
        self.max_acceleration
    }

    /// Restart elapsed-time measurement from now, e.g. after a pause
    pub fn reset_clock(&mut self) {
        self.last_tick_ms = self.clock.now_ms();
    }

    /// Advance by the wall-clock time since the previous tick and redraw
    /// everything onto `surface`.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> TickStats {
        let now = self.clock.now_ms();
        let elapsed = (now - self.last_tick_ms) as f32;
        let width = surface.width();
        let height = surface.height();

        surface.fill(self.config.background);

        apply_static_forces(&mut self.blocks, &self.forces, elapsed);

        let (max, degenerate) =
            apply_pairwise_gravity(&mut self.blocks, self.config.gravitational_constant, elapsed);
        if max > self.max_acceleration {
            self.max_acceleration = max;
            tracing::debug!(max_acceleration = max, "new maximum pairwise acceleration");
        }
        if degenerate && !self.degenerate_reported {
            self.degenerate_reported = true;
            tracing::warn!(
                tick = self.ticks,
                "non-finite pairwise acceleration; coincident blocks or non-positive mass"
            );
        }

        advance_positions(&mut self.blocks, elapsed);
        resolve_walls(&mut self.blocks, width, height, self.config.damping);

        for block in &self.blocks {
            block.render(surface);
        }

        self.last_tick_ms = now;
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, elapsed_ms = elapsed, "tick");

        TickStats {
            tick: self.ticks,
            elapsed_ms: elapsed,
            max_acceleration: self.max_acceleration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::color::Color;
    use crate::surface::FrameBuffer;

    fn sim(config: SimConfig) -> (Simulation<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let sim = Simulation::new(config, clock.clone()).unwrap();
        (sim, clock)
    }

    #[test]
    fn constant_gravity_is_registered_at_start() {
        let (sim, _) = sim(SimConfig::default().with_constant_gravity(Some(98.0)));
        assert_eq!(sim.forces().get(ForceKey::Gravity), Some(Vec2::new(0.0, 98.0)));
    }

    #[test]
    fn invalid_config_fails_fast() {
        let result = Simulation::new(SimConfig::default().with_damping(2.0), ManualClock::new());
        assert!(result.is_err());
    }

    #[test]
    fn first_tick_measures_from_construction() {
        let clock = ManualClock::new();
        clock.set(1_000.0);
        let mut sim = Simulation::new(SimConfig::default(), clock.clone()).unwrap();
        clock.advance(25.0);

        let stats = sim.tick(&mut FrameBuffer::new(10, 10));
        assert_eq!(stats.elapsed_ms, 25.0);
        assert_eq!(stats.tick, 1);
    }

    #[test]
    fn reconfigure_replaces_gravity_entry() {
        let (mut sim, _) = sim(SimConfig::default().with_constant_gravity(Some(98.0)));
        sim.press(Direction::Left);

        sim.reconfigure(SimConfig::default().with_constant_gravity(Some(10.0))).unwrap();
        assert_eq!(sim.forces().get(ForceKey::Gravity), Some(Vec2::new(0.0, 10.0)));
        assert!(sim.forces().is_active(ForceKey::Push(Direction::Left)));

        sim.reconfigure(SimConfig::default()).unwrap();
        assert!(!sim.forces().is_active(ForceKey::Gravity));
    }

    #[test]
    fn input_events_map_to_push_forces() {
        let (mut sim, _) = sim(SimConfig::default().with_push_force(50.0));
        sim.handle_input(InputEvent::Activate(Direction::Up));
        sim.handle_input(InputEvent::Activate(Direction::Up));
        assert_eq!(sim.forces().get(Direction::Up.into()), Some(Vec2::new(0.0, -50.0)));

        sim.handle_input(InputEvent::Deactivate(Direction::Up));
        assert!(sim.forces().is_empty());
    }

    #[test]
    fn tick_clears_to_background() {
        let (mut sim, clock) = sim(SimConfig {
            background: Color::rgb(1, 2, 3),
            ..SimConfig::default()
        });
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill(Color::WHITE);
        clock.advance(10.0);
        sim.tick(&mut fb);
        assert_eq!(fb.count_not(Color::rgb(1, 2, 3)), 0);
    }
}
