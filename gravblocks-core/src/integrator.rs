use crate::body::Block;
use crate::forces::ForceRegistry;
use glam::Vec2;

/// Pairwise acceleration of `target` toward `source`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pull {
    /// Scalar `G * m_source / D^3`
    pub magnitude: f32,
    /// `(magnitude * DX, magnitude * DY)`
    pub acceleration: Vec2,
}

/// Point of `target` used as the origin of the separation vector
pub fn target_reference(target: &Block) -> Vec2 {
    target.center()
}

/// Point of `source` used as the end of the separation vector.
///
/// x is offset by -width/2 while y is offset by +height/2, so this is
/// not the geometric center.
// FIXME: the x offset has the opposite sign of the y offset.
pub fn source_reference(source: &Block) -> Vec2 {
    Vec2::new(source.pos.x - source.size.x / 2.0, source.pos.y + source.size.y / 2.0)
}

/// Attraction of `target` toward `source` from positions and masses only.
///
/// Coincident reference points give a non-finite result.
pub fn pull(target: &Block, source: &Block, g: f32) -> Pull {
    let d = source_reference(source) - target_reference(target);
    let dist = d.length();
    let magnitude = g * source.mass / (dist * dist * dist);
    Pull {
        magnitude,
        acceleration: d * magnitude,
    }
}

/// Phase A: for every registered force, accelerate each block and move it
/// right away with the updated velocity. The velocity does not depend on
/// force order; the position does. Blocks are left untouched when no force
/// is active.
pub fn apply_static_forces(blocks: &mut [Block], forces: &ForceRegistry, elapsed_ms: f32) {
    for block in blocks.iter_mut() {
        forces.for_each(|_, force| {
            block.accelerate(force, elapsed_ms);
            block.integrate(elapsed_ms);
        });
    }
}

/// Phase B: every ordered pair of distinct blocks. Each pull is applied to
/// the target's velocity as soon as it is computed. Returns the largest
/// scalar magnitude seen, plus whether any pull was non-finite.
pub fn apply_pairwise_gravity(blocks: &mut [Block], g: f32, elapsed_ms: f32) -> (f32, bool) {
    let mut max_magnitude = 0.0f32;
    let mut degenerate = false;

    for i in 0..blocks.len() {
        for j in 0..blocks.len() {
            if i == j {
                continue;
            }
            let p = pull(&blocks[i], &blocks[j], g);
            if !p.acceleration.is_finite() {
                degenerate = true;
            }
            max_magnitude = max_magnitude.max(p.magnitude);
            blocks[i].accelerate(p.acceleration, elapsed_ms);
        }
    }

    (max_magnitude, degenerate)
}

/// Phase C: integrate every block
pub fn advance_positions(blocks: &mut [Block], elapsed_ms: f32) {
    for block in blocks.iter_mut() {
        block.integrate(elapsed_ms);
    }
}

pub fn resolve_walls(blocks: &mut [Block], width: f32, height: f32, damping: f32) {
    for block in blocks.iter_mut() {
        block.resolve_wall_collision(width, height, damping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::input::Direction;

    fn point(x: f32, y: f32, mass: f32) -> Block {
        Block::new(Vec2::new(x, y), Vec2::ZERO, Color::WHITE).with_mass(mass)
    }

    #[test]
    fn pull_uses_cubed_distance() {
        let light = point(0.0, 0.0, 100.0);
        let heavy = point(100.0, 0.0, 100_000.0);
        let p = pull(&light, &heavy, 0.0001);

        let expected = 0.0001 * 100_000.0 / 1.0e6;
        assert!((p.magnitude - expected).abs() < 1e-9);
        assert!((p.acceleration.x - expected * 100.0).abs() < 1e-7);
        assert_eq!(p.acceleration.y, 0.0);
    }

    #[test]
    fn source_reference_is_offset_asymmetrically() {
        let b = Block::new(Vec2::new(10.0, 10.0), Vec2::new(4.0, 6.0), Color::WHITE);
        assert_eq!(target_reference(&b), Vec2::new(12.0, 13.0));
        assert_eq!(source_reference(&b), Vec2::new(8.0, 13.0));
    }

    #[test]
    fn coincident_blocks_are_not_hidden() {
        let mut blocks = vec![point(5.0, 5.0, 10.0), point(5.0, 5.0, 10.0)];
        let (max, degenerate) = apply_pairwise_gravity(&mut blocks, 1.0, 16.0);
        assert!(degenerate);
        assert!(max.is_infinite());
        assert!(!blocks[0].vel.is_finite());
    }

    #[test]
    fn no_forces_leaves_blocks_in_place() {
        let mut blocks = vec![point(1.0, 2.0, 1.0).with_velocity(Vec2::new(50.0, 0.0))];
        apply_static_forces(&mut blocks, &ForceRegistry::new(), 100.0);
        assert_eq!(blocks[0].pos, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn static_forces_move_with_updated_velocity() {
        let mut forces = ForceRegistry::new();
        forces.activate(Direction::Right.into(), Vec2::new(100.0, 0.0));
        let mut blocks = vec![point(0.0, 0.0, 1.0)];

        apply_static_forces(&mut blocks, &forces, 1000.0);

        assert_eq!(blocks[0].vel, Vec2::new(100.0, 0.0));
        assert_eq!(blocks[0].pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn each_static_force_moves_the_block() {
        let mut forces = ForceRegistry::new();
        forces.activate(Direction::Right.into(), Vec2::new(100.0, 0.0));
        forces.activate(Direction::Down.into(), Vec2::new(0.0, 50.0));
        let mut blocks = vec![point(0.0, 0.0, 1.0)];

        apply_static_forces(&mut blocks, &forces, 1000.0);

        // Down first: v = (0, 50), x += (0, 50); then Right: v = (100, 50), x += (100, 50)
        assert_eq!(blocks[0].vel, Vec2::new(100.0, 50.0));
        assert_eq!(blocks[0].pos, Vec2::new(100.0, 100.0));
    }
}
