//! Random initial layouts

use crate::body::Block;
use crate::color::Color;
use crate::config::Population;
use crate::error::Result;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rng for a population: seeded when a seed is configured, otherwise from the OS
pub fn population_rng(population: &Population) -> StdRng {
    match population.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Generate `population.count` blocks that start fully on a
/// `surface_width` × `surface_height` surface.
///
/// Mass is bimodal: `round(count * heavy_fraction)` blocks are drawn from
/// the heavy band, the rest from the light band. Fails with
/// `InvalidConfig` before drawing anything if a range is inverted.
pub fn populate<R: Rng + ?Sized>(
    population: &Population,
    surface_width: f32,
    surface_height: f32,
    rng: &mut R,
) -> Result<Vec<Block>> {
    population.validate()?;

    let count = population.count;
    let heavy_count = ((count as f64 * population.heavy_fraction).round() as usize).min(count);

    let mut heavy = vec![false; count];
    for idx in rand::seq::index::sample(rng, count, heavy_count).iter() {
        heavy[idx] = true;
    }

    let blocks = heavy
        .into_iter()
        .map(|is_heavy| {
            let size = Vec2::new(
                sample(rng, population.size),
                sample(rng, population.size),
            );
            let max_x = (surface_width - size.x).max(0.0);
            let max_y = (surface_height - size.y).max(0.0);
            let pos = Vec2::new(rng.random_range(0.0..=max_x), rng.random_range(0.0..=max_y));

            let vel = Vec2::new(signed(rng, population.speed), signed(rng, population.speed));
            let mass = if is_heavy {
                sample(rng, population.heavy_mass)
            } else {
                sample(rng, population.light_mass)
            };
            let color = Color::rgb(rng.random(), rng.random(), rng.random());

            Block::new(pos, size, color).with_velocity(vel).with_mass(mass)
        })
        .collect();
    Ok(blocks)
}

fn sample<R: Rng + ?Sized>(rng: &mut R, [lo, hi]: [f32; 2]) -> f32 {
    rng.random_range(lo..=hi)
}

fn signed<R: Rng + ?Sized>(rng: &mut R, range: [f32; 2]) -> f32 {
    let magnitude = sample(rng, range);
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}
