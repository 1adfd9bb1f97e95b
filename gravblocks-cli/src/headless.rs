use gravblocks_core::{populate, population_rng, Color, FrameBuffer, Result, SimConfig, Simulation};
use std::thread;
use std::time::{Duration, Instant};

/// Drive the simulation from a sleeping periodic loop on an in-memory
/// surface. The loop never overlaps ticks; a slow tick just delays the next.
pub fn run(config: SimConfig, ticks: u64, report_every: u64) -> Result<()> {
    let mut surface = FrameBuffer::new(config.surface_width as usize, config.surface_height as usize);
    let interval = Duration::from_millis(config.tick_interval_ms);
    let background = config.background;

    let mut rng = population_rng(&config.population);
    let blocks = populate(
        &config.population,
        config.surface_width as f32,
        config.surface_height as f32,
        &mut rng,
    )?;

    let mut sim = Simulation::with_system_clock(config)?;
    sim.extend_blocks(blocks);
    tracing::info!(
        blocks = sim.blocks().len(),
        ticks,
        interval_ms = interval.as_millis() as u64,
        "headless run started"
    );

    let started = Instant::now();
    let mut next = Instant::now() + interval;
    for _ in 0..ticks {
        let stats = sim.tick(&mut surface);

        if report_every > 0 && stats.tick % report_every == 0 {
            tracing::info!(
                tick = stats.tick,
                elapsed_ms = stats.elapsed_ms,
                max_acceleration = stats.max_acceleration,
                covered = coverage(&surface, background),
                "progress"
            );
        }

        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
        }
        next += interval;
    }

    tracing::info!(
        ticks = sim.ticks(),
        wall_ms = started.elapsed().as_millis() as u64,
        max_acceleration = sim.max_acceleration(),
        "headless run finished"
    );
    for (i, block) in sim.blocks().iter().enumerate() {
        tracing::debug!(
            block = i,
            x = block.pos.x,
            y = block.pos.y,
            vx = block.vel.x,
            vy = block.vel.y,
            mass = block.mass,
            "final state"
        );
    }
    Ok(())
}

/// Fraction of the surface covered by blocks
fn coverage(surface: &FrameBuffer, background: Color) -> f32 {
    let total = surface.pixels().len();
    if total == 0 {
        return 0.0;
    }
    surface.count_not(background) as f32 / total as f32
}
