mod app;
mod headless;
mod painter;

use clap::{Args, Parser, Subcommand};
use gravblocks_core::{SimConfig, SimError, Simulation};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "gravblocks")]
#[command(about = "Bouncing blocks under push forces and mutual gravity", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive window
    Run {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Run without a window on an in-memory surface
    Headless {
        #[command(flatten)]
        common: CommonArgs,

        /// Number of ticks to run
        #[arg(long, default_value_t = 1000)]
        ticks: u64,

        /// Log stats every N ticks
        #[arg(long, default_value_t = 100)]
        report_every: u64,
    },
}

/// Settings shared by both modes; flags override the config file
#[derive(Args, Clone)]
struct CommonArgs {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of blocks
    #[arg(short, long)]
    blocks: Option<usize>,

    /// Seed for the initial layout
    #[arg(long)]
    seed: Option<u64>,

    /// Gravitational constant for pairwise attraction
    #[arg(short, long)]
    gravity: Option<f32>,

    /// Constant downward acceleration
    #[arg(long)]
    fall: Option<f32>,

    /// Wall damping in [0, 1]
    #[arg(long)]
    damping: Option<f32>,

    /// Nominal tick interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Surface width
    #[arg(long)]
    width: Option<u32>,

    /// Surface height
    #[arg(long)]
    height: Option<u32>,
}

impl CommonArgs {
    fn load_config(&self) -> Result<SimConfig, SimError> {
        let base = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    /// Overlay command line values onto `config`
    fn apply(&self, mut config: SimConfig) -> SimConfig {
        if let Some(count) = self.blocks {
            config.population.count = count;
        }
        if let Some(seed) = self.seed {
            config.population.seed = Some(seed);
        }
        if let Some(g) = self.gravity {
            config.gravitational_constant = g;
        }
        if let Some(fall) = self.fall {
            config.constant_gravity = Some(fall);
        }
        if let Some(damping) = self.damping {
            config.damping = damping;
        }
        if let Some(interval) = self.interval_ms {
            config.tick_interval_ms = interval;
        }
        if let Some(width) = self.width {
            config.surface_width = width;
        }
        if let Some(height) = self.height {
            config.surface_height = height;
        }
        config
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug,wgpu=warn,naga=warn,eframe=info,egui_glow=info")
        } else {
            EnvFilter::new("info,wgpu=warn,naga=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { common } => run_window(common),
        Commands::Headless {
            common,
            ticks,
            report_every,
        } => run_headless(common, ticks, report_every),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_headless(
    common: CommonArgs,
    ticks: u64,
    report_every: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = common.load_config()?;
    headless::run(config, ticks, report_every)?;
    Ok(())
}

fn run_window(common: CommonArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = common.load_config()?;
    let sim = Simulation::with_system_clock(config.clone())?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("gravblocks")
            .with_inner_size([config.surface_width as f32, config.surface_height as f32 + 40.0]),
        ..Default::default()
    };

    let watch_path = common.config.clone();
    eframe::run_native(
        "gravblocks",
        options,
        Box::new(move |cc| Ok(Box::new(app::BlocksApp::new(cc, sim, watch_path, common)))),
    )
    .map_err(|e| format!("failed to open the drawing surface: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "gravblocks", "headless", "--blocks", "5", "--fall", "9.8", "--damping", "0.1",
        ])
        .unwrap();
        let Commands::Headless { common, ticks, .. } = cli.command else {
            panic!("expected headless command");
        };
        let config = common.load_config().unwrap();

        assert_eq!(ticks, 1000);
        assert_eq!(config.population.count, 5);
        assert_eq!(config.constant_gravity, Some(9.8));
        assert_eq!(config.damping, 0.1);
        assert_eq!(config.push_force, SimConfig::default().push_force);
    }

    #[test]
    fn out_of_range_flag_is_rejected() {
        let cli = Cli::try_parse_from(["gravblocks", "run", "--damping", "3"]).unwrap();
        let Commands::Run { common } = cli.command else {
            panic!("expected run command");
        };
        assert!(matches!(common.load_config(), Err(SimError::InvalidConfig(_))));
    }
}
