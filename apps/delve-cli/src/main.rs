use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use delve_level::{GenerationConfig, Level, LevelGenerator};
use delve_motion::{MotionConfig, MotionState, PlayerRig, horizontal_distance};
use delve_render::{DebugTextRenderer, RenderView, Renderer};
use delve_tools::LevelInspector;
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "delve-cli", about = "CLI tool for delve dungeon levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a level and print or export it
    Generate {
        /// RNG seed; omit for a fresh random level
        #[arg(short, long)]
        seed: Option<u64>,
        /// Generation parameters (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize a level, or show one room in detail
    Inspect {
        #[arg(short, long, default_value = "42")]
        seed: u64,
        #[arg(short, long)]
        room: Option<usize>,
    },
    /// Generate many levels and check their layout invariants
    Validate {
        /// Number of levels to generate
        #[arg(short, long, default_value = "100")]
        count: u64,
        /// First seed; level i uses seed + i
        #[arg(short, long, default_value = "0")]
        seed: u64,
    },
    /// Walk the player to a point headlessly and report the trajectory
    Simulate {
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Destination on the ground plane as X,Z
        #[arg(short, long, value_parser = parse_target, allow_hyphen_values = true)]
        target: Vec3,
        /// Motion tuning (YAML); defaults when omitted
        #[arg(short, long)]
        motion: Option<PathBuf>,
        /// Maximum number of frames
        #[arg(long, default_value = "1200")]
        steps: u32,
        /// Frame time in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Parse `X,Z` into a ground-plane point.
fn parse_target(s: &str) -> Result<Vec3, String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Z, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad X `{x}`: {e}"))?;
    let z: f32 = z.trim().parse().map_err(|e| format!("bad Z `{z}`: {e}"))?;
    Ok(Vec3::new(x, 0.0, z))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GenerationConfig> {
    match path {
        Some(path) => GenerationConfig::from_path(path)
            .with_context(|| format!("loading generation config from {}", path.display())),
        None => Ok(GenerationConfig::default()),
    }
}

fn load_motion(path: Option<&Path>) -> anyhow::Result<MotionConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MotionConfig::from_yaml_str(&text)
                .with_context(|| format!("loading motion config from {}", path.display()))
        }
        None => Ok(MotionConfig::default()),
    }
}

fn generate(generator: &LevelGenerator, seed: Option<u64>) -> Level {
    match seed {
        Some(seed) => generator.generate(&mut ChaCha8Rng::seed_from_u64(seed)),
        None => generator.generate(&mut rand::thread_rng()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("delve-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", delve_render::crate_info());
            println!("tools: {}", delve_tools::crate_info());
            let config = GenerationConfig::default();
            println!(
                "generation: rooms {}..={} extent {}..{} enemies {}..={}",
                config.min_rooms,
                config.max_rooms,
                config.min_room_extent,
                config.max_room_extent,
                config.min_enemies,
                config.max_enemies
            );
        }
        Commands::Generate {
            seed,
            config,
            format,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let generator = LevelGenerator::new(config).context("invalid generation config")?;
            let level = generate(&generator, seed);
            tracing::info!(
                rooms = level.rooms().len(),
                enemies = level.enemy_count(),
                "generated level"
            );

            let rendered = match format {
                Format::Text => {
                    let camera = PlayerRig::new(&MotionConfig::default()).camera;
                    let view = RenderView {
                        eye: camera.eye,
                        target: camera.target,
                        fov_degrees: camera.fov.to_degrees(),
                    };
                    DebugTextRenderer::new().render(&level, &view)
                }
                Format::Json => serde_json::to_string_pretty(&level)?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote level to {}", path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Inspect { seed, room } => {
            let level = generate(&LevelGenerator::default(), Some(seed));
            println!("{}", LevelInspector::summary(&level));
            match room {
                Some(id) => {
                    let Some(info) = LevelInspector::inspect_room(&level, id) else {
                        bail!("room {id} not found (level has {} rooms)", level.rooms().len());
                    };
                    println!("{info}");
                    for (kind, p) in &info.enemies {
                        println!("  {:<7} at ({:.2}, {:.2}, {:.2})", kind.name(), p[0], p[1], p[2]);
                    }
                }
                None => {
                    for id in 0..level.rooms().len() {
                        if let Some(info) = LevelInspector::inspect_room(&level, id) {
                            println!("  {info}");
                        }
                    }
                }
            }
        }
        Commands::Validate { count, seed } => {
            let generator = LevelGenerator::default();
            let mut failures = 0u64;
            for i in 0..count {
                let level = generate(&generator, Some(seed.wrapping_add(i)));
                if let Err(e) = level.validate(generator.config()) {
                    tracing::error!(seed = seed.wrapping_add(i), error = %e, "invalid level");
                    failures += 1;
                }
            }
            println!("Validated {count} levels: {} ok, {failures} failed", count - failures);
            if failures > 0 {
                bail!("{failures} of {count} levels violated layout invariants");
            }
        }
        Commands::Simulate {
            seed,
            target,
            motion,
            steps,
            dt,
        } => {
            if dt.is_nan() || dt <= 0.0 {
                bail!("--dt must be positive, got {dt}");
            }
            let level = generate(&LevelGenerator::default(), Some(seed));
            println!(
                "Level: rooms={} length={:.1}",
                level.rooms().len(),
                level.length()
            );

            let motion = load_motion(motion.as_deref())?;
            let mut rig = PlayerRig::new(&motion);
            let start = rig.position();
            rig.move_to(target);
            println!(
                "Start ({:.2}, {:.2}, {:.2}) -> target ({:.2}, {:.2})",
                start.x, start.y, start.z, target.x, target.z
            );

            let mut arrived_at = None;
            for step in 1..=steps {
                let state = rig.update(dt);
                if step % 60 == 0 {
                    let p = rig.position();
                    tracing::debug!(step, x = p.x, y = p.y, z = p.z, "simulated");
                }
                if state == MotionState::Idle {
                    arrived_at = Some(step);
                    break;
                }
            }

            let p = rig.position();
            println!("End ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
            match arrived_at {
                Some(step) => println!(
                    "Arrived after {step} steps ({:.2}s), {:.3} from target",
                    step as f32 * dt,
                    horizontal_distance(p, target)
                ),
                None => println!(
                    "Not arrived after {steps} steps, {:.3} from target",
                    horizontal_distance(p, target)
                ),
            }
        }
    }

    Ok(())
}
