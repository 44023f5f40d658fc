#![deny(unsafe_code)]
//! Headless driver for the particle field.
//!
//! Subcommands:
//! - `simulate` — run the field for N frames and report what it drew
//! - `render` — run N frames and write the last one as a PNG
//! - `params` — print default parameters and their schema

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use particle_field_core::{
    FieldConfig, HeadlessHost, ParticleField, Rgb, Scene, StepOutcome,
};
use particle_field_raster::RasterSurface;
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "particle-field", about = "Headless particle-field runner")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SceneArgs {
    /// Container width in logical units.
    #[arg(short = 'W', long, default_value_t = 800.0)]
    width: f64,

    /// Container height in logical units.
    #[arg(short = 'H', long, default_value_t = 600.0)]
    height: f64,

    /// Device pixel ratio (capped by `max_pixel_ratio`).
    #[arg(short, long, default_value_t = 1.0)]
    ratio: f64,

    /// Number of frames to run after the initial one.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Field parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,
}

impl SceneArgs {
    fn scene(&self) -> Result<Scene, CliError> {
        let params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
        let scene = Scene {
            width: self.width,
            height: self.height,
            pixel_ratio: self.ratio,
            params,
            seed: self.seed,
            frames: self.frames,
        };
        scene.validate()?;
        Ok(scene)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run the field and print a summary of the last frame.
    Simulate {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Run the field and write the last frame as a PNG.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file path.
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,

        /// Opaque background as #rrggbb; transparent when omitted.
        #[arg(long)]
        background: Option<String>,
    },
    /// Print default parameters and their schema.
    Params,
}

/// What a headless run produced.
#[derive(Debug)]
struct RunSummary {
    particles: usize,
    frames_drawn: u64,
    connections: usize,
    in_bounds: bool,
}

/// Initializes the field on `surface` and fires `scene.frames` frames.
fn run_scene(scene: &Scene, surface: &mut RasterSurface) -> Result<RunSummary, CliError> {
    scene.validate()?;
    let mut host = HeadlessHost::new(scene.size()).with_pixel_ratio(scene.pixel_ratio);
    let mut field = ParticleField::initialize(surface, &mut host, scene.config(), scene.rng())?
        .ok_or_else(|| CliError::Input("particle field disabled".into()))?;

    let mut connections = 0;
    for _ in 0..scene.frames {
        if host.take_pending().is_none() {
            break;
        }
        if let StepOutcome::Drawn { connections: n } = field.step(&mut host) {
            connections = n;
        }
    }
    debug!(frames = field.frames_drawn(), "headless run finished");

    let bounds = field.state().bounds();
    Ok(RunSummary {
        particles: field.particles().len(),
        frames_drawn: field.frames_drawn(),
        connections,
        in_bounds: field.particles().iter().all(|p| p.is_within(bounds)),
    })
}

fn summary_json(scene: &Scene, summary: &RunSummary) -> serde_json::Value {
    serde_json::json!({
        "width": scene.width,
        "height": scene.height,
        "pixel_ratio": scene.pixel_ratio,
        "seed": scene.seed,
        "particles": summary.particles,
        "frames_drawn": summary.frames_drawn,
        "connections": summary.connections,
        "in_bounds": summary.in_bounds,
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params => {
            let info = serde_json::json!({
                "defaults": FieldConfig::default().params(),
                "schema": FieldConfig::param_schema(),
            });
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let defaults = FieldConfig::default().params();
                if let Some(map) = defaults.as_object() {
                    for (name, value) in map {
                        println!("  {name} = {value}");
                    }
                }
            }
        }
        Command::Simulate { scene } => {
            let scene = scene.scene()?;
            let mut surface = RasterSurface::new();
            let summary = run_scene(&scene, &mut surface)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary_json(&scene, &summary))?
                );
            } else {
                println!(
                    "{} particles, {} frames, {} connections in last frame, in bounds: {}",
                    summary.particles, summary.frames_drawn, summary.connections, summary.in_bounds
                );
            }
        }
        Command::Render {
            scene,
            output,
            background,
        } => {
            let scene = scene.scene()?;
            let background = background.as_deref().map(Rgb::from_hex).transpose()?;
            let mut surface = RasterSurface::new();
            let summary = run_scene(&scene, &mut surface)?;
            particle_field_raster::snapshot::write_png(&surface, background, &output)?;
            info!(path = %output.display(), "frame written");

            if cli.json {
                let mut info = summary_json(&scene, &summary);
                info["output"] = output.display().to_string().into();
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}x{} @{}x ({} frames, seed {}) -> {}",
                    scene.width,
                    scene.height,
                    scene.pixel_ratio,
                    summary.frames_drawn,
                    scene.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(frames: usize) -> SceneArgs {
        SceneArgs {
            width: 320.0,
            height: 240.0,
            ratio: 2.0,
            frames,
            seed: 7,
            params: "{}".into(),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_scene_draws_initial_plus_requested_frames() {
        let scene = args(10).scene().unwrap();
        let mut surface = RasterSurface::new();
        let summary = run_scene(&scene, &mut surface).unwrap();
        assert_eq!(summary.particles, 40);
        assert_eq!(summary.frames_drawn, 11);
        assert!(summary.in_bounds);
        assert_eq!((surface.width(), surface.height()), (640, 480));
    }

    #[test]
    fn bad_params_json_is_input_error() {
        let mut a = args(1);
        a.params = "{nope".into();
        assert_eq!(a.scene().unwrap_err().exit_code(), 12);
    }

    #[test]
    fn invalid_config_is_field_error() {
        let mut a = args(1);
        a.params = r#"{"particle_count": 0}"#.into();
        assert_eq!(a.scene().unwrap_err().exit_code(), 10);
    }

    #[test]
    fn zero_width_is_field_error() {
        let mut a = args(1);
        a.width = 0.0;
        assert_eq!(a.scene().unwrap_err().exit_code(), 10);
    }

    #[test]
    fn oversized_scene_is_field_error() {
        let mut a = args(1);
        a.width = 200_000.0;
        a.height = 200_000.0;
        assert_eq!(a.scene().unwrap_err().exit_code(), 10);

        let mut scene = Scene::new(200_000.0, 200_000.0, 1);
        scene.pixel_ratio = 2.0;
        let mut surface = RasterSurface::new();
        let err = run_scene(&scene, &mut surface).unwrap_err();
        assert_eq!(err.exit_code(), 10);
        assert_eq!(surface.width(), 0);
    }

    #[test]
    fn summary_json_has_expected_keys() {
        let scene = args(2).scene().unwrap();
        let mut surface = RasterSurface::new();
        let summary = run_scene(&scene, &mut surface).unwrap();
        let v = summary_json(&scene, &summary);
        for key in ["particles", "frames_drawn", "connections", "in_bounds", "seed"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
    }
}
