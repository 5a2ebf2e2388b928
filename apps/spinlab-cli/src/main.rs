use anyhow::Context;
use clap::{Parser, Subcommand};
use spinlab_common::SurfaceSize;
use spinlab_input::InputEvent;
use spinlab_orbit::{OrbitConfig, OrbitState, Step, parse_steps};
use spinlab_render::{DebugTextRenderer, Demo, DemoContent, RenderView, Renderer, color_quad};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spinlab-cli", about = "CLI tool for spinlab controller runs and scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Orbit controller config (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the demo list
    Info,
    /// Run a scripted input sequence through the orbit controller
    Simulate {
        /// `;`-separated steps, e.g. "down 100 100; move 110 100 800 600; up; frames 5"
        #[arg(short, long)]
        script: String,
        /// Extra frames appended after the script
        #[arg(short, long, default_value = "0")]
        frames: usize,
        /// Surface width applied to every move
        #[arg(long, requires = "height")]
        width: Option<u32>,
        /// Surface height applied to every move
        #[arg(long, requires = "width")]
        height: Option<u32>,
        /// Print the state every K frames (0 prints only the final state)
        #[arg(short, long, default_value = "1")]
        every: usize,
    },
    /// Dump a demo's content as text
    Scene {
        /// Demo id
        demo: Demo,
    },
}

fn print_state(label: &str, state: &OrbitState) {
    println!(
        "{label}: yaw={:.6} pitch={:.6} velocity=({:.6}, {:.6}) dragging={}",
        state.yaw,
        state.pitch,
        state.angular_velocity.x,
        state.angular_velocity.y,
        state.dragging
    );
}

/// Replace the surface of every pointer move.
fn with_surface(steps: &mut [Step], surface: SurfaceSize) {
    for step in steps {
        if let Step::Input(InputEvent::PointerMove { surface: s, .. }) = step {
            *s = surface;
        }
    }
}

fn simulate(config: &OrbitConfig, steps: &[Step], every: usize) -> OrbitState {
    let mut state = OrbitState::default();
    let mut frame = 0usize;
    for step in steps {
        match *step {
            Step::Input(event) => {
                tracing::debug!(%event, "input");
                state = spinlab_orbit::handle(config, state, event);
            }
            Step::Frame => {
                state = state.advance(config);
                frame += 1;
                if every > 0 && frame % every == 0 {
                    print_state(&format!("frame {frame}"), &state);
                }
            }
        }
    }
    state
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => OrbitConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => OrbitConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("spinlab-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", spinlab_input::crate_info());
            println!("orbit: {}", spinlab_orbit::crate_info());
            println!("render: {}", spinlab_render::crate_info());
            println!(
                "config: friction={} pointer_sensitivity={} key_speed={}",
                config.friction, config.pointer_sensitivity, config.key_speed
            );
            println!("demos:");
            for demo in Demo::ALL {
                println!("  {:<14} {}", demo.id(), demo.description());
            }
        }
        Commands::Simulate {
            script,
            frames,
            width,
            height,
            every,
        } => {
            let mut steps = parse_steps(&script).context("parsing script")?;
            steps.extend(std::iter::repeat_n(Step::Frame, frames));
            if let (Some(width), Some(height)) = (width, height) {
                with_surface(&mut steps, SurfaceSize::new(width, height));
            }
            tracing::info!(steps = steps.len(), friction = config.friction, "simulating");

            let state = simulate(&config, &steps, every);
            print_state("final", &state);
            let m = state.model_matrix().to_cols_array_2d();
            println!("model matrix (columns):");
            for col in m {
                println!(
                    "  [{:>9.5} {:>9.5} {:>9.5} {:>9.5}]",
                    col[0], col[1], col[2], col[3]
                );
            }
        }
        Commands::Scene { demo } => match demo.content() {
            DemoContent::Scene(scene) => {
                let text = DebugTextRenderer::new().render(&scene, &RenderView::of_scene(&scene));
                print!("{text}");
            }
            DemoContent::TexturedCube(desc) => {
                println!("=== Textured cube ===");
                println!(
                    "Texture: {} scale={} fov={} near={} far={}",
                    desc.texture.display(),
                    desc.scale,
                    desc.fov_degrees,
                    desc.near,
                    desc.far
                );
            }
            DemoContent::ColorQuad => {
                let (vertices, indices) = color_quad();
                println!("=== Colour quad ===");
                for v in &vertices {
                    println!("  pos={:?} color={:?}", v.position, v.color);
                }
                println!("  indices={indices:?}");
            }
        },
    }

    Ok(())
}
