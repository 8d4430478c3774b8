//! padlink replay: drive the input handlers from a recorded trace.
//!
//! ```text
//! padlink-replay --trace <path>                    Replay through the NvStream gamepad
//! padlink-replay --trace <path> --protocol rdp     Same, over a legacy protocol
//! padlink-replay --trace <path> --mode touch       Direct multi-touch forwarding
//! padlink-replay --gen-config                      Dump default config and exit
//! padlink-replay --write-config -c padlink.toml    Write default config to a file
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use padlink_core::{DirectTouchHandler, InputConfig, Protocol, TouchpadHandler};
use padlink_replay::{ConsoleWire, Mode, StaticCanvas, load_trace, replay_gamepad, replay_pointer};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "padlink-replay", about = "Replay touch traces through padlink")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "padlink.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Write the default configuration to `--config` and exit.
    #[arg(long)]
    write_config: bool,

    /// JSON-lines trace to replay.
    #[arg(short, long, required_unless_present_any = ["gen_config", "write_config"])]
    trace: Option<PathBuf>,

    /// Remote protocol of the pretend session.
    #[arg(short, long, default_value = "nvstream")]
    protocol: Protocol,

    /// Handler to replay through.
    #[arg(short, long, value_enum, default_value = "gamepad")]
    mode: Mode,

    /// Pretend the protocol has no touch frames (mouse emulation).
    #[arg(long)]
    no_touch: bool,

    /// Canvas zoom for the touch and touchpad modes.
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&InputConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    if cli.write_config {
        InputConfig::write_default(&cli.config)?;
        println!("wrote {}", cli.config.display());
        return Ok(());
    }

    let config = InputConfig::load(&cli.config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("padlink-replay v{}", env!("CARGO_PKG_VERSION"));

    let Some(trace_path) = cli.trace else {
        return Err("no trace given".into());
    };
    let steps = load_trace(&trace_path)?;
    info!(steps = steps.len(), path = %trace_path.display(), mode = ?cli.mode, "trace loaded");

    let wire = Arc::new(ConsoleWire::new(!cli.no_touch));
    match cli.mode {
        Mode::Gamepad => replay_gamepad(cli.protocol, wire, &config, steps).await?,
        Mode::Touch => {
            let canvas = Arc::new(StaticCanvas::new(&config.display, cli.zoom));
            let mut handler =
                DirectTouchHandler::new(wire.clone(), canvas, config.touch.off_canvas_panning);
            replay_pointer(&mut handler, steps).await?;
            info!(calls = wire.call_count(), "touch replay finished");
        }
        Mode::Touchpad => {
            let canvas = Arc::new(StaticCanvas::new(&config.display, cli.zoom));
            let mut handler = TouchpadHandler::new(wire.clone(), canvas, &config);
            replay_pointer(&mut handler, steps).await?;
            info!(
                calls = wire.call_count(),
                fine = handler.fine_movement(),
                "touchpad replay finished"
            );
        }
    }

    Ok(())
}
