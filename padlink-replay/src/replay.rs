//! Trace drivers.
//!
//! Gamepad traces run through a [`GamepadSession`] so timers fire
//! between steps exactly as they would live; pointer traces drive the
//! handler directly.

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use tracing::{info, warn};

use padlink_core::{
    GamepadInputHandler, GamepadSession, InputConfig, InputHandler, PadError, Protocol,
};

use crate::sinks::ConsoleWire;
use crate::trace::TraceStep;

/// Which handler a trace is replayed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// On-screen gamepad.
    Gamepad,
    /// Direct multi-touch forwarding.
    Touch,
    /// Laptop-style touchpad.
    Touchpad,
}

/// Replay `steps` through a gamepad session.
pub async fn replay_gamepad(
    protocol: Protocol,
    wire: Arc<ConsoleWire>,
    config: &InputConfig,
    steps: Vec<TraceStep>,
) -> Result<(), PadError> {
    let handler =
        GamepadInputHandler::new(protocol, wire.clone(), wire.clone(), wire.clone(), config)?;
    let (session, handle) = GamepadSession::new(handler, 64);
    let task = session.spawn();

    for step in steps {
        match step {
            TraceStep::Touch(event) => handle.touch(event).await?,
            TraceStep::Button { key, auto_release } => handle.press(key, auto_release).await?,
            TraceStep::Release { key } => handle.release(key).await?,
            TraceStep::Wait { ms } => tokio::time::sleep(Duration::from_millis(ms)).await,
            TraceStep::ShowOverlay => handle.show_overlay().await?,
            TraceStep::ToggleEditMode => handle.toggle_edit_mode().await?,
            TraceStep::Resize { width, height } => handle.resize(width, height).await?,
            TraceStep::Cleanup => break,
        }
    }

    handle.shutdown().await?;
    task.await
        .map_err(|e| PadError::Other(format!("session task failed: {e}")))?;
    info!(calls = wire.call_count(), "gamepad replay finished");
    Ok(())
}

/// Replay `steps` through a pointer handler (direct touch or touchpad).
/// Gamepad-only steps are skipped with a warning.
pub async fn replay_pointer(
    handler: &mut dyn InputHandler,
    steps: Vec<TraceStep>,
) -> Result<(), PadError> {
    for step in steps {
        match step {
            TraceStep::Touch(event) => {
                handler.on_touch_event(&event);
            }
            TraceStep::Wait { ms } => tokio::time::sleep(Duration::from_millis(ms)).await,
            TraceStep::Cleanup => break,
            other => warn!(step = ?other, "not a pointer step, skipping"),
        }
    }
    handler.cleanup();
    Ok(())
}
