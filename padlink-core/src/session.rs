//! Single-task driver for a gamepad session.
//!
//! The handler and its timers are owned by one task that multiplexes UI
//! commands and timer expiries, so touch processing and scheduled
//! callbacks are serialized without locks:
//!
//! ```text
//!   SessionHandle ──mpsc──► GamepadSession::run ◄── TimerQueue
//!                                 │
//!                                 ▼
//!                        GamepadInputHandler
//! ```
//!
//! The loop ends on [`SessionCommand::Shutdown`] or when every handle is
//! dropped; either way the handler is cleaned up before `run` returns.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::PadError;
use crate::event::TouchEvent;
use crate::handler::{GamepadInputHandler, InputHandler};
use crate::keycode::KeyCode;

/// Commands the UI layer sends to a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Touch(TouchEvent),
    Button { key: KeyCode, auto_release: bool },
    ReleaseButton(KeyCode),
    ShowOverlay,
    ToggleEditMode,
    Resize { width: u32, height: u32 },
    Shutdown,
}

pub struct GamepadSession {
    handler: GamepadInputHandler,
    rx: mpsc::Receiver<SessionCommand>,
}

impl GamepadSession {
    /// Wrap `handler` with a command channel of `capacity` slots.
    pub fn new(handler: GamepadInputHandler, capacity: usize) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { handler, rx }, SessionHandle { tx })
    }

    /// Run on a new task. The task yields the cleaned-up handler.
    pub fn spawn(self) -> JoinHandle<GamepadInputHandler> {
        tokio::spawn(self.run())
    }

    /// Process commands and timers until shutdown.
    pub async fn run(mut self) -> GamepadInputHandler {
        info!(protocol = %self.handler.protocol(), "gamepad session started");
        loop {
            tokio::select! {
                biased;

                cmd = self.rx.recv() => match cmd {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(cmd) => self.apply(cmd),
                },

                Some(timer) = self.handler.next_timer(), if self.handler.has_pending_timers() => {
                    self.handler.on_timer(timer);
                }
            }
        }
        self.handler.cleanup();
        info!("gamepad session stopped");
        self.handler
    }

    fn apply(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Touch(event) => {
                let handled = self.handler.on_touch_event(&event);
                debug!(action = ?event.action, handled, "touch");
            }
            SessionCommand::Button { key, auto_release } => {
                self.handler.send_gamepad_button(key, auto_release);
            }
            SessionCommand::ReleaseButton(key) => self.handler.release_gamepad_button(key),
            SessionCommand::ShowOverlay => self.handler.show_overlay(),
            SessionCommand::ToggleEditMode => {
                self.handler.toggle_edit_mode();
            }
            SessionCommand::Resize { width, height } => self.handler.resize(width, height),
            SessionCommand::Shutdown => {}
        }
    }
}

// ── SessionHandle ────────────────────────────────────────────────

/// Cloneable sender side of a [`GamepadSession`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub async fn send(&self, cmd: SessionCommand) -> Result<(), PadError> {
        self.tx.send(cmd).await?;
        Ok(())
    }

    pub async fn touch(&self, event: TouchEvent) -> Result<(), PadError> {
        self.send(SessionCommand::Touch(event)).await
    }

    pub async fn press(&self, key: KeyCode, auto_release: bool) -> Result<(), PadError> {
        self.send(SessionCommand::Button { key, auto_release }).await
    }

    pub async fn release(&self, key: KeyCode) -> Result<(), PadError> {
        self.send(SessionCommand::ReleaseButton(key)).await
    }

    pub async fn show_overlay(&self) -> Result<(), PadError> {
        self.send(SessionCommand::ShowOverlay).await
    }

    pub async fn toggle_edit_mode(&self) -> Result<(), PadError> {
        self.send(SessionCommand::ToggleEditMode).await
    }

    pub async fn resize(&self, width: u32, height: u32) -> Result<(), PadError> {
        self.send(SessionCommand::Resize { width, height }).await
    }

    pub async fn shutdown(&self) -> Result<(), PadError> {
        self.send(SessionCommand::Shutdown).await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
