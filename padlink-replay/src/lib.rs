//! # padlink-replay
//!
//! Replays recorded input traces through the padlink handlers and prints
//! every outbound wire call.
//!
//! - **Trace**: `TraceStep`, the JSON-lines trace format
//! - **Sinks**: `ConsoleWire` and `StaticCanvas`, console stand-ins for the session
//! - **Replay**: drivers for the gamepad, direct-touch and touchpad modes

pub mod replay;
pub mod sinks;
pub mod trace;

pub use replay::{Mode, replay_gamepad, replay_pointer};
pub use sinks::{ConsoleWire, StaticCanvas};
pub use trace::{TraceStep, load_trace, parse_trace};
