//! Recorded input traces.
//!
//! A trace is a JSON-lines file, one step per line. Blank lines and lines
//! starting with `#` are skipped:
//!
//! ```text
//! {"step":"touch","action":"down","pointers":[{"id":0,"x":100.0,"y":100.0}]}
//! {"step":"wait","ms":120}
//! {"step":"button","key":96,"auto_release":true}
//! {"step":"cleanup"}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use padlink_core::{KeyCode, PadError, TouchEvent};

/// One step of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    /// A raw touch event.
    Touch(TouchEvent),
    /// Press a gamepad key from the UI.
    Button {
        key: KeyCode,
        #[serde(default)]
        auto_release: bool,
    },
    /// Release a gamepad key from the UI.
    Release { key: KeyCode },
    /// Let time pass so timers can fire.
    Wait { ms: u64 },
    ShowOverlay,
    ToggleEditMode,
    /// The screen changed size.
    Resize { width: u32, height: u32 },
    /// End the session.
    Cleanup,
}

/// Parse a whole trace. Line numbers in errors are 1-based.
pub fn parse_trace(text: &str) -> Result<Vec<TraceStep>, PadError> {
    let mut steps = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = serde_json::from_str(line).map_err(|source| PadError::TraceDecode {
            line: index + 1,
            source,
        })?;
        steps.push(step);
    }
    Ok(steps)
}

/// Read and parse a trace file.
pub fn load_trace(path: &Path) -> Result<Vec<TraceStep>, PadError> {
    let text = std::fs::read_to_string(path)?;
    parse_trace(&text)
}
