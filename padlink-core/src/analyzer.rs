//! Slow/fine movement detection over a sliding window of touch samples.
//!
//! Records `(x, y, timestamp)` samples and derives the average finger
//! speed over the most recent window. The touchpad handler uses the
//! result to decide when to engage temporary magnification for precise
//! pointer work.
//!
//! The "slow" flag has asymmetric thresholds: it turns on below
//! `slow_threshold_dp` and only turns off again above
//! `slow_threshold_dp × exit_multiplier`.

use std::collections::VecDeque;

use tracing::debug;

use crate::config::MovementConfig;

/// A single recorded touch position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: u64,
}

/// Sliding-window movement analyzer.
pub struct TouchMovementAnalyzer {
    samples: VecDeque<TouchSample>,
    config: MovementConfig,
    /// Screen density (pixels per dp).
    density: f32,
    slow_detected: bool,
    last_analysis_ms: Option<u64>,
}

impl TouchMovementAnalyzer {
    /// Create an analyzer with default tuning.
    pub fn new(density: f32) -> Self {
        Self::with_config(density, MovementConfig::default())
    }

    pub fn with_config(density: f32, config: MovementConfig) -> Self {
        Self {
            samples: VecDeque::with_capacity(128),
            config,
            density,
            slow_detected: false,
            last_analysis_ms: None,
        }
    }

    /// Record a sample and evict everything older than the window.
    pub fn add_point(&mut self, x: f32, y: f32, timestamp_ms: u64) {
        self.samples.push_back(TouchSample { x, y, timestamp_ms });
        self.evict(timestamp_ms);
    }

    /// Re-evaluate the slow-movement flag.
    ///
    /// Runs at most once per `analysis_interval_ms`; otherwise, and
    /// whenever there is not enough history yet, the previous result is
    /// returned unchanged.
    pub fn analyze(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_analysis_ms {
            if now_ms.saturating_sub(last) < self.config.analysis_interval_ms {
                return self.slow_detected;
            }
        }
        self.last_analysis_ms = Some(now_ms);

        let (oldest, newest) = match (self.samples.front(), self.samples.back()) {
            (Some(o), Some(n)) if self.samples.len() >= 2 => (o.timestamp_ms, n.timestamp_ms),
            _ => return self.slow_detected,
        };

        let duration_ms = newest.saturating_sub(oldest);
        if duration_ms < self.config.min_history_ms {
            return self.slow_detected;
        }

        let speed = self.speed_dp_per_sec(duration_ms);
        let threshold = if self.slow_detected {
            self.config.slow_threshold_dp * self.config.exit_multiplier
        } else {
            self.config.slow_threshold_dp
        };
        let was = self.slow_detected;
        self.slow_detected = speed < threshold;
        if was != self.slow_detected {
            debug!(speed, threshold, slow = self.slow_detected, "movement mode changed");
        }
        self.slow_detected
    }

    /// Last computed result.
    pub fn is_slow(&self) -> bool {
        self.slow_detected
    }

    /// Drop all samples and return to the default "not slow" state.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.slow_detected = false;
        self.last_analysis_ms = None;
    }

    /// Number of samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    // ── Internal ─────────────────────────────────────────────────

    fn evict(&mut self, now_ms: u64) {
        while let Some(front) = self.samples.front() {
            if now_ms.saturating_sub(front.timestamp_ms) > self.config.window_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Cumulative path length, skipping single-segment jumps larger than
    /// ten times the threshold (finger lifted and re-acquired).
    fn path_length(&self) -> f32 {
        let jump = self.config.slow_threshold_dp * 10.0;
        self.samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .map(|(a, b)| ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt())
            .filter(|&d| d <= jump)
            .sum()
    }

    fn speed_dp_per_sec(&self, duration_ms: u64) -> f32 {
        if duration_ms == 0 {
            return 0.0;
        }
        let distance_dp = self.path_length() / self.density * self.config.dp_to_px_ratio;
        distance_dp / (duration_ms as f32 / 1000.0)
    }
}

// ── Tests ────────────────────────────────────────────────────────
