//! Velocity-based acceleration for relative pointer and scroll input.
//!
//! Shared by single-finger pointer moves (base multiplier 1.0) and
//! two-finger scroll/pan (base around 1.6): faster swipes get a larger
//! multiplier, capped at `max_acceleration`.

use crate::config::AccelerationConfig;

/// Stateful acceleration helper. One instance per gesture stream.
#[derive(Debug, Clone)]
pub struct PointerAccelerationHelper {
    acceleration_factor: f32,
    max_acceleration: f32,
    last_timestamp_ms: Option<u64>,
    last_distance_x: f32,
    last_distance_y: f32,
}

impl PointerAccelerationHelper {
    pub fn new(acceleration_factor: f32, max_acceleration: f32) -> Self {
        Self {
            acceleration_factor,
            max_acceleration,
            last_timestamp_ms: None,
            last_distance_x: 0.0,
            last_distance_y: 0.0,
        }
    }

    pub fn from_config(config: &AccelerationConfig) -> Self {
        Self::new(config.factor, config.max)
    }

    /// Multiplier for a movement sample of `(distance_x, distance_y)` at
    /// `now_ms`.
    ///
    /// The first call after construction or [`reset`](Self::reset)
    /// returns `base_multiplier` unchanged. Later calls add
    /// `speed × factor`, where speed is the larger per-axis change in
    /// distance per millisecond since the previous sample.
    pub fn calculate_acceleration_multiplier(
        &mut self,
        now_ms: u64,
        distance_x: f32,
        distance_y: f32,
        base_multiplier: f32,
    ) -> f32 {
        let mut multiplier = base_multiplier;

        if let Some(last) = self.last_timestamp_ms {
            let elapsed = now_ms.saturating_sub(last);
            if elapsed > 0 {
                let speed_x = (distance_x - self.last_distance_x).abs() / elapsed as f32;
                let speed_y = (distance_y - self.last_distance_y).abs() / elapsed as f32;
                let speed = speed_x.max(speed_y);
                multiplier = (base_multiplier + speed * self.acceleration_factor)
                    .min(self.max_acceleration);
            }
        }

        self.last_distance_x = distance_x;
        self.last_distance_y = distance_y;
        self.last_timestamp_ms = Some(now_ms);

        multiplier
    }

    /// Clear history at a gesture or session boundary.
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
        self.last_distance_x = 0.0;
        self.last_distance_y = 0.0;
    }

    pub fn acceleration_factor(&self) -> f32 {
        self.acceleration_factor
    }

    pub fn max_acceleration(&self) -> f32 {
        self.max_acceleration
    }
}

impl Default for PointerAccelerationHelper {
    fn default() -> Self {
        Self::from_config(&AccelerationConfig::default())
    }
}
