//! Interaction tuning: animation durations, gesture thresholds, fling physics.
//!
//! [`InteractionConfig`] follows the builder style used for application
//! configuration: start from `default()` and chain `with_*` setters.

/// Errors from [`InteractionConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("fling_deceleration must be negative, got {0}")]
    DecelerationNotNegative(f32),
}

/// Tunables shared by the focus navigator, gesture recognizers and the
/// animations they trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Duration of the focus highlight fade, in milliseconds.
    pub highlight_duration_ms: u32,
    /// Duration of each half of the click pulse, in milliseconds.
    pub click_pulse_duration_ms: u32,
    /// Duration of the "no focus target" shake, in milliseconds.
    pub shake_duration_ms: u32,
    /// Peak displacement of the shake, in layout units.
    pub shake_amplitude: f32,
    /// Movement a pan must exceed on either axis before it commits.
    pub pan_threshold: f32,
    /// Frame rate assumed when converting position history into velocity.
    pub frame_rate: f32,
    /// Deceleration applied to a fling after release (units/s², negative).
    pub fling_deceleration: f32,
    /// Base spacing between siblings in the layout bridge.
    pub list_spacing: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            highlight_duration_ms: 100,
            click_pulse_duration_ms: 100,
            shake_duration_ms: 400,
            shake_amplitude: 15.0,
            pan_threshold: 10.0,
            frame_rate: 60.0,
            fling_deceleration: -5000.0,
            list_spacing: 8.0,
        }
    }
}

impl InteractionConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the highlight fade duration (builder).
    pub fn with_highlight_duration(mut self, ms: u32) -> Self {
        self.highlight_duration_ms = ms;
        self
    }

    /// Set the click pulse duration (builder).
    pub fn with_click_pulse_duration(mut self, ms: u32) -> Self {
        self.click_pulse_duration_ms = ms;
        self
    }

    /// Set the shake duration and amplitude (builder).
    pub fn with_shake(mut self, ms: u32, amplitude: f32) -> Self {
        self.shake_duration_ms = ms;
        self.shake_amplitude = amplitude;
        self
    }

    /// Set the pan commit threshold (builder).
    pub fn with_pan_threshold(mut self, threshold: f32) -> Self {
        self.pan_threshold = threshold;
        self
    }

    /// Set the assumed frame rate (builder).
    pub fn with_frame_rate(mut self, fps: f32) -> Self {
        self.frame_rate = fps;
        self
    }

    /// Set the fling deceleration (builder).
    pub fn with_fling_deceleration(mut self, deceleration: f32) -> Self {
        self.fling_deceleration = deceleration;
        self
    }

    /// Set the base sibling spacing (builder).
    pub fn with_list_spacing(mut self, spacing: f32) -> Self {
        self.list_spacing = spacing;
        self
    }

    /// Check that every tunable is in its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("highlight_duration_ms", self.highlight_duration_ms),
            ("click_pulse_duration_ms", self.click_pulse_duration_ms),
            ("shake_duration_ms", self.shake_duration_ms),
        ];
        for (field, value) in durations {
            if value == 0 {
                return Err(ConfigError::NotPositive { field, value: 0.0 });
            }
        }
        for (field, value) in [("pan_threshold", self.pan_threshold), ("frame_rate", self.frame_rate)] {
            if value <= 0.0 || value.is_nan() {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.fling_deceleration >= 0.0 || self.fling_deceleration.is_nan() {
            return Err(ConfigError::DecelerationNotNegative(self.fling_deceleration));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = InteractionConfig::new();
        assert_eq!(config.highlight_duration_ms, 100);
        assert_eq!(config.pan_threshold, 10.0);
        assert_eq!(config.frame_rate, 60.0);
        assert_eq!(config.fling_deceleration, -5000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder() {
        let config = InteractionConfig::new()
            .with_highlight_duration(250)
            .with_click_pulse_duration(80)
            .with_shake(300, 10.0)
            .with_pan_threshold(4.0)
            .with_frame_rate(120.0)
            .with_fling_deceleration(-2000.0)
            .with_list_spacing(12.0);
        assert_eq!(config.highlight_duration_ms, 250);
        assert_eq!(config.click_pulse_duration_ms, 80);
        assert_eq!(config.shake_duration_ms, 300);
        assert_eq!(config.shake_amplitude, 10.0);
        assert_eq!(config.pan_threshold, 4.0);
        assert_eq!(config.frame_rate, 120.0);
        assert_eq!(config.fling_deceleration, -2000.0);
        assert_eq!(config.list_spacing, 12.0);
    }

    #[test]
    fn zero_duration_rejected() {
        let config = InteractionConfig::new().with_highlight_duration(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "highlight_duration_ms", value: 0.0 })
        );
    }

    #[test]
    fn zero_frame_rate_rejected() {
        let config = InteractionConfig::new().with_frame_rate(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "frame_rate", .. })
        ));
    }

    #[test]
    fn positive_deceleration_rejected() {
        let config = InteractionConfig::new().with_fling_deceleration(100.0);
        assert_eq!(config.validate(), Err(ConfigError::DecelerationNotNegative(100.0)));
    }
}
