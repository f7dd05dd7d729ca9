use serde::{Deserialize, Serialize};
use vent_types::{CircularVent, RectangularVent, SlotVent, VentKind, VentSpec};

/// Command definition and dialog defaults.
///
/// Every field has a default, so a JSON document only needs to name what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    pub command_id: String,
    pub command_name: String,
    pub defaults: VentDefaults,
    pub count_limits: CountLimits,
    /// First paragraph of the message shown when an attempt fails.
    pub failure_prefix: String,
    /// Last paragraph of the message shown when an attempt fails.
    pub failure_suffix: String,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            command_id: "cmdID_ventMaker".to_string(),
            command_name: "Vent Maker".to_string(),
            defaults: VentDefaults::default(),
            count_limits: CountLimits::default(),
            failure_prefix: "Sorry those inputs are invalid.".to_string(),
            failure_suffix: "Please try again.".to_string(),
        }
    }
}

impl CommandConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = self.count_limits;
        if limits.min < 1 || limits.min > limits.max {
            return Err(ConfigError::Invalid {
                reason: format!("count limits {}..={} are empty or below 1", limits.min, limits.max),
            });
        }
        if limits.max > i64::from(u32::MAX) {
            return Err(ConfigError::Invalid {
                reason: format!("count limit {} does not fit a count", limits.max),
            });
        }
        let d = &self.defaults;
        for count in [d.cols, d.rows, d.axial_count, d.radial_count] {
            if !limits.contains(i64::from(count)) {
                return Err(ConfigError::Invalid {
                    reason: format!("default count {count} is outside the spinner limits"),
                });
            }
        }
        Ok(())
    }

    /// Message shown to the user when an attempt fails with `error`.
    pub fn failure_message(&self, error: &dyn std::fmt::Display) -> String {
        format!("{}\n\n{}\n\n{}", self.failure_prefix, error, self.failure_suffix)
    }
}

/// Values the dialog opens with. Lengths are in document units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VentDefaults {
    pub vent_type: VentKind,
    pub width: f64,
    pub height: f64,
    pub border: f64,
    pub corner_radius: f64,
    pub cols: u32,
    pub rows: u32,
    pub vent_radius: f64,
    /// Rings of a hub-and-spoke vent, counting the boundary.
    pub radial_count: u32,
    /// Spokes of a hub-and-spoke vent.
    pub axial_count: u32,
}

impl Default for VentDefaults {
    fn default() -> Self {
        Self {
            vent_type: VentKind::Circular,
            width: 10.0,
            height: 4.0,
            border: 0.1,
            corner_radius: 0.1,
            cols: 3,
            rows: 6,
            vent_radius: 5.0,
            radial_count: 3,
            axial_count: 5,
        }
    }
}

impl VentDefaults {
    /// The default definition of a variant.
    pub fn spec(&self, kind: VentKind) -> VentSpec {
        match kind {
            VentKind::Circular => VentSpec::Circular(CircularVent {
                radius: self.vent_radius,
                border: self.border,
                axial_count: self.axial_count,
                radial_count: self.radial_count,
            }),
            VentKind::Slot => VentSpec::Slot(SlotVent {
                width: self.width,
                height: self.height,
                border: self.border,
                cols: self.cols,
                rows: self.rows,
            }),
            VentKind::Rectangular => VentSpec::Rectangular(RectangularVent {
                width: self.width,
                height: self.height,
                border: self.border,
                cols: self.cols,
                rows: self.rows,
                corner_radius: self.corner_radius,
            }),
        }
    }
}

/// Inclusive range of the integer spinners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountLimits {
    pub min: i64,
    pub max: i64,
}

impl Default for CountLimits {
    fn default() -> Self {
        Self { min: 1, max: 99 }
    }
}

impl CountLimits {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Errors from loading a [`CommandConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot parse command config: {reason}")]
    Parse { reason: String },

    #[error("invalid command config: {reason}")]
    Invalid { reason: String },
}
