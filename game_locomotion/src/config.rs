use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(io::Error),
    #[error(transparent)]
    Toml(toml::de::Error),
}

/// Tuning values of a [`LocomotionController`].
///
/// The values are read once when the controller is built and cannot be
/// changed afterwards.
///
/// [`LocomotionController`]: crate::LocomotionController
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocomotionConfig {
    /// Turn speed in degrees per second while moving forward at full speed.
    ///
    /// Defaults to `360.0`.
    pub moving_turn_speed: f32,
    /// Turn speed in degrees per second while standing still.
    ///
    /// Defaults to `180.0`.
    pub stationary_turn_speed: f32,
    /// Vertical launch velocity of a jump.
    pub jump_power: f32,
    /// Phase offset applied to the animation cycle before choosing the
    /// leading leg of a jump.
    pub run_cycle_leg_offset: f32,
    /// Scales the animation root displacement before it is turned into a
    /// velocity.
    pub move_speed_multiplier: f32,
    /// Animation playback speed while grounded and moving.
    pub anim_speed_multiplier: f32,
    /// Length of the downward ground probe.
    pub ground_check_distance: f32,
    /// Height above the feet at which the ground probe starts.
    pub probe_origin_offset: f32,
    /// Damping time in seconds for the `Forward` and `Turn` parameters.
    pub parameter_damp_time: f32,
    /// Name of the animator state in which a jump may start.
    pub grounded_state: String,
}

impl LocomotionConfig {
    /// Loads the config from the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let mut file = File::open(path).map_err(ConfigError::Io)?;

        let mut buf = String::new();
        file.read_to_string(&mut buf).map_err(ConfigError::Io)?;

        Self::from_toml(&buf)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if `s` is not a valid config.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Returns the name of the first field holding a value that the
    /// controller cannot work with.
    pub(crate) fn invalid_field(&self) -> Option<&'static str> {
        let finite = [
            ("moving_turn_speed", self.moving_turn_speed),
            ("stationary_turn_speed", self.stationary_turn_speed),
            ("jump_power", self.jump_power),
            ("run_cycle_leg_offset", self.run_cycle_leg_offset),
            ("move_speed_multiplier", self.move_speed_multiplier),
            ("anim_speed_multiplier", self.anim_speed_multiplier),
        ];

        for (name, value) in finite {
            if !value.is_finite() {
                return Some(name);
            }
        }

        let non_negative = [
            ("ground_check_distance", self.ground_check_distance),
            ("probe_origin_offset", self.probe_origin_offset),
            ("parameter_damp_time", self.parameter_damp_time),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Some(name);
            }
        }

        if self.grounded_state.is_empty() {
            return Some("grounded_state");
        }

        None
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            moving_turn_speed: 360.0,
            stationary_turn_speed: 180.0,
            jump_power: 8.0,
            run_cycle_leg_offset: 0.2,
            move_speed_multiplier: 1.0,
            anim_speed_multiplier: 1.0,
            ground_check_distance: 0.1,
            probe_origin_offset: 0.1,
            parameter_damp_time: 0.1,
            grounded_state: String::from("Grounded"),
        }
    }
}
