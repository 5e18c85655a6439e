//! Session configuration.
//!
//! Every gameplay tunable lives here instead of being hard-coded. Sections
//! default to the values the game was balanced with, so a TOML file only has
//! to name what it changes:
//!
//! ```toml
//! [crane]
//! move_speed = 5.0
//! x_limit = 3.0
//!
//! [lose]
//! floor = -8.0
//! ```

use std::path::Path;

use anyhow::Context as _;
use instant::Duration;
use serde::{Deserialize, Serialize};

use crate::{error::StackError, physics::Ground};

/// Crane movement, drop and respawn behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraneConfig {
    /// Units per second.
    pub move_speed: f32,
    /// Degrees per second.
    pub rotate_speed: f32,
    /// Symmetric bound on x while the block is controlled.
    pub x_limit: f32,
    /// Symmetric bound on z while the block is controlled.
    pub z_limit: f32,
    /// Whether forward/back input moves the block along z.
    pub depth_movement: bool,
    /// Dropped blocks slower than this count as settled.
    pub stop_speed_threshold: f32,
    /// Seconds between settling and the next spawn.
    pub next_spawn_delay: f32,
    /// Where new blocks appear. Falls back to the crane's own origin.
    pub spawn_point: Option<[f32; 3]>,
    pub spawn_height_offset: f32,
}

impl Default for CraneConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            rotate_speed: 120.0,
            x_limit: 6.0,
            z_limit: 6.0,
            depth_movement: true,
            stop_speed_threshold: 0.05,
            next_spawn_delay: 0.7,
            spawn_point: None,
            spawn_height_offset: 0.0,
        }
    }
}

impl CraneConfig {
    /// Respawn delay as a duration. Negative or NaN delays count as zero,
    /// delays too long for a `Duration` saturate.
    pub fn next_spawn_delay(&self) -> Duration {
        Duration::try_from_secs_f32(self.next_spawn_delay.max(0.0)).unwrap_or(Duration::MAX)
    }
}

/// Rigid body settings stamped onto every new block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass: 2.0,
            linear_damping: 0.2,
            angular_damping: 0.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoseConfig {
    /// A block whose y drops below this ends the game.
    pub floor: f32,
}

impl Default for LoseConfig {
    fn default() -> Self {
        Self { floor: -5.0 }
    }
}

/// Settings for the bundled stand-in simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub ground: Option<Ground>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            ground: Some(Ground::default()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub crane: CraneConfig,
    pub body: BodyConfig,
    pub lose: LoseConfig,
    pub physics: PhysicsConfig,
}

impl SessionConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, StackError> {
        let config: SessionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("loading config {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), StackError> {
        let non_negative = [
            ("crane.move_speed", self.crane.move_speed),
            ("crane.rotate_speed", self.crane.rotate_speed),
            ("crane.x_limit", self.crane.x_limit),
            ("crane.z_limit", self.crane.z_limit),
            ("crane.next_spawn_delay", self.crane.next_spawn_delay),
            ("body.linear_damping", self.body.linear_damping),
            ("body.angular_damping", self.body.angular_damping),
        ];
        if let Some((name, value)) = non_negative
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(StackError::InvalidConfig(format!(
                "{name} must be a finite, non-negative number, got {value}"
            )));
        }
        if Duration::try_from_secs_f32(self.crane.next_spawn_delay).is_err() {
            return Err(StackError::InvalidConfig(format!(
                "crane.next_spawn_delay is out of range, got {}",
                self.crane.next_spawn_delay
            )));
        }
        if !(self.crane.stop_speed_threshold > 0.0) {
            return Err(StackError::InvalidConfig(format!(
                "crane.stop_speed_threshold must be positive, got {}",
                self.crane.stop_speed_threshold
            )));
        }
        if !(self.body.mass > 0.0) {
            return Err(StackError::InvalidConfig(format!(
                "body.mass must be positive, got {}",
                self.body.mass
            )));
        }
        if !self.lose.floor.is_finite() {
            return Err(StackError::InvalidConfig("lose.floor must be finite".into()));
        }
        Ok(())
    }
}
