/// Tunable constants.
///
/// `Tuning::default()` reproduces the shipped level; a JSON file may
/// override any subset of fields (missing fields fall back to defaults).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::{PlatformKind, Vec2};
use crate::error::ConfigError;

/// Seconds per physics step (≈60 Hz).
pub const FIXED_TIMESTEP: f32 = 0.0166666;

/// Idle descent rate the vertical counter-thrust leaves alone.
pub const HOVER_VELOCITY: f32 = -0.25;

/// Physics steps a single rendered frame may run before the backlog is dropped.
pub const MAX_STEPS_PER_FRAME: u32 = 8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub fixed_timestep: f32,
    pub max_steps_per_frame: u32,
    /// Sprite frames shown per second while the lander is steering.
    pub animation_fps: f32,
    /// Fuel burned per thrusting axis per step.
    pub fuel_per_axis: f32,
    pub hover_velocity: f32,
    pub player: PlayerSpec,
    pub platforms: Vec<PlatformSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSpec {
    pub spawn: Vec2,
    pub speed: f32,
    /// Acceleration the lander carries at spawn, before its first step.
    /// Steering derives a fresh acceleration every step, so this never
    /// shapes a trajectory; it only shows in a snapshot taken at spawn.
    pub gravity: f32,
    pub jump_power: f32,
    pub fuel: f32,
    pub width: f32,
    pub height: f32,
    pub size: Vec2,
    pub animation_frames: usize,
    pub animation_cols: usize,
    pub animation_rows: usize,
    /// Atlas indices per facing, ordered left, right, up, down.
    pub walking: Vec<Vec<usize>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub kind: PlatformKind,
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub size: Vec2,
}

impl Default for Tuning {
    fn default() -> Self {
        let hazard = |x: f32| PlatformSpec {
            kind: PlatformKind::Hazard,
            position: Vec2::new(x, -1.75),
            width: 0.765,
            height: 0.765,
            size: Vec2::new(0.765, 0.765),
        };
        let pad = |x: f32| PlatformSpec {
            kind: PlatformKind::Safe,
            position: Vec2::new(x, -3.15),
            width: 0.25,
            height: 1.0,
            size: Vec2::new(1.128, 1.114),
        };

        Self {
            fixed_timestep: FIXED_TIMESTEP,
            max_steps_per_frame: MAX_STEPS_PER_FRAME,
            animation_fps: 4.0,
            fuel_per_axis: 0.2,
            hover_velocity: HOVER_VELOCITY,
            player: PlayerSpec::default(),
            platforms: vec![hazard(-3.5), hazard(3.5), hazard(0.0), pad(-1.95), pad(1.95)],
        }
    }
}

impl Default for PlayerSpec {
    fn default() -> Self {
        Self {
            spawn: Vec2::new(0.0, 3.0),
            speed: 3.0,
            gravity: -4.905,
            jump_power: 3.0,
            fuel: 100.0,
            width: 0.9,
            height: 0.9,
            size: Vec2::new(1.0, 1.0),
            animation_frames: 4,
            animation_cols: 4,
            animation_rows: 4,
            walking: vec![
                vec![4, 5, 6, 7],     // left
                vec![8, 9, 10, 11],   // right
                vec![0, 1, 2, 3],     // up
                vec![12, 13, 14, 15], // down
            ],
        }
    }
}

impl Tuning {
    /// Read, parse and validate a JSON tuning file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let tuning: Tuning = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tuning.validate()?;
        tracing::info!(path = %path.display(), "loaded tuning");
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("fixed_timestep", self.fixed_timestep)?;
        positive("max_steps_per_frame", self.max_steps_per_frame as f32)?;
        positive("animation_fps", self.animation_fps)?;
        non_negative("fuel_per_axis", self.fuel_per_axis)?;
        finite("hover_velocity", self.hover_velocity)?;

        let p = &self.player;
        finite("player.spawn.x", p.spawn.x)?;
        finite("player.spawn.y", p.spawn.y)?;
        finite("player.gravity", p.gravity)?;
        non_negative("player.speed", p.speed)?;
        non_negative("player.jump_power", p.jump_power)?;
        non_negative("player.fuel", p.fuel)?;
        non_negative("player.width", p.width)?;
        non_negative("player.height", p.height)?;
        non_negative("player.size.x", p.size.x)?;
        non_negative("player.size.y", p.size.y)?;

        let cells = p.animation_cols * p.animation_rows;
        for (row, indices) in p.walking.iter().enumerate() {
            if indices.len() < p.animation_frames {
                return Err(ConfigError::FrameTableTooShort {
                    row,
                    len: indices.len(),
                    frames: p.animation_frames,
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i >= cells) {
                return Err(ConfigError::FrameIndexOutOfAtlas { row, index, cells });
            }
        }

        for platform in &self.platforms {
            finite("platforms.position.x", platform.position.x)?;
            finite("platforms.position.y", platform.position.y)?;
            non_negative("platforms.width", platform.width)?;
            non_negative("platforms.height", platform.height)?;
            non_negative("platforms.size.x", platform.size.x)?;
            non_negative("platforms.size.y", platform.size.y)?;
        }
        Ok(())
    }

    /// Seconds a sprite frame stays on screen.
    pub fn seconds_per_frame(&self) -> f32 {
        1.0 / self.animation_fps
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}
