/// Tunable constants and the optional `penguin_run.toml` loader.
///
/// Every gameplay number lives in [`Tuning`], which is `Copy` and travels
/// inside the run state so the pure update functions never reach for
/// globals.  [`GameConfig`] wraps it with front-end settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PENGUIN_RUN_CONFIG";

/// Looked up in the working directory when `CONFIG_ENV` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "penguin_run.toml";

// ── Gameplay tuning ───────────────────────────────────────────────────────────

/// All gameplay constants.  Distances are in canvas pixels, velocities in
/// pixels per frame, delays in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Height of the snow-block strip the penguin runs on.
    pub platform_height: f64,

    pub player_x: f64,
    pub player_size: f64,
    /// Vertical velocity applied on jump (negative = upward).
    pub jump_power: f64,
    pub gravity: f64,

    pub base_speed: f64,
    pub speed_step: f64,
    pub points_per_speed_step: u32,

    pub obstacle_size: f64,
    /// Distance past the right edge at which obstacles appear.
    pub spawn_margin: f64,
    pub flying_speed_multiplier: f64,
    /// Chance of an airborne spawn when only a ground obstacle is on screen.
    pub flying_bias: f64,
    pub flying_top_margin: f64,
    pub flying_bottom_margin: f64,
    /// Ground obstacles stay at least this far below the max jump height.
    pub ground_height_margin: f64,
    /// Ground obstacles sink this far into the platform.
    pub ground_sink: f64,

    pub base_gap: f64,
    pub gap_jitter: f64,
    pub gap_per_speed: f64,
    pub flying_extra_gap: f64,

    pub spawn_delay_ms: f64,
    pub spawn_delay_jitter_ms: f64,
    pub flying_extra_delay_ms: f64,
    pub suppressed_retry_ms: f64,
    pub gap_retry_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 400.0,
            platform_height: 64.0,

            player_x: 250.0,
            player_size: 64.0,
            jump_power: -13.0,
            gravity: 0.6,

            base_speed: 6.0,
            speed_step: 1.2,
            points_per_speed_step: 5,

            obstacle_size: 64.0,
            spawn_margin: 60.0,
            flying_speed_multiplier: 2.0,
            flying_bias: 0.7,
            flying_top_margin: 30.0,
            flying_bottom_margin: 50.0,
            ground_height_margin: 20.0,
            ground_sink: 5.0,

            base_gap: 250.0,
            gap_jitter: 150.0,
            gap_per_speed: 20.0,
            flying_extra_gap: 100.0,

            spawn_delay_ms: 1000.0,
            spawn_delay_jitter_ms: 1000.0,
            flying_extra_delay_ms: 500.0,
            suppressed_retry_ms: 200.0,
            gap_retry_ms: 100.0,
        }
    }
}

impl Tuning {
    /// Top edge of the platform; the penguin's feet rest here.
    pub fn platform_level(&self) -> f64 {
        self.canvas_height - self.platform_height
    }

    /// Peak displacement of a jump: `v² / 2g`.
    pub fn max_jump_height(&self) -> f64 {
        (self.jump_power * self.jump_power) / (2.0 * self.gravity)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 7] = [
            ("tuning.canvas_width", self.canvas_width),
            ("tuning.canvas_height", self.canvas_height),
            ("tuning.player_size", self.player_size),
            ("tuning.gravity", self.gravity),
            ("tuning.base_speed", self.base_speed),
            ("tuning.obstacle_size", self.obstacle_size),
            ("tuning.flying_speed_multiplier", self.flying_speed_multiplier),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        if !(self.jump_power < 0.0) {
            return Err(invalid(
                "tuning.jump_power",
                format!("must be negative (upward), got {}", self.jump_power),
            ));
        }
        if !(0.0..=1.0).contains(&self.flying_bias) {
            return Err(invalid(
                "tuning.flying_bias",
                format!("must be a probability, got {}", self.flying_bias),
            ));
        }
        if self.points_per_speed_step == 0 {
            return Err(invalid("tuning.points_per_speed_step", "must be at least 1".into()));
        }
        if self.platform_height >= self.canvas_height {
            return Err(invalid(
                "tuning.platform_height",
                "must be smaller than the canvas height".into(),
            ));
        }

        // Ground obstacles need a positive height and the airborne band must
        // not be empty, or nothing could be spawned.
        if self.max_jump_height() <= self.ground_height_margin {
            return Err(invalid(
                "tuning.jump_power",
                format!(
                    "max jump height {:.1} does not clear the ground margin {}",
                    self.max_jump_height(),
                    self.ground_height_margin
                ),
            ));
        }
        if self.max_jump_height() + self.flying_top_margin < self.flying_bottom_margin {
            return Err(invalid(
                "tuning.flying_bottom_margin",
                "airborne spawn band is empty".into(),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

// ── Front-end configuration ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tuning: Tuning,
    /// Target frame period of the terminal loop.
    pub frame_ms: u64,
    /// Let the lookahead jump over ground obstacles on its own.
    pub autopilot: bool,
    /// Where `env_logger` output goes; `None` means `$HOME/.penguin_run.log`.
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            frame_ms: 16,
            autopilot: false,
            log_file: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve the config: `$PENGUIN_RUN_CONFIG` if set (must be readable),
    /// else `./penguin_run.toml` if present, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_path(local);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_ms == 0 {
            return Err(invalid("frame_ms", "must be at least 1".into()));
        }
        self.tuning.validate()
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => path.clone(),
            None => {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".penguin_run.log")
            }
        }
    }
}
