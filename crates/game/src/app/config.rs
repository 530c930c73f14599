use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::registry::{ActorId, Cosmetics};

pub(crate) const CONFIG_ENV_VAR: &str = "PORTAL_CONFIG";
pub(crate) const DISPLAY_COUNT_ENV_VAR: &str = "PORTAL_DISPLAY_COUNT";

/// Tunables read at startup. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) move_speed: f32,
    pub(crate) portal_width: f32,
    pub(crate) portal_height: f32,
    pub(crate) spawn_inset: f32,
    pub(crate) spawn_offset_y: f32,
    pub(crate) display_count: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            move_speed: 200.0,
            portal_width: 40.0,
            portal_height: 120.0,
            spawn_inset: 80.0,
            spawn_offset_y: 60.0,
            display_count: 0,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl GameConfig {
    /// Loads from the file named by `PORTAL_CONFIG`, or the defaults when it
    /// is unset. `PORTAL_DISPLAY_COUNT` then overrides the display count.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_path(Path::new(&path))?,
            None => Self::default(),
        };
        config.display_count =
            display_count_from(env::var(DISPLAY_COUNT_ENV_VAR), config.display_count);
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&raw).map_err(|(field, source)| ConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn from_json(raw: &str) -> Result<Self, (String, serde_json::Error)> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, Self>(&mut deserializer).map_err(|error| {
            let field = error.path().to_string();
            (field, error.into_inner())
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive finite number, got {value}"),
                })
            }
        };
        positive("move_speed", self.move_speed)?;
        positive("portal_width", self.portal_width)?;
        positive("portal_height", self.portal_height)?;
        positive("spawn_inset", self.spawn_inset)?;
        if !self.spawn_offset_y.is_finite() || self.spawn_offset_y < 0.0 {
            return Err(ConfigError::Invalid {
                field: "spawn_offset_y",
                reason: format!("expected a non-negative number, got {}", self.spawn_offset_y),
            });
        }
        if self.window_width % 2 != 0 {
            return Err(ConfigError::Invalid {
                field: "window_width",
                reason: format!("must be even, got {}", self.window_width),
            });
        }
        let zone_width = self.zone_width();
        if zone_width < self.portal_width * 2.0 {
            return Err(ConfigError::Invalid {
                field: "window_width",
                reason: format!(
                    "each zone is {zone_width}px wide but needs at least {}px for the portal",
                    self.portal_width * 2.0
                ),
            });
        }
        if (self.window_height as f32) < self.portal_height {
            return Err(ConfigError::Invalid {
                field: "window_height",
                reason: format!(
                    "must be at least the portal height {}, got {}",
                    self.portal_height, self.window_height
                ),
            });
        }
        // An arrival overlapping the destination portal is sent straight back.
        let half_footprint = widest_half_footprint();
        if self.spawn_inset - half_footprint < self.portal_width {
            return Err(ConfigError::Invalid {
                field: "spawn_inset",
                reason: format!(
                    "must be at least portal_width + {half_footprint} = {}, got {}",
                    self.portal_width + half_footprint,
                    self.spawn_inset
                ),
            });
        }
        if self.spawn_inset + half_footprint > zone_width {
            return Err(ConfigError::Invalid {
                field: "spawn_inset",
                reason: format!(
                    "must leave the actor inside the {zone_width}px zone, got {}",
                    self.spawn_inset
                ),
            });
        }
        Ok(())
    }

    /// Each zone takes half the canvas.
    pub(crate) fn zone_width(&self) -> f32 {
        (self.window_width / 2) as f32
    }

    pub(crate) fn zone_height(&self) -> f32 {
        self.window_height as f32
    }
}

fn widest_half_footprint() -> f32 {
    [ActorId::Player1, ActorId::Player2]
        .into_iter()
        .map(|actor_id| Cosmetics::for_actor(actor_id).half_extents.x)
        .fold(0.0, f32::max)
}

fn display_count_from(raw: Result<String, env::VarError>, fallback: u32) -> u32 {
    match raw {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(count) => count,
            Err(_) => {
                warn!(
                    env_var = DISPLAY_COUNT_ENV_VAR,
                    value = value.as_str(),
                    "invalid display-count env var value; falling back to config"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(
                env_var = DISPLAY_COUNT_ENV_VAR,
                error = %err,
                "unable to read display-count env var; falling back to config"
            );
            fallback
        }
    }
}
