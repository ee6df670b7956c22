/// Player configuration
use crate::error::{PlaybackError, Result};
use crate::scrubber::ScrubMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file looked up in the working directory
const CONFIG_FILE: &str = "tilawa.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Seconds moved by the skip buttons (default: 10)
    #[serde(default = "default_skip_seconds")]
    pub skip_seconds: f64,

    /// When scrubber drags seek the media (default: on release)
    #[serde(default)]
    pub scrub_mode: ScrubMode,

    /// Keep invoking `on_time_update` while the scrubber is dragged (default: true)
    #[serde(default = "default_enabled")]
    pub emit_time_updates_while_dragging: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            skip_seconds: default_skip_seconds(),
            scrub_mode: ScrubMode::default(),
            emit_time_updates_while_dragging: default_enabled(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from `tilawa.toml` (if present) and environment
    ///
    /// Environment variables are prefixed with `TILAWA_`, e.g.
    /// `TILAWA_SKIP_SECONDS=15`.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        Self::build(path.exists().then_some(path))
    }

    /// Load configuration from an explicit file, still honoring the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::build(Some(path.as_ref()))
    }

    fn build(file: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = file {
            settings = settings.add_source(config::File::from(path));
        }

        // Prefix separator "_" is kept, field separator is "__" so that
        // TILAWA_SKIP_SECONDS maps to skip_seconds.
        settings = settings.add_source(
            config::Environment::with_prefix("TILAWA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        config.validate()?;
        tracing::debug!(?config, "Player configuration loaded");
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.skip_seconds.is_finite() && self.skip_seconds > 0.0) {
            return Err(PlaybackError::Config(format!(
                "skip_seconds must be a positive number, got {}",
                self.skip_seconds
            )));
        }

        Ok(())
    }
}

// Default values
fn default_skip_seconds() -> f64 {
    10.0
}

fn default_enabled() -> bool {
    true
}
