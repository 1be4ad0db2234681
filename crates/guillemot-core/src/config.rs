//! # Configuration
//!
//! Runtime settings for the live-reload host. These tune the host, not the engine: the engine's
//! own configuration is the opaque document owned by the editor.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the session actor, the render loop and the reload controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Render loop ticks per second (the stand-in for display refresh). Default: 60.
    pub refresh_hz: f64,
    /// Capacity of the session command channel. Default: 32.
    pub command_buffer: usize,
    /// Capacity of the session event bus. Default: 100.
    pub event_capacity: usize,
    /// Editor key chord that triggers a full update. Default: `Mod-Enter`.
    pub reload_chord: String,
    /// Viewport assumed until the surface is first measured. Default: 600x600.
    pub initial_viewport: [f32; 2],
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            refresh_hz: 60.0,
            command_buffer: 32,
            event_capacity: 100,
            reload_chord: "Mod-Enter".to_string(),
            initial_viewport: [600.0, 600.0],
        }
    }
}

impl LiveConfig {
    /// Defaults overlaid with `GUILLEMOT_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(hz) = env_parse("GUILLEMOT_REFRESH_HZ") {
            config.refresh_hz = hz;
        }
        if let Some(size) = env_parse("GUILLEMOT_COMMAND_BUFFER") {
            config.command_buffer = size;
        }
        if let Some(size) = env_parse("GUILLEMOT_EVENT_CAPACITY") {
            config.event_capacity = size;
        }
        if let Ok(chord) = env::var("GUILLEMOT_RELOAD_CHORD")
            && !chord.trim().is_empty()
        {
            config.reload_chord = chord;
        }
        config
    }

    /// Parses a YAML document; missing fields take their defaults.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.refresh_hz.is_finite() && self.refresh_hz > 0.0) {
            return Err(ConfigError::RefreshRate(self.refresh_hz));
        }
        if self.command_buffer == 0 {
            return Err(ConfigError::Capacity("command_buffer"));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Capacity("event_capacity"));
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
