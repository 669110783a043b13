use serde::Deserialize;

use crate::error::ConfigError;

/// Id of the element holding optional JSON configuration.
pub const CONFIG_ELEMENT_ID: &str = "playpause-config";

/// Player settings read from the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    #[serde(default = "default_control_id")]
    pub control_id: String,
    #[serde(default = "default_media_selector")]
    pub media_selector: String,
    #[serde(default = "default_playing_class")]
    pub playing_class: String,
    /// Sibling nodes between an element and its control, counting the control.
    #[serde(default = "default_control_offset")]
    pub control_offset: usize,
    /// Also drop the playing class when playback is paused by hand.
    #[serde(default)]
    pub clear_on_pause: bool,
    /// Give every paired control its own activation listener.
    #[serde(default)]
    pub toggle_every_pair: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_control_id() -> String {
    "playpause".to_string()
}

fn default_media_selector() -> String {
    "audio".to_string()
}

fn default_playing_class() -> String {
    "jp-state-playing".to_string()
}

fn default_control_offset() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            control_id: default_control_id(),
            media_selector: default_media_selector(),
            playing_class: default_playing_class(),
            control_offset: default_control_offset(),
            clear_on_pause: false,
            toggle_every_pair: false,
            log_level: default_log_level(),
        }
    }
}

impl PlayerConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.control_id.trim().is_empty() {
            return Err(ConfigError::Invalid("control_id is empty".to_string()));
        }
        if self.media_selector.trim().is_empty() {
            return Err(ConfigError::Invalid("media_selector is empty".to_string()));
        }
        if self.playing_class.trim().is_empty() || self.playing_class.contains(char::is_whitespace)
        {
            return Err(ConfigError::Invalid(format!(
                "playing_class `{}` is not a single class name",
                self.playing_class
            )));
        }
        if self.control_offset == 0 {
            return Err(ConfigError::Invalid(
                "control_offset must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Max log level, falling back to `Info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .trim()
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }
}
