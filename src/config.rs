use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Suggestion trigger and popup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestionConfig {
    /// Character that opens the suggestion menu
    #[serde(default = "default_trigger_char")]
    pub trigger_char: char,

    /// Allow spaces inside the query (default: false, a space ends the session)
    #[serde(default = "default_false")]
    pub allow_spaces: bool,

    /// Only trigger at the very start of a block
    #[serde(default = "default_false")]
    pub start_of_line: bool,

    /// Characters allowed right before the trigger character.
    /// The start of a block is always allowed; `null` allows any character.
    #[serde(default = "default_allowed_prefixes")]
    pub allowed_prefixes: Option<Vec<char>>,

    /// Floating popup settings
    #[serde(default)]
    pub popup: PopupConfig,
}

fn default_trigger_char() -> char {
    '/'
}

fn default_false() -> bool {
    false
}

fn default_true() -> bool {
    true
}

fn default_allowed_prefixes() -> Option<Vec<char>> {
    Some(vec![' '])
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            trigger_char: default_trigger_char(),
            allow_spaces: false,
            start_of_line: false,
            allowed_prefixes: default_allowed_prefixes(),
            popup: PopupConfig::default(),
        }
    }
}

/// Where the popup sits relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Below the anchor, left edges aligned
    #[default]
    BottomStart,
    /// Below the anchor, right edges aligned
    BottomEnd,
    /// Above the anchor, left edges aligned
    TopStart,
    /// Above the anchor, right edges aligned
    TopEnd,
}

impl Placement {
    pub fn prefers_top(self) -> bool {
        matches!(self, Self::TopStart | Self::TopEnd)
    }

    pub fn aligns_start(self) -> bool {
        matches!(self, Self::BottomStart | Self::TopStart)
    }
}

/// Floating popup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PopupConfig {
    /// Placement relative to the anchor rectangle (flips when there is no room)
    #[serde(default)]
    pub placement: Placement,

    /// Show the popup as soon as it is created
    #[serde(default = "default_true")]
    pub show_on_create: bool,

    /// Accept pointer interaction inside the popup
    #[serde(default = "default_true")]
    pub interactive: bool,

    /// Popup width in cells
    #[serde(default = "default_popup_width")]
    pub width: u16,

    /// Maximum popup height in cells
    #[serde(default = "default_popup_max_height")]
    pub max_height: u16,
}

fn default_popup_width() -> u16 {
    40
}

fn default_popup_max_height() -> u16 {
    12
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            show_on_create: true,
            interactive: true,
            width: default_popup_width(),
            max_height: default_popup_max_height(),
        }
    }
}

impl SuggestionConfig {
    /// Parse and validate a JSON config
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
        let config = Self::from_json(&contents)?;
        tracing::debug!("Loaded suggestion config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when it is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "Using default suggestion config ({}): {}",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// JSON Schema describing this configuration
    pub fn json_schema() -> Result<String, ConfigError> {
        let schema = schemars::schema_for!(SuggestionConfig);
        serde_json::to_string_pretty(&schema)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger_char.is_whitespace() || self.trigger_char.is_control() {
            return Err(ConfigError::ValidationError(format!(
                "trigger_char must be a visible character, got {:?}",
                self.trigger_char
            )));
        }

        if let Some(prefixes) = &self.allowed_prefixes {
            if prefixes.contains(&self.trigger_char) {
                return Err(ConfigError::ValidationError(
                    "allowed_prefixes cannot contain the trigger character".to_string(),
                ));
            }
        }

        if self.popup.width == 0 || self.popup.max_height == 0 {
            return Err(ConfigError::ValidationError(
                "popup width and max_height must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
