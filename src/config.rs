//! Page configuration read from the URL query string.
//!
//! ```text
//! ?effects=glitch,sobel&dpr=2&seed=7&damping=0&edge-resize=1&canvas=stage
//! ```

use crate::effects::{Toggle, ToggleState};
use crate::error::ConfigError;

pub const DEFAULT_CANVAS_ID: &str = "canvas";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub canvas_id: String,
    /// Initial state of the optional stages.
    pub toggles: ToggleState,
    /// Overrides `window.devicePixelRatio` when set.
    pub pixel_ratio: Option<f32>,
    /// Glitch RNG seed; drawn at startup when unset.
    pub seed: Option<u64>,
    pub damping: bool,
    /// Refresh the Sobel resolution when the viewport changes.
    pub edge_resize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
            toggles: ToggleState::default(),
            pixel_ratio: None,
            seed: None,
            damping: true,
            edge_resize: false,
        }
    }
}

impl Config {
    /// Parse `location.search`, with or without the leading `?`. Keys and
    /// values are form-urlencoded, as `URLSearchParams` writes them.
    pub fn from_query(query: &str) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let (key, value) = (&*key, &*value);
            match key {
                "effects" => {
                    for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                        let toggle = Toggle::from_key(name)
                            .ok_or_else(|| ConfigError::UnknownEffect(name.to_string()))?;
                        config.toggles.set(toggle, true);
                    }
                }
                "dpr" => {
                    let dpr = value
                        .parse::<f32>()
                        .ok()
                        .filter(|d| d.is_finite() && *d > 0.0)
                        .ok_or_else(|| invalid(key, value))?;
                    config.pixel_ratio = Some(dpr);
                }
                "seed" => {
                    config.seed = Some(value.parse().map_err(|_| invalid(key, value))?);
                }
                "damping" => config.damping = parse_flag(key, value)?,
                "edge-resize" => config.edge_resize = parse_flag(key, value)?,
                "canvas" if value.is_empty() => {
                    tracing::warn!(canvas = DEFAULT_CANVAS_ID, "empty canvas id, keeping default")
                }
                "canvas" => config.canvas_id = value.to_string(),
                _ => tracing::warn!(key, "ignoring unknown query parameter"),
            }
        }
        Ok(config)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "" | "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}
