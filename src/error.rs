//! Error types shared by the host-side core and the wasm front end.

/// Errors raised while building or driving the renderer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("viewport must be non-empty, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("GPU resource error: {0}")]
    Gpu(&'static str),
    #[error("browser error: {0}")]
    Browser(String),
}

/// Errors from parsing the page query string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown effect: {0:?}")]
    UnknownEffect(String),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Browser(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(err: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
