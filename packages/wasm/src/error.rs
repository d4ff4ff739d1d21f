//! Error types for the backdrop.
//!
//! Almost nothing in the animation can fail once it is running. Errors come
//! from acquiring the drawing surface at startup, from user-supplied options,
//! and from the browser refusing to schedule a frame.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BackdropError>;

/// Everything that can go wrong while setting up or driving a backdrop.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("no global window available")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("canvas element `{0}` not found")]
    CanvasNotFound(String),

    #[error("element `{0}` is not a canvas")]
    NotACanvas(String),

    #[error("2d drawing context unavailable on canvas `{0}`")]
    ContextUnavailable(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("invalid options: {0}")]
    Options(String),

    #[error("failed to schedule frame: {0}")]
    Schedule(String),
}

impl BackdropError {
    /// Build an `InvalidConfig` error for a named field.
    pub(crate) fn config(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidConfig(format!("{field}: {reason}"))
    }
}

impl From<BackdropError> for JsValue {
    fn from(err: BackdropError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Render a JS exception as text for logging and error payloads.
pub(crate) fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
