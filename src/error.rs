//! UI Errors
//!
//! Failures surfaced while attaching behavior to the page. None of them are
//! fatal: the controller logs them and keeps the rest of the page working.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum UiError {
    /// A global the page cannot work without (window, document, body)
    #[error("missing page anchor: {0}")]
    MissingAnchor(&'static str),
    #[error("invalid storefront config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for UiError {
    fn from(value: JsValue) -> Self {
        UiError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

pub type UiResult<T> = Result<T, UiError>;
