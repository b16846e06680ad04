//! Browser platform layer (wasm32 only)
//!
//! - `dom`: applies view models to the page and reads the editor form
//! - `download`: offers a generated file for download

pub mod dom;
pub mod download;

pub use dom::Page;
pub use download::offer_download;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

/// Read a user-picked file as text
pub async fn read_file_text(file: &File) -> Result<String, JsValue> {
    let text = JsFuture::from(file.text()).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("file content is not text"))
}

/// Wrap any error as a thrown JS `Error`
pub fn js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Blocking notice
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Blocking yes/no question; anything but an explicit yes is no
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
