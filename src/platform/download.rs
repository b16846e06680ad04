//! File download via a temporary object URL

use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Url};

/// Object URL that is revoked when dropped
struct ObjectUrl(String);

impl ObjectUrl {
    fn for_blob(blob: &Blob) -> Result<Self, JsValue> {
        Url::create_object_url_with_blob(blob).map(Self)
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.0);
        log::debug!("Revoked {}", self.0);
    }
}

/// Offer `contents` as a file named `filename`.
///
/// The anchor and the object URL live until a zero-delay timeout after the
/// click, then both are released.
pub fn offer_download(
    document: &Document,
    filename: &str,
    mime: &str,
    contents: &str,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = ObjectUrl::for_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url.0);
    anchor.set_download(filename);
    body.append_child(&anchor)?;
    anchor.click();

    let release = Closure::once_into_js(move || {
        anchor.remove();
        drop(url);
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(release.unchecked_ref(), 0)?;

    log::info!("Offered {} ({} bytes)", filename, contents.len());
    Ok(())
}
