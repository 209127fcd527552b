//! Client-side file downloads.

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::types::{AppError, AppResult};

/// Saves `contents` as a plain text file named `file_name`.
pub fn save_text_file(file_name: &str, contents: &str) -> AppResult<()> {
    let document = gloo_utils::document();
    let body = gloo_utils::body();

    let parts = Array::of1(&JsValue::from_str(contents));
    let options = BlobPropertyBag::new();
    options.set_type("text/plain");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| AppError::Download(format!("{:?}", e)))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| AppError::Download(format!("{:?}", e)))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(AppError::dom)?
        .dyn_into()
        .map_err(|_| AppError::Download("not an anchor element".into()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);

    body.append_child(&anchor).map_err(AppError::dom)?;
    anchor.click();
    let _ = body.remove_child(&anchor);
    let _ = Url::revoke_object_url(&url);

    log::info!("💾 Saved {}", file_name);
    Ok(())
}
