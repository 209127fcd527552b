//! HTTP transport to the TextAssist backend.
//!
//! Uploads go through `XMLHttpRequest` so byte progress can be observed;
//! JSON calls use `gloo-net`. Responses are returned untouched, the core
//! crate decides what counts as success.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::{mpsc, oneshot};
use futures::{FutureExt, StreamExt};
use gloo_net::http::{Request, Response};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

use textassist::{
    Backend, Endpoints, HttpReply, QueryRequest, StagedFile, TransferProgress, TransportError,
    UPLOAD_FIELD,
};

/// [`Backend`] backed by the browser's network stack.
#[derive(Clone, Debug)]
pub struct BrowserBackend {
    endpoints: Endpoints,
}

impl BrowserBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoints: Endpoints::new(base_url),
        }
    }
}

impl Backend for BrowserBackend {
    type File = File;

    async fn upload(
        &self,
        file: &StagedFile<File>,
        on_progress: &dyn Fn(TransferProgress),
    ) -> Result<HttpReply, TransportError> {
        log::debug!("📤 POST {} ({})", self.endpoints.upload(), file.name());
        xhr_upload(&self.endpoints.upload(), &file.handle, on_progress).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<HttpReply, TransportError> {
        let body = serde_json::to_string(request)
            .map_err(|e| TransportError::new(format!("Failed to encode query: {}", e)))?;

        let response = Request::post(&self.endpoints.query())
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| TransportError::new(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| TransportError::new(format!("HTTP request failed: {}", e)))?;

        read_reply(response).await
    }

    async fn documents(&self) -> Result<HttpReply, TransportError> {
        let response = Request::get(&self.endpoints.documents())
            .send()
            .await
            .map_err(|e| TransportError::new(format!("HTTP request failed: {}", e)))?;

        read_reply(response).await
    }
}

async fn read_reply(response: Response) -> Result<HttpReply, TransportError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TransportError::new(format!("Failed to read response: {}", e)))?;
    Ok(HttpReply::new(status, body))
}

fn js_error(context: &str, value: JsValue) -> TransportError {
    TransportError::new(format!("{}: {:?}", context, value))
}

/// Posts `file` as multipart form data, reporting upload progress.
async fn xhr_upload(
    url: &str,
    file: &File,
    on_progress: &dyn Fn(TransferProgress),
) -> Result<HttpReply, TransportError> {
    let form_data = FormData::new().map_err(|e| js_error("Failed to create FormData", e))?;
    form_data
        .append_with_blob(UPLOAD_FIELD, file)
        .map_err(|e| js_error("Failed to append file", e))?;

    let xhr = XmlHttpRequest::new().map_err(|e| js_error("Failed to create request", e))?;
    xhr.open_with_async("POST", url, true)
        .map_err(|e| js_error("Failed to open request", e))?;

    let (progress_tx, mut progress_rx) = mpsc::unbounded::<TransferProgress>();
    let (done_tx, done_rx) = oneshot::channel::<Result<HttpReply, TransportError>>();
    let done_tx = Rc::new(RefCell::new(Some(done_tx)));

    let on_upload_progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
        if event.length_computable() {
            let _ = progress_tx.unbounded_send(TransferProgress::new(
                event.loaded() as u64,
                event.total() as u64,
            ));
        }
    });

    let on_load = {
        let xhr = xhr.clone();
        let done_tx = done_tx.clone();
        Closure::<dyn FnMut()>::new(move || {
            let status = xhr.status().unwrap_or(0);
            let body = xhr.response_text().ok().flatten().unwrap_or_default();
            if let Some(tx) = done_tx.borrow_mut().take() {
                let _ = tx.send(Ok(HttpReply::new(status, body)));
            }
        })
    };

    let on_failure = {
        let done_tx = done_tx.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = done_tx.borrow_mut().take() {
                let _ = tx.send(Err(TransportError::new(
                    "Network error. Please check your connection.",
                )));
            }
        })
    };

    xhr.upload()
        .map_err(|e| js_error("Upload events unavailable", e))?
        .set_onprogress(Some(on_upload_progress.as_ref().unchecked_ref()));
    xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(on_failure.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(on_failure.as_ref().unchecked_ref()));

    xhr.send_with_opt_form_data(Some(&form_data))
        .map_err(|e| js_error("Failed to send request", e))?;

    let mut done = done_rx.fuse();
    let result = loop {
        futures::select! {
            update = progress_rx.next() => {
                if let Some(update) = update {
                    on_progress(update);
                }
            }
            result = done => {
                break result.unwrap_or_else(|_| Err(TransportError::new("Upload was interrupted")));
            }
        }
    };

    // Detach handlers before their closures are dropped.
    if let Ok(upload) = xhr.upload() {
        upload.set_onprogress(None);
    }
    xhr.set_onload(None);
    xhr.set_onerror(None);
    xhr.set_onabort(None);

    result
}
