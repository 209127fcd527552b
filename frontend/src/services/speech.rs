//! Voice input and read-aloud.
//!
//! Speech recognition is still vendor-prefixed in most browsers and has no
//! `web-sys` binding, so it is driven through `js_sys::Reflect`.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

use crate::types::{AppError, AppResult};

// =============================================================================
// Recognition
// =============================================================================

/// A live `SpeechRecognition` instance and its event handlers.
pub struct VoiceInput {
    recognition: JsValue,
    _on_result: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
    _on_end: Closure<dyn FnMut()>,
}

impl VoiceInput {
    /// `None` when the browser has no speech recognition.
    ///
    /// `on_transcript` receives the full transcript of the session so far,
    /// interim results included. `on_end` fires whenever listening stops.
    pub fn new(
        on_transcript: impl Fn(String) + 'static,
        on_error: impl Fn(String) + 'static,
        on_end: impl Fn() + 'static,
    ) -> Option<Self> {
        let window: JsValue = web_sys::window()?.into();
        let constructor = ["SpeechRecognition", "webkitSpeechRecognition"]
            .iter()
            .filter_map(|name| Reflect::get(&window, &JsValue::from_str(name)).ok())
            .find_map(|value| value.dyn_into::<Function>().ok())?;
        let recognition = Reflect::construct(&constructor, &Array::new()).ok()?;

        let _ = Reflect::set(&recognition, &"continuous".into(), &JsValue::TRUE);
        let _ = Reflect::set(&recognition, &"interimResults".into(), &JsValue::TRUE);

        let on_result = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            if let Some(transcript) = transcript_of(&event) {
                on_transcript(transcript);
            }
        });
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let reason = Reflect::get(&event, &"error".into())
                .ok()
                .and_then(|e| e.as_string())
                .unwrap_or_else(|| "unknown".to_string());
            log::warn!("🎤 Speech recognition error: {}", reason);
            on_error(reason);
        });
        let on_end = Closure::<dyn FnMut()>::new(move || on_end());

        let _ = Reflect::set(&recognition, &"onresult".into(), on_result.as_ref());
        let _ = Reflect::set(&recognition, &"onerror".into(), on_error.as_ref());
        let _ = Reflect::set(&recognition, &"onend".into(), on_end.as_ref());

        Some(Self {
            recognition,
            _on_result: on_result,
            _on_error: on_error,
            _on_end: on_end,
        })
    }

    pub fn start(&self) -> AppResult<()> {
        self.call("start")
    }

    pub fn stop(&self) -> AppResult<()> {
        self.call("stop")
    }

    fn call(&self, method: &str) -> AppResult<()> {
        let function: Function = Reflect::get(&self.recognition, &JsValue::from_str(method))
            .map_err(|e| AppError::Speech(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| AppError::Speech(format!("{} is not a function", method)))?;
        function
            .call0(&self.recognition)
            .map(|_| ())
            .map_err(|e| AppError::Speech(format!("{:?}", e)))
    }
}

impl Drop for VoiceInput {
    fn drop(&mut self) {
        for handler in ["onresult", "onerror", "onend"] {
            let _ = Reflect::set(&self.recognition, &handler.into(), &JsValue::NULL);
        }
        let _ = self.call("abort");
    }
}

/// Concatenates the best alternative of every result in the event.
fn transcript_of(event: &JsValue) -> Option<String> {
    let results = Reflect::get(event, &"results".into()).ok()?;
    let transcript: String = Array::from(&results)
        .iter()
        .filter_map(|result| Reflect::get(&result, &JsValue::from(0)).ok())
        .filter_map(|alternative| Reflect::get(&alternative, &"transcript".into()).ok())
        .filter_map(|text| text.as_string())
        .collect();
    Some(transcript)
}

// =============================================================================
// Synthesis
// =============================================================================

fn synthesis() -> AppResult<SpeechSynthesis> {
    web_sys::window()
        .ok_or_else(|| AppError::Speech("no window".into()))?
        .speech_synthesis()
        .map_err(|_| AppError::Speech("speech synthesis is not supported".into()))
}

pub fn is_speaking() -> bool {
    synthesis().map(|s| s.speaking()).unwrap_or(false)
}

/// Reads `text` aloud, replacing anything currently spoken.
///
/// `on_done` runs when the utterance ends or errors.
pub fn speak(text: &str, on_done: impl FnMut() + 'static) -> AppResult<()> {
    let synth = synthesis()?;
    synth.cancel();

    let utterance =
        SpeechSynthesisUtterance::new_with_text(text).map_err(|e| AppError::Speech(format!("{:?}", e)))?;
    let on_done = Closure::<dyn FnMut()>::new(on_done);
    utterance.set_onend(Some(on_done.as_ref().unchecked_ref()));
    utterance.set_onerror(Some(on_done.as_ref().unchecked_ref()));
    // The utterance outlives this call.
    on_done.forget();

    synth.speak(&utterance);
    Ok(())
}

pub fn stop_speaking() {
    if let Ok(synth) = synthesis() {
        synth.cancel();
    }
}
