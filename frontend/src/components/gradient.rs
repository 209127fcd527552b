//! Decorative canvas of drifting, softly glowing particles.
//!
//! The particle colour follows the `--primary` CSS variable so the
//! gradient matches the active theme.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use textassist::gradient::{hsl_to_rgb, rgba, sync_field, Density, ParticleField};

use crate::config::DEFAULT_PRIMARY_RGB;

/// Canvas sized to its container, redrawn every animation frame.
#[component]
pub fn AnimatedGradient(
    /// Fewer, smaller particles for compact containers.
    #[prop(optional)]
    small: bool,
) -> impl IntoView {
    let density = if small { Density::Small } else { Density::Regular };
    let canvas_ref = create_node_ref::<html::Canvas>();

    // The element is not laid out yet here; sizing happens in the frame loop.
    canvas_ref.on_load(move |canvas| start_animation((*canvas).clone(), density));

    view! {
        <div class="animated-gradient" class:small=small>
            <canvas node_ref=canvas_ref class="gradient-canvas"></canvas>
        </div>
    }
}

/// Displayed size of the canvas in CSS pixels.
fn measure(canvas: &HtmlCanvasElement) -> (f64, f64) {
    (canvas.offset_width() as f64, canvas.offset_height() as f64)
}

/// Matches the backing store to the displayed size.
fn fit_canvas(
    canvas: &HtmlCanvasElement,
    context: &CanvasRenderingContext2d,
    (width, height): (f64, f64),
) {
    let ratio = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    canvas.set_width((width * ratio) as u32);
    canvas.set_height((height * ratio) as u32);
    let _ = context.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn primary_rgb() -> [u8; 3] {
    let root = gloo_utils::document_element();
    web_sys::window()
        .and_then(|w| w.get_computed_style(&root).ok().flatten())
        .and_then(|style| style.get_property_value("--primary").ok())
        .and_then(|value| hsl_to_rgb(value.trim()))
        .unwrap_or(DEFAULT_PRIMARY_RGB)
}

fn draw(
    context: &CanvasRenderingContext2d,
    field: &ParticleField,
    rgb: [u8; 3],
) -> Result<(), JsValue> {
    context.clear_rect(0.0, 0.0, field.width(), field.height());
    for particle in field.particles() {
        let glow = context.create_radial_gradient(
            particle.x,
            particle.y,
            0.0,
            particle.x,
            particle.y,
            particle.size,
        )?;
        glow.add_color_stop(0.0, &rgba(rgb, particle.opacity))?;
        glow.add_color_stop(1.0, &rgba(rgb, 0.0))?;

        context.begin_path();
        context.arc(particle.x, particle.y, particle.size, 0.0, TAU)?;
        #[allow(deprecated)]
        context.set_fill_style(glow.as_ref());
        context.fill();
    }
    Ok(())
}

/// Runs the frame loop until the canvas leaves the document.
///
/// Each frame re-measures the canvas, so the first laid-out frame seeds
/// the field and later frames pick up resizes.
fn start_animation(canvas: HtmlCanvasElement, density: Density) {
    let Some(context) = context_2d(&canvas) else {
        log::warn!("Canvas 2D context unavailable, gradient disabled");
        return;
    };

    let mut field: Option<ParticleField> = None;
    let mut fitted = (0.0, 0.0);
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next_frame = frame.clone();

    *frame.borrow_mut() = Some(Closure::new(move || {
        if !canvas.is_connected() {
            // Breaks the self-reference so the closure can be freed.
            next_frame.borrow_mut().take();
            return;
        }

        let size = measure(&canvas);
        if size != fitted && size.0 > 0.0 && size.1 > 0.0 {
            fit_canvas(&canvas, &context, size);
            fitted = size;
        }

        let mut rng = rand::thread_rng();
        if let Some(field) = sync_field(&mut field, &mut rng, density, size.0, size.1) {
            field.step();
            if let Err(e) = draw(&context, field, primary_rgb()) {
                log::debug!("Gradient frame skipped: {:?}", e);
            }
        }

        if let Some(callback) = next_frame.borrow().as_ref() {
            request_frame(callback);
        }
    }));

    if let Some(callback) = frame.borrow().as_ref() {
        request_frame(callback);
    };
}

fn request_frame(callback: &Closure<dyn FnMut()>) {
    if let Some(window) = web_sys::window() {
        let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    }
}
