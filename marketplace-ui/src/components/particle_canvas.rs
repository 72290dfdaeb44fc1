//! Particle Canvas Component
//!
//! Full-page background animation driven by `requestAnimationFrame`. The
//! canvas follows its element size on window resize; colors come from the
//! document's theme variables on every frame.

use leptos::*;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use marketplace::{FieldConfig, Renderer, Rgba, Surface, ThemeManager};

use crate::state::global::GlobalState;
use crate::theme::CssPalette;

/// Background canvas
#[component]
pub fn ParticleCanvas() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    let themes = Rc::clone(state.app.themes());
    canvas_ref.on_load(move |canvas| {
        let canvas: HtmlCanvasElement = (*canvas).clone();
        start_animation(canvas, themes);
    });

    view! {
        <canvas id="blackHoleCanvas" node_ref=canvas_ref class="background-canvas" />
    }
}

/// `Surface` over a 2D canvas context
struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_radial_disk(&mut self, cx: f64, cy: f64, radius: f64, stops: &[(f64, Rgba); 3]) {
        let gradient = match self.ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, radius) {
            Ok(gradient) => gradient,
            Err(_) => return,
        };
        for (offset, color) in stops {
            let _ = gradient.add_color_stop(*offset as f32, &color.to_css());
        }

        self.ctx.begin_path();
        self.ctx.set_fill_style(&gradient);
        let _ = self.ctx.arc(cx, cy, radius, 0.0, TAU);
        self.ctx.fill();
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, radius, 0.0, TAU);
        self.ctx.set_fill_style(&color.to_css().into());
        self.ctx.fill();
    }
}

/// Match the drawing buffer to the element's layout size
fn fit_to_element(canvas: &HtmlCanvasElement) -> (f64, f64) {
    let (width, height) = (canvas.offset_width(), canvas.offset_height());
    if width > 0 && height > 0 {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
    }
    (canvas.width() as f64, canvas.height() as f64)
}

fn request_frame(callback: &Closure<dyn FnMut()>) {
    if let Some(window) = web_sys::window() {
        let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    }
}

fn start_animation(canvas: HtmlCanvasElement, themes: Rc<ThemeManager>) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => {
            web_sys::console::warn_1(&"2D canvas unavailable; skipping animation".into());
            return;
        }
    };

    let (width, height) = fit_to_element(&canvas);
    let palette = Rc::new(CssPalette::new(Rc::clone(&themes)));
    let renderer = Rc::new(RefCell::new(Renderer::for_canvas(
        FieldConfig::default(),
        width,
        height,
        palette,
    )));

    {
        let renderer = Rc::clone(&renderer);
        themes.subscribe(move |change| {
            if let Ok(renderer) = renderer.try_borrow() {
                renderer.on_theme_changed(change);
            }
        });
    }

    if let Some(window) = web_sys::window() {
        let renderer = Rc::clone(&renderer);
        let canvas = canvas.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            let (width, height) = fit_to_element(&canvas);
            renderer.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        // Lives as long as the page
        on_resize.forget();
    }

    // The frame callback re-schedules itself through this slot
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&frame);
    let mut surface = CanvasSurface { ctx };

    *frame.borrow_mut() = Some(Closure::new(move || {
        renderer.borrow_mut().draw_frame(&mut surface);
        if let Some(callback) = next.borrow().as_ref() {
            request_frame(callback);
        }
    }));

    if let Some(callback) = frame.borrow().as_ref() {
        request_frame(callback);
    }
}
