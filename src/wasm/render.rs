use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, HtmlCanvasElement, WebGl2RenderingContext as GL, Window};

use super::composer::GpuComposer;
use super::{input, panel};
use crate::effects::Target;
use crate::{App, Config, Viewport};

fn inner_viewport(window: &Window) -> Result<Viewport, JsValue> {
    let w = window.inner_width()?.as_f64().ok_or("innerWidth is not a number")?;
    let h = window.inner_height()?.as_f64().ok_or("innerHeight is not a number")?;
    Ok(Viewport::from_inner_size(w, h))
}

/// CSS size follows the viewport, the drawing buffer follows the pixel ratio.
fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport, surface: (u32, u32)) -> Result<(), JsValue> {
    canvas.set_width(surface.0);
    canvas.set_height(surface.1);
    let style = canvas.style();
    style.set_property("width", &format!("{}px", viewport.width()))?;
    style.set_property("height", &format!("{}px", viewport.height()))?;
    Ok(())
}

/// Build the scene and effect chain, then start the render loop.
pub fn start(canvas: HtmlCanvasElement, config: Config) -> Result<(), JsValue> {
    let win = window().ok_or("no window")?;
    let document = win.document().ok_or("no document")?;
    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;

    let seed = config
        .seed
        .unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);
    let app = App::new(
        &config,
        inner_viewport(&win)?,
        win.device_pixel_ratio() as f32,
        seed,
    );
    size_canvas(&canvas, app.viewport(), app.surface_size())?;

    let composer = GpuComposer::new(&gl, &app.scene, &app.chain, app.surface_size())?;
    let app = Rc::new(RefCell::new(app));
    let composer = Rc::new(RefCell::new(composer));

    panel::mount(&document, &app)?;
    input::attach(&canvas, &app)?;

    // Resize canvas, camera and offscreen buffers to fit the window
    let resize_closure = {
        let canvas = canvas.clone();
        let app = app.clone();
        let composer = composer.clone();
        Closure::wrap(Box::new(move || {
            let Some(win) = window() else {
                return;
            };
            let viewport = match inner_viewport(&win) {
                Ok(vp) => vp,
                Err(err) => {
                    tracing::error!(?err, "could not read window size");
                    return;
                }
            };
            let surface = app.borrow_mut().resize(viewport);
            if let Err(err) = size_canvas(&canvas, viewport, surface) {
                tracing::error!(?err, "could not resize canvas");
            }
            if let Err(err) = composer.borrow_mut().resize(surface) {
                tracing::error!(%err, "could not resize render targets");
            }
        }) as Box<dyn FnMut()>)
    };
    win.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        {
            let mut app = app.borrow_mut();
            let mut composer = composer.borrow_mut();

            app.rotate_mesh();
            composer.draw_scene(&app.scene, Target::Screen);
            app.update_controls();
            let plan = app.compose();
            if let Err(err) = composer.execute(&app.scene, &plan) {
                tracing::error!(%err, frame = app.frame(), "effect chain failed");
            }
        }

        // schedule next
        let scheduled = match (window(), f.borrow().as_ref()) {
            (Some(win), Some(cb)) => win.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok(),
            _ => false,
        };
        if !scheduled {
            tracing::error!("could not schedule the next frame");
        }
    }) as Box<dyn FnMut()>));

    let first = g.borrow();
    let cb = first.as_ref().ok_or("animation closure missing")?;
    win.request_animation_frame(cb.as_ref().unchecked_ref())?;

    tracing::info!("render loop started");
    Ok(())
}
