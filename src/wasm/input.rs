//! Pointer and wheel input feeding the orbit controls.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{HtmlCanvasElement, PointerEvent, WheelEvent};

use crate::App;

pub fn attach(canvas: &HtmlCanvasElement, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    // Last pointer position while a drag is in progress.
    let drag: Rc<Cell<Option<(i32, i32)>>> = Rc::new(Cell::new(None));

    let on_down = {
        let drag = drag.clone();
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move |event: PointerEvent| {
            drag.set(Some((event.client_x(), event.client_y())));
            if let Err(err) = canvas.set_pointer_capture(event.pointer_id()) {
                tracing::debug!(?err, "pointer capture refused");
            }
        }) as Box<dyn FnMut(PointerEvent)>)
    };

    let on_move = {
        let drag = drag.clone();
        let canvas = canvas.clone();
        let app = app.clone();
        Closure::wrap(Box::new(move |event: PointerEvent| {
            let Some((x, y)) = drag.get() else {
                return;
            };
            let (nx, ny) = (event.client_x(), event.client_y());
            drag.set(Some((nx, ny)));
            app.borrow_mut().controls.drag(
                (nx - x) as f32,
                (ny - y) as f32,
                canvas.client_height() as f32,
            );
        }) as Box<dyn FnMut(PointerEvent)>)
    };

    let on_up = {
        let drag = drag.clone();
        Closure::wrap(Box::new(move |_event: PointerEvent| {
            drag.set(None);
        }) as Box<dyn FnMut(PointerEvent)>)
    };

    let on_wheel = {
        let app = app.clone();
        Closure::wrap(Box::new(move |event: WheelEvent| {
            event.prevent_default();
            app.borrow_mut().controls.wheel(event.delta_y() as f32);
        }) as Box<dyn FnMut(WheelEvent)>)
    };

    canvas.add_event_listener_with_callback("pointerdown", on_down.as_ref().unchecked_ref())?;
    canvas.add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref())?;
    for name in ["pointerup", "pointercancel"] {
        canvas.add_event_listener_with_callback(name, on_up.as_ref().unchecked_ref())?;
    }
    canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;

    on_down.forget();
    on_move.forget();
    on_up.forget();
    on_wheel.forget();
    Ok(())
}
