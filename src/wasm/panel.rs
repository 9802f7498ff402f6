//! Checkbox panel bound to the app's [`ControlPanel`](crate::panel::ControlPanel).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Event, HtmlInputElement, HtmlLabelElement};

use crate::App;

/// Build the panel, append it to `<body>` and wire each checkbox's `change`.
pub fn mount(document: &Document, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let body = document.body().ok_or("no body")?;
    let panel = document.create_element("div")?;
    panel.set_class_name("fx-panel");

    let controls = app.borrow().panel.controls();
    for control in controls {
        let id = format!("fx-{}", control.toggle.key());

        let input = document
            .create_element("input")?
            .dyn_into::<HtmlInputElement>()?;
        input.set_type("checkbox");
        input.set_id(&id);
        input.set_checked(control.value);

        let label = document
            .create_element("label")?
            .dyn_into::<HtmlLabelElement>()?;
        label.set_html_for(&id);
        label.append_with_node_1(&input)?;
        label.append_with_str_1(control.label)?;
        panel.append_with_node_1(&label)?;

        let on_change = {
            let app = app.clone();
            let toggle = control.toggle;
            Closure::wrap(Box::new(move |event: Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                app.borrow_mut().set_toggle(toggle, input.checked());
            }) as Box<dyn FnMut(Event)>)
        };
        input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    }

    body.append_with_node_1(&panel)?;
    Ok(())
}
