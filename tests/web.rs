#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use cubefx_wasm::effects::{StageKind, Toggle};
use cubefx_wasm::wasm::panel;
use cubefx_wasm::{App, Config, Viewport};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn window_viewport() -> Viewport {
    let window = web_sys::window().unwrap();
    Viewport::from_inner_size(
        window.inner_width().unwrap().as_f64().unwrap(),
        window.inner_height().unwrap().as_f64().unwrap(),
    )
}

#[wasm_bindgen_test]
fn page_query_parses() {
    let search = web_sys::window().unwrap().location().search().unwrap();
    assert!(Config::from_query(&search).is_ok());
}

#[wasm_bindgen_test]
fn panel_checkbox_toggles_stage() {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let app = Rc::new(RefCell::new(App::new(&Config::default(), window_viewport(), 1.0, 1)));
    panel::mount(&document, &app).unwrap();

    let checkbox = document
        .get_element_by_id("fx-glitch")
        .unwrap()
        .dyn_into::<web_sys::HtmlInputElement>()
        .unwrap();
    assert!(!checkbox.checked());
    checkbox.set_checked(true);
    checkbox
        .dispatch_event(&web_sys::Event::new("change").unwrap())
        .unwrap();

    assert!(app.borrow().chain.is_enabled(Toggle::Glitch));
    assert!(app.borrow().panel.state().glitch);
    assert!(!app.borrow().chain.is_enabled(Toggle::RgbShift));

    document.query_selector(".fx-panel").unwrap().unwrap().remove();
}

#[wasm_bindgen_test]
fn app_builds_from_window_size() {
    let window = web_sys::window().unwrap();
    let mut app = App::new(
        &Config::default(),
        window_viewport(),
        window.device_pixel_ratio() as f32,
        1,
    );
    app.set_toggle(Toggle::RgbShift, true);
    app.rotate_mesh();
    let plan = app.compose();
    assert_eq!(plan.last().unwrap().kind, StageKind::RgbShift);
}
