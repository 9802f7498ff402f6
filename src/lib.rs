//! Rotating cube with a toggleable post-processing chain, rendered to a
//! browser canvas through WebGL2.
//!
//! Scene, camera, effect and panel state are plain Rust and build on any
//! target; only the `wasm` module talks to the browser.

pub mod app;
pub mod camera;
pub mod config;
pub mod controls;
pub mod effects;
pub mod error;
pub mod panel;
pub mod scene;
pub mod viewport;

pub use app::App;
pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use viewport::Viewport;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::Config;

    mod composer;
    mod gl;
    mod input;
    pub mod panel;
    mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let config = Config::from_query(&window.location().search()?).unwrap_or_else(|err| {
            tracing::warn!(%err, "bad query string, using defaults");
            Config::default()
        });

        let Some(element) = document.get_element_by_id(&config.canvas_id) else {
            tracing::warn!(canvas = %config.canvas_id, "canvas not found, nothing to render");
            return Ok(());
        };
        let canvas = element.dyn_into::<web_sys::HtmlCanvasElement>()?;

        tracing::info!(canvas = %config.canvas_id, "starting");
        render::start(canvas, config)?;
        Ok(())
    }
}
