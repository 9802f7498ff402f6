//! Owning context for everything the render loop and event handlers touch.
//!
//! The browser front end keeps one `App` behind `Rc<RefCell<_>>`; each frame
//! and event callback borrows it, runs to completion and releases it.

use crate::config::Config;
use crate::controls::OrbitControls;
use crate::effects::{EffectChain, PassInvocation, Toggle};
use crate::panel::ControlPanel;
use crate::scene::{SceneGraph, ROTATION_STEP};
use crate::viewport::Viewport;

pub struct App {
    viewport: Viewport,
    pixel_ratio: f32,
    edge_resize: bool,
    frame: u64,
    pub scene: SceneGraph,
    pub controls: OrbitControls,
    pub chain: EffectChain,
    pub panel: ControlPanel,
}

impl App {
    pub fn new(config: &Config, viewport: Viewport, pixel_ratio: f32, seed: u64) -> Self {
        let pixel_ratio = config.pixel_ratio.unwrap_or(pixel_ratio);
        let scene = SceneGraph::new(&viewport);
        let chain = EffectChain::new(viewport.resolution(pixel_ratio), &config.toggles, seed);
        tracing::info!(
            width = viewport.width(),
            height = viewport.height(),
            pixel_ratio,
            camera_z = scene.camera.position().z,
            "scene ready"
        );

        Self {
            viewport,
            pixel_ratio,
            edge_resize: config.edge_resize,
            frame: 0,
            scene,
            controls: OrbitControls::new().with_damping(config.damping),
            chain,
            panel: ControlPanel::new(config.toggles),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Drawing-buffer size of the output surface.
    pub fn surface_size(&self) -> (u32, u32) {
        self.viewport.drawing_buffer(self.pixel_ratio)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frame step 1.
    pub fn rotate_mesh(&mut self) {
        self.scene.mesh.rotate(ROTATION_STEP, ROTATION_STEP);
        self.frame += 1;
    }

    /// Frame step 3.
    pub fn update_controls(&mut self) -> bool {
        self.controls.update(&mut self.scene.camera)
    }

    /// Frame step 4: this frame's post-processing passes.
    pub fn compose(&mut self) -> Vec<PassInvocation> {
        self.chain.plan()
    }

    pub fn set_toggle(&mut self, toggle: Toggle, value: bool) {
        self.panel.change(toggle, value, &mut self.chain);
    }

    /// Apply a new viewport. Returns the new drawing-buffer size.
    pub fn resize(&mut self, viewport: Viewport) -> (u32, u32) {
        self.viewport = viewport;
        self.scene.camera.set_aspect(viewport.aspect());
        self.scene.camera.update_projection_matrix();
        if self.edge_resize {
            self.chain
                .set_edge_resolution(viewport.resolution(self.pixel_ratio));
        }
        tracing::debug!(width = viewport.width(), height = viewport.height(), "resized");
        self.surface_size()
    }
}
