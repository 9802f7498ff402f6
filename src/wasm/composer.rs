//! Executes the scene draw and the effect chain's pass plan on WebGL2.

use std::collections::HashMap;

use web_sys::{WebGl2RenderingContext as GL, WebGlTexture};

use super::gl::{upload_data_texture, Program, RenderTarget, VertexArray};
use crate::effects::{Buffer, EffectChain, PassInvocation, StageKind, Target};
use crate::error::{Error, Result};
use crate::scene::SceneGraph;

const FULLSCREEN_VERT: &str = include_str!("shaders/fullscreen.vert");
const SCENE_VERT: &str = include_str!("shaders/scene.vert");
const SCENE_FRAG: &str = include_str!("shaders/scene.frag");
const COPY_FRAG: &str = include_str!("shaders/copy.frag");

fn fragment_source(kind: StageKind) -> Option<&'static str> {
    match kind {
        StageKind::Render => None,
        StageKind::Luminosity => Some(include_str!("shaders/luminosity.frag")),
        StageKind::Sobel => Some(include_str!("shaders/sobel.frag")),
        StageKind::Glitch => Some(include_str!("shaders/glitch.frag")),
        StageKind::DotScreen => Some(include_str!("shaders/dot_screen.frag")),
        StageKind::RgbShift => Some(include_str!("shaders/rgb_shift.frag")),
    }
}

pub struct GpuComposer {
    gl: GL,
    scene_program: Program,
    copy_program: Program,
    stage_programs: HashMap<StageKind, Program>,
    /// Extra sampler per stage, bound as `tDisp`.
    stage_textures: HashMap<StageKind, WebGlTexture>,
    mesh: VertexArray,
    quad: VertexArray,
    buffers: [RenderTarget; 2],
    surface: (u32, u32),
}

impl GpuComposer {
    pub fn new(gl: &GL, scene: &SceneGraph, chain: &EffectChain, surface: (u32, u32)) -> Result<Self> {
        let mut stage_programs = HashMap::new();
        let mut stage_textures = HashMap::new();
        for stage in chain.stages() {
            let kind = stage.kind();
            if let Some(frag) = fragment_source(kind) {
                stage_programs.insert(kind, Program::new(gl, FULLSCREEN_VERT, frag)?);
            }
            if let Some(data) = stage.data_texture() {
                stage_textures.insert(kind, upload_data_texture(gl, data)?);
            }
        }
        tracing::debug!(programs = stage_programs.len(), "effect programs linked");

        let (w, h) = surface;
        Ok(Self {
            gl: gl.clone(),
            scene_program: Program::new(gl, SCENE_VERT, SCENE_FRAG)?,
            copy_program: Program::new(gl, FULLSCREEN_VERT, COPY_FRAG)?,
            stage_programs,
            stage_textures,
            mesh: VertexArray::from_vertices(gl, &scene.mesh.geometry.vertices())?,
            quad: VertexArray::fullscreen_quad(gl)?,
            buffers: [RenderTarget::new(gl, w, h)?, RenderTarget::new(gl, w, h)?],
            surface,
        })
    }

    /// Follow a new drawing-buffer size.
    pub fn resize(&mut self, surface: (u32, u32)) -> Result<()> {
        self.surface = surface;
        for target in &mut self.buffers {
            target.resize(surface.0, surface.1)?;
        }
        Ok(())
    }

    fn buffer(&self, id: Buffer) -> &RenderTarget {
        match id {
            Buffer::A => &self.buffers[0],
            Buffer::B => &self.buffers[1],
        }
    }

    fn bind_target(&self, target: Target) {
        match target {
            Target::Buffer(id) => self.buffer(id).bind(),
            Target::Screen => {
                self.gl.bind_framebuffer(GL::FRAMEBUFFER, None);
                self.gl
                    .viewport(0, 0, self.surface.0 as i32, self.surface.1 as i32);
            }
        }
    }

    /// Draw the lit mesh into `target`.
    pub fn draw_scene(&mut self, scene: &SceneGraph, target: Target) {
        self.bind_target(target);
        let gl = &self.gl;
        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::CULL_FACE);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        let p = &mut self.scene_program;
        p.bind();
        p.set_mat4("u_model", scene.mesh.model_matrix());
        p.set_mat4("u_view_projection", scene.camera.view_projection_matrix());
        p.set_mat3("u_normal_matrix", scene.mesh.normal_matrix());
        p.set_vec3("u_albedo", scene.mesh.material.color.to_linear());
        p.set_vec3("u_light_dir", scene.directional.direction());
        p.set_vec3("u_light_radiance", scene.directional.radiance());
        p.set_vec3("u_ambient", scene.ambient.irradiance());
        self.mesh.draw();

        gl.disable(GL::CULL_FACE);
        gl.disable(GL::DEPTH_TEST);
    }

    /// Run one frame's pass plan.
    pub fn execute(&mut self, scene: &SceneGraph, plan: &[PassInvocation]) -> Result<()> {
        for pass in plan {
            match pass.kind {
                StageKind::Render => self.draw_scene(scene, pass.target),
                kind => self.draw_effect(kind, pass)?,
            }
        }
        // A plan ending in the render stage never reaches the screen on its own.
        if let Some(PassInvocation {
            kind: StageKind::Render,
            target: Target::Buffer(id),
            ..
        }) = plan.last()
        {
            self.blit(*id);
        }
        Ok(())
    }

    fn draw_effect(&mut self, kind: StageKind, pass: &PassInvocation) -> Result<()> {
        let source = pass.source.ok_or(Error::Gpu("effect pass without input"))?;
        self.bind_target(pass.target);

        let input = self.buffer(source).texture().clone();
        let extra = self.stage_textures.get(&kind).cloned();
        let program = self
            .stage_programs
            .get_mut(&kind)
            .ok_or(Error::Gpu("no program for stage"))?;
        program.bind();
        program.set_sampler("tDiffuse", 0, &input);
        if let Some(tex) = extra {
            program.set_sampler("tDisp", 1, &tex);
        }
        for &(name, value) in &pass.uniforms {
            program.set(name, value);
        }
        self.quad.draw();
        self.unbind_textures();
        Ok(())
    }

    fn blit(&mut self, id: Buffer) {
        self.bind_target(Target::Screen);
        let input = self.buffer(id).texture().clone();
        self.copy_program.bind();
        self.copy_program.set_sampler("tDiffuse", 0, &input);
        self.quad.draw();
        self.unbind_textures();
    }

    // Leaving the read buffer bound while it becomes the next draw target is a
    // feedback loop in WebGL.
    fn unbind_textures(&self) {
        for unit in [1, 0] {
            self.gl.active_texture(GL::TEXTURE0 + unit);
            self.gl.bind_texture(GL::TEXTURE_2D, None);
        }
    }
}
