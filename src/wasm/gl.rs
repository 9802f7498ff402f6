//! Thin WebGL2 wrappers: shader programs, offscreen targets, vertex arrays.

use std::collections::HashMap;

use glam::{Mat3, Mat4, Vec3};
use web_sys::{
    WebGl2RenderingContext as GL, WebGlFramebuffer, WebGlProgram, WebGlRenderbuffer, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::effects::{DataTexture, UniformValue};
use crate::error::{Error, Result};
use crate::scene::Vertex;

/// Attribute slots shared by every vertex shader.
pub const ATTR_POSITION: u32 = 0;
pub const ATTR_NORMAL: u32 = 1;

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(kind).ok_or(Error::Gpu("create_shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(Error::ShaderCompile(log))
    }
}

pub struct Program {
    gl: GL,
    program: WebGlProgram,
    locations: HashMap<&'static str, Option<WebGlUniformLocation>>,
}

impl Program {
    pub fn new(gl: &GL, vertex: &str, fragment: &str) -> Result<Self> {
        let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
        let program = gl.create_program().ok_or(Error::Gpu("create_program"))?;

        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.bind_attrib_location(&program, ATTR_POSITION, "a_position");
        gl.bind_attrib_location(&program, ATTR_NORMAL, "a_normal");
        gl.link_program(&program);
        gl.detach_shader(&program, &vs);
        gl.detach_shader(&program, &fs);
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));

        let ok = gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !ok {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            return Err(Error::ProgramLink(log));
        }

        Ok(Self {
            gl: gl.clone(),
            program,
            locations: HashMap::new(),
        })
    }

    pub fn bind(&self) {
        self.gl.use_program(Some(&self.program));
    }

    fn location(&mut self, name: &'static str) -> Option<WebGlUniformLocation> {
        let gl = &self.gl;
        let program = &self.program;
        self.locations
            .entry(name)
            .or_insert_with(|| gl.get_uniform_location(program, name))
            .clone()
    }

    /// Missing uniforms are skipped; GLSL drops unused ones at link time.
    pub fn set(&mut self, name: &'static str, value: UniformValue) {
        let loc = self.location(name);
        match value {
            UniformValue::Int(v) => self.gl.uniform1i(loc.as_ref(), v),
            UniformValue::Float(v) => self.gl.uniform1f(loc.as_ref(), v),
            UniformValue::Vec2(v) => self.gl.uniform2f(loc.as_ref(), v.x, v.y),
        }
    }

    pub fn set_vec3(&mut self, name: &'static str, v: Vec3) {
        let loc = self.location(name);
        self.gl.uniform3f(loc.as_ref(), v.x, v.y, v.z);
    }

    pub fn set_mat3(&mut self, name: &'static str, m: Mat3) {
        let loc = self.location(name);
        self.gl
            .uniform_matrix3fv_with_f32_array(loc.as_ref(), false, &m.to_cols_array());
    }

    pub fn set_mat4(&mut self, name: &'static str, m: Mat4) {
        let loc = self.location(name);
        self.gl
            .uniform_matrix4fv_with_f32_array(loc.as_ref(), false, &m.to_cols_array());
    }

    /// Bind a sampler uniform to texture unit `unit`.
    pub fn set_sampler(&mut self, name: &'static str, unit: u32, texture: &WebGlTexture) {
        self.gl.active_texture(GL::TEXTURE0 + unit);
        self.gl.bind_texture(GL::TEXTURE_2D, Some(texture));
        self.set(name, UniformValue::Int(unit as i32));
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        self.gl.delete_program(Some(&self.program));
    }
}

/// Offscreen color + depth target.
pub struct RenderTarget {
    gl: GL,
    framebuffer: WebGlFramebuffer,
    texture: WebGlTexture,
    depth: WebGlRenderbuffer,
    width: u32,
    height: u32,
}

impl RenderTarget {
    pub fn new(gl: &GL, width: u32, height: u32) -> Result<Self> {
        let framebuffer = gl
            .create_framebuffer()
            .ok_or(Error::Gpu("create_framebuffer"))?;
        let texture = gl.create_texture().ok_or(Error::Gpu("create_texture"))?;
        let depth = gl
            .create_renderbuffer()
            .ok_or(Error::Gpu("create_renderbuffer"))?;

        let mut target = Self {
            gl: gl.clone(),
            framebuffer,
            texture,
            depth,
            width: 0,
            height: 0,
        };
        target.resize(width, height)?;
        Ok(target)
    }

    pub fn texture(&self) -> &WebGlTexture {
        &self.texture
    }

    /// Reallocate storage; a no-op when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        let gl = &self.gl;
        let (w, h) = (width as i32, height as i32);

        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA8 as i32,
            w,
            h,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            None,
        )?;
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        gl.bind_renderbuffer(GL::RENDERBUFFER, Some(&self.depth));
        gl.renderbuffer_storage(GL::RENDERBUFFER, GL::DEPTH_COMPONENT24, w, h);

        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&self.texture),
            0,
        );
        gl.framebuffer_renderbuffer(
            GL::FRAMEBUFFER,
            GL::DEPTH_ATTACHMENT,
            GL::RENDERBUFFER,
            Some(&self.depth),
        );
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);

        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.bind_renderbuffer(GL::RENDERBUFFER, None);
        gl.bind_texture(GL::TEXTURE_2D, None);

        if status != GL::FRAMEBUFFER_COMPLETE {
            return Err(Error::Gpu("framebuffer incomplete"));
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Bind for drawing and set the viewport to cover it.
    pub fn bind(&self) {
        self.gl
            .bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        self.gl.viewport(0, 0, self.width as i32, self.height as i32);
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        self.gl.delete_framebuffer(Some(&self.framebuffer));
        self.gl.delete_texture(Some(&self.texture));
        self.gl.delete_renderbuffer(Some(&self.depth));
    }
}

/// Upload a single-channel data texture, sampled with nearest filtering.
pub fn upload_data_texture(gl: &GL, tex: &DataTexture) -> Result<WebGlTexture> {
    let texture = gl.create_texture().ok_or(Error::Gpu("create_texture"))?;
    let size = tex.size as i32;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.pixel_storei(GL::UNPACK_ALIGNMENT, 1);
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::R8 as i32,
        size,
        size,
        0,
        GL::RED,
        GL::UNSIGNED_BYTE,
        Some(tex.data.as_slice()),
    )?;
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::NEAREST as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::NEAREST as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::REPEAT as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::REPEAT as i32);
    gl.bind_texture(GL::TEXTURE_2D, None);
    Ok(texture)
}

/// Vertex array plus the buffer backing it.
pub struct VertexArray {
    gl: GL,
    vao: WebGlVertexArrayObject,
    buffer: web_sys::WebGlBuffer,
    count: i32,
}

impl VertexArray {
    /// Interleaved position/normal triangles.
    pub fn from_vertices(gl: &GL, vertices: &[Vertex]) -> Result<Self> {
        let data: Vec<f32> = vertices
            .iter()
            .flat_map(|v| v.position.into_iter().chain(v.normal))
            .collect();
        let stride = std::mem::size_of::<Vertex>() as i32;
        Self::build(gl, &data, vertices.len() as i32, |gl| {
            gl.enable_vertex_attrib_array(ATTR_POSITION);
            gl.vertex_attrib_pointer_with_i32(ATTR_POSITION, 3, GL::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(ATTR_NORMAL);
            gl.vertex_attrib_pointer_with_i32(ATTR_NORMAL, 3, GL::FLOAT, false, stride, 12);
        })
    }

    /// Two triangles covering clip space, for full-screen passes.
    pub fn fullscreen_quad(gl: &GL) -> Result<Self> {
        let data = [-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, 1.0];
        Self::build(gl, &data, 6, |gl| {
            gl.enable_vertex_attrib_array(ATTR_POSITION);
            gl.vertex_attrib_pointer_with_i32(ATTR_POSITION, 2, GL::FLOAT, false, 8, 0);
        })
    }

    fn build(gl: &GL, data: &[f32], count: i32, layout: impl FnOnce(&GL)) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or(Error::Gpu("create_vertex_array"))?;
        let buffer = gl.create_buffer().ok_or(Error::Gpu("create_buffer"))?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let array = js_sys::Float32Array::from(data);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
        layout(gl);
        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);

        Ok(Self {
            gl: gl.clone(),
            vao,
            buffer,
            count,
        })
    }

    pub fn draw(&self) {
        self.gl.bind_vertex_array(Some(&self.vao));
        self.gl.draw_arrays(GL::TRIANGLES, 0, self.count);
        self.gl.bind_vertex_array(None);
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_buffer(Some(&self.buffer));
    }
}
