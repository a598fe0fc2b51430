use std::ptr;

use glam::{Mat4, Vec3};

use crate::gltf::Mesh;

pub mod gl;
mod program;
mod texture;
mod upload;

pub use program::ShaderProgram;
pub use texture::Texture2D;
pub use upload::{GlUploader, PrimitiveBuffers};

/// A mesh whose non-empty primitives live on the GPU.
pub type GlMesh = Mesh<Option<PrimitiveBuffers>>;

const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];
const TEXTURE_UNIT: u32 = 0;

pub struct Renderer {
    program: ShaderProgram,
    texture: Option<Texture2D>,
    meshes: Vec<GlMesh>,
    aspect_ratio: f32,
}

impl Renderer {
    /// Expects the GL functions to have been loaded with [`gl::load_with`].
    pub fn new(
        program: ShaderProgram,
        texture: Option<Texture2D>,
        meshes: Vec<GlMesh>,
        width: u32,
        height: u32,
    ) -> Renderer {
        gl::call!(gl::Enable(gl::DEPTH_TEST));
        let mut renderer = Renderer {
            program,
            texture,
            meshes,
            aspect_ratio: 1.0,
        };
        renderer.resize(width as i32, height as i32);
        renderer
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        gl::call!(gl::Viewport(0, 0, width, height));
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Draws every uploaded primitive, spinning the model around the y axis
    /// as `time` (in seconds) advances.
    pub fn render(&mut self, time: f32) {
        let [r, g, b, a] = CLEAR_COLOR;
        gl::call!(gl::ClearColor(r, g, b, a));
        gl::call!(gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT));

        self.program.use_program();
        let projection = Mat4::perspective_rh_gl(45f32.to_radians(), self.aspect_ratio, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y);
        let model = Mat4::from_rotation_y(time * 0.5);
        self.program.set_matrix4("projection", &projection);
        self.program.set_matrix4("view", &view);
        self.program.set_matrix4("model", &model);
        self.program.set_bool("useTexture", self.texture.is_some());
        if let Some(texture) = &self.texture {
            texture.set_active(TEXTURE_UNIT);
            self.program.set_int("baseColor", TEXTURE_UNIT as i32);
        }

        for mesh in &self.meshes {
            for primitive in &mesh.primitives {
                let Some(buffers) = &primitive.gpu else {
                    continue;
                };
                gl::call!(gl::BindVertexArray(buffers.vao));
                gl::call!(gl::DrawElements(
                    primitive.mode,
                    buffers.index_count,
                    gl::UNSIGNED_SHORT,
                    ptr::null(),
                ));
            }
        }
        gl::call!(gl::BindVertexArray(0));
    }
}
