use std::fs;
use std::path::Path;

use anyhow::Context;
use glam::Mat4;

use crate::renderer::gl;

/// A linked vertex + fragment shader program.
pub struct ShaderProgram {
    pub program: gl::types::GLuint,
}

impl ShaderProgram {
    /// Reads, compiles and links the GLSL sources at the given paths.
    pub fn from_files(vertex_path: &Path, fragment_path: &Path) -> anyhow::Result<ShaderProgram> {
        let vertex_source = fs::read_to_string(vertex_path)
            .with_context(|| format!("could not read vertex shader {}", vertex_path.display()))?;
        let fragment_source = fs::read_to_string(fragment_path).with_context(|| {
            format!("could not read fragment shader {}", fragment_path.display())
        })?;
        let program = ShaderProgram::from_sources(&vertex_source, &fragment_source)
            .with_context(|| {
                format!(
                    "could not build shader program from {} and {}",
                    vertex_path.display(),
                    fragment_path.display()
                )
            })?;
        log::info!(
            "Compiled shader program {} from {} and {}",
            program.program,
            vertex_path.display(),
            fragment_path.display()
        );
        Ok(program)
    }

    pub fn from_sources(vertex_source: &str, fragment_source: &str) -> anyhow::Result<ShaderProgram> {
        let vertex_shader = gl::create_shader(gl::VERTEX_SHADER, vertex_source)
            .context("vertex shader")?;
        let fragment_shader = match gl::create_shader(gl::FRAGMENT_SHADER, fragment_source) {
            Ok(shader) => shader,
            Err(err) => {
                gl::call!(gl::DeleteShader(vertex_shader));
                return Err(err.context("fragment shader"));
            }
        };
        let program = gl::create_program(&[vertex_shader, fragment_shader]);
        gl::call!(gl::DeleteShader(vertex_shader));
        gl::call!(gl::DeleteShader(fragment_shader));
        Ok(ShaderProgram { program: program? })
    }

    pub fn use_program(&self) {
        gl::call!(gl::UseProgram(self.program));
    }

    // Setters expect the program to be in use. Unknown names are ignored, as
    // GL does for location -1.

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        gl::call!(gl::Uniform1i(self.location(name), value));
    }

    pub fn set_float(&self, name: &str, value: f32) {
        gl::call!(gl::Uniform1f(self.location(name), value));
    }

    pub fn set_matrix4(&self, name: &str, matrix: &Mat4) {
        let columns = matrix.to_cols_array();
        gl::call!(gl::UniformMatrix4fv(
            self.location(name),
            1,
            gl::FALSE,
            columns.as_ptr()
        ));
    }

    fn location(&self, name: &str) -> gl::types::GLint {
        gl::get_uniform_location(self.program, name).unwrap_or(-1)
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        gl::call!(gl::DeleteProgram(self.program));
    }
}
