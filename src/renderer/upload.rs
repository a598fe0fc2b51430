use std::ffi::c_void;
use std::ptr;

use crate::gltf::{GpuUpload, Primitive, VERTEX_ATTRIBUTES, VERTEX_STRIDE};
use crate::renderer::gl;

/// The GL objects backing one uploaded primitive. Deleted on drop.
#[derive(Debug, PartialEq)]
pub struct PrimitiveBuffers {
    pub vao: gl::types::GLuint,
    pub vbo: gl::types::GLuint,
    pub ebo: gl::types::GLuint,
    pub index_count: gl::types::GLsizei,
}

impl Drop for PrimitiveBuffers {
    fn drop(&mut self) {
        gl::call!(gl::DeleteVertexArrays(1, &self.vao));
        gl::call!(gl::DeleteBuffers(1, &self.vbo));
        gl::call!(gl::DeleteBuffers(1, &self.ebo));
    }
}

/// Uploads primitives into a VAO with one interleaved vertex buffer and one
/// 16-bit index buffer each. Requires a current GL context.
pub struct GlUploader;

impl GpuUpload for GlUploader {
    type Handle = Option<PrimitiveBuffers>;

    fn upload(&mut self, primitive: &Primitive) -> Option<PrimitiveBuffers> {
        if primitive.vertices.is_empty() || primitive.indices.is_empty() {
            return None;
        }

        let mut vao = 0;
        let mut buffers = [0; 2];
        gl::call!(gl::GenVertexArrays(1, &mut vao));
        gl::call!(gl::GenBuffers(buffers.len() as i32, buffers.as_mut_ptr()));
        let [vbo, ebo] = buffers;

        gl::call!(gl::BindVertexArray(vao));
        gl::call!(gl::BindBuffer(gl::ARRAY_BUFFER, vbo));
        gl::buffer_data(gl::ARRAY_BUFFER, &primitive.vertices, gl::STATIC_DRAW);
        // The element array binding is VAO state, so it stays bound to the VAO.
        gl::call!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo));
        gl::buffer_data(gl::ELEMENT_ARRAY_BUFFER, &primitive.indices, gl::STATIC_DRAW);

        for attribute in VERTEX_ATTRIBUTES {
            gl::call!(gl::EnableVertexAttribArray(attribute.location));
            gl::call!(gl::VertexAttribPointer(
                attribute.location,
                attribute.components,
                gl::FLOAT,
                gl::FALSE,
                VERTEX_STRIDE as gl::types::GLsizei,
                ptr::null::<c_void>().wrapping_add(attribute.byte_offset),
            ));
        }

        gl::call!(gl::BindVertexArray(0));
        gl::call!(gl::BindBuffer(gl::ARRAY_BUFFER, 0));

        Some(PrimitiveBuffers {
            vao,
            vbo,
            ebo,
            index_count: primitive.indices.len() as gl::types::GLsizei,
        })
    }
}
