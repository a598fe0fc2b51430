#![allow(clippy::all, non_camel_case_types, non_snake_case, non_upper_case_globals, dead_code, unused_imports)]

use std::borrow::Cow;
use std::ffi::{c_void, CString};

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));

/// Calls a GL function, and in debug builds, panics if it raised an error.
macro_rules! call {
    ($expr:expr) => {{
        let result = unsafe { $expr };
        if cfg!(debug_assertions) {
            $crate::renderer::gl::assert_no_error(file!(), line!());
        }
        result
    }};
}
pub(crate) use call;

/// Panics with the name of the pending GL error, if there is one.
pub fn assert_no_error(file: &str, line: u32) {
    let error = unsafe { GetError() };
    if error != NO_ERROR {
        panic!("OpenGL error {} at {file}:{line}", error_name(error));
    }
}

fn error_name(error: types::GLenum) -> Cow<'static, str> {
    match error {
        INVALID_ENUM => "INVALID_ENUM".into(),
        INVALID_VALUE => "INVALID_VALUE".into(),
        INVALID_OPERATION => "INVALID_OPERATION".into(),
        OUT_OF_MEMORY => "OUT_OF_MEMORY".into(),
        INVALID_FRAMEBUFFER_OPERATION => "INVALID_FRAMEBUFFER_OPERATION".into(),
        other => format!("0x{other:04X}").into(),
    }
}

/// Uploads `data` into the buffer currently bound to `target`.
pub fn buffer_data<T: bytemuck::Pod>(target: types::GLenum, data: &[T], usage: types::GLenum) {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    call!(BufferData(
        target,
        bytes.len() as isize,
        bytes.as_ptr() as *const c_void,
        usage,
    ));
}

/// Compiles a shader of the given type, returning the info log on failure.
pub fn create_shader(shader_type: types::GLenum, source: &str) -> anyhow::Result<types::GLuint> {
    let shader = call!(CreateShader(shader_type));
    let sources = [source.as_bytes().as_ptr() as *const types::GLchar];
    let source_lens = [source.len() as types::GLint];
    call!(ShaderSource(shader, 1, sources.as_ptr(), source_lens.as_ptr()));
    call!(CompileShader(shader));
    let mut compile_status = 0;
    call!(GetShaderiv(shader, COMPILE_STATUS, &mut compile_status));
    if compile_status == FALSE as types::GLint {
        let mut info_log = [0u8; 4096];
        let mut length = 0;
        call!(GetShaderInfoLog(
            shader,
            info_log.len() as types::GLsizei,
            &mut length,
            info_log.as_mut_ptr() as *mut types::GLchar,
        ));
        call!(DeleteShader(shader));
        let info_log = String::from_utf8_lossy(&info_log[..length.max(0) as usize]);
        anyhow::bail!("compiling shader failed: {info_log}");
    }
    Ok(shader)
}

/// Links the shaders into a program, returning the info log on failure.
pub fn create_program(shaders: &[types::GLuint]) -> anyhow::Result<types::GLuint> {
    let program = call!(CreateProgram());
    for &shader in shaders {
        call!(AttachShader(program, shader));
    }
    call!(LinkProgram(program));
    let mut link_status = 0;
    call!(GetProgramiv(program, LINK_STATUS, &mut link_status));
    if link_status == FALSE as types::GLint {
        let mut info_log = [0u8; 4096];
        let mut length = 0;
        call!(GetProgramInfoLog(
            program,
            info_log.len() as types::GLsizei,
            &mut length,
            info_log.as_mut_ptr() as *mut types::GLchar,
        ));
        call!(DeleteProgram(program));
        let info_log = String::from_utf8_lossy(&info_log[..length.max(0) as usize]);
        anyhow::bail!("linking shader program failed: {info_log}");
    }
    Ok(program)
}

/// Returns the location of a uniform, or None if the program has no active
/// uniform with that name.
pub fn get_uniform_location(program: types::GLuint, name: &str) -> Option<types::GLint> {
    let name = CString::new(name).ok()?;
    let location = call!(GetUniformLocation(program, name.as_ptr() as *const types::GLchar));
    (location != -1).then_some(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_known_errors() {
        assert_eq!(error_name(INVALID_ENUM), "INVALID_ENUM");
        assert_eq!(error_name(INVALID_FRAMEBUFFER_OPERATION), "INVALID_FRAMEBUFFER_OPERATION");
        assert_eq!(error_name(0x0503), "0x0503");
    }
}
