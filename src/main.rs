use std::error::Error;
use std::fmt::Display;
use std::path::Path;
use std::time::Instant;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::video::GLProfile;

use gltf_sandbox::config::Config;
use gltf_sandbox::gltf::{self, LoadError};
use gltf_sandbox::renderer::{gl, GlMesh, GlUploader, Renderer, ShaderProgram, Texture2D};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_args(std::env::args().skip(1));
    log::info!("Starting {} with {config:?}", env!("CARGO_PKG_NAME"));

    let sdl_context = sdl2::init().map_err(SdlErr)?;
    let video_subsystem = sdl_context.video().map_err(SdlErr)?;
    let gl_attr = video_subsystem.gl_attr();
    gl_attr.set_context_profile(GLProfile::GLES);
    gl_attr.set_context_version(3, 0);
    gl_attr.set_depth_size(24);
    let window = video_subsystem
        .window(env!("CARGO_PKG_NAME"), config.width, config.height)
        .resizable()
        .opengl()
        .build()?;
    let _gl_context = window.gl_create_context().map_err(SdlErr)?;
    gl::load_with(|s| video_subsystem.gl_get_proc_address(s) as *const core::ffi::c_void);
    if let Err(err) = video_subsystem.gl_set_swap_interval(1) {
        log::warn!("Could not enable vsync: {err}");
    }
    let mut event_pump = sdl_context.event_pump().map_err(SdlErr)?;

    let program = ShaderProgram::from_files(&config.vertex_shader, &config.fragment_shader)?;
    let texture = match &config.texture {
        Some(path) => Some(Texture2D::from_file(path, true, gl::LINEAR, gl::RGBA8)?),
        None => None,
    };
    let meshes = match load_meshes(&config.model) {
        Ok(meshes) => meshes,
        Err(err) => {
            log::error!("Could not load {}: {err}", config.model.display());
            return Err(err.into());
        }
    };
    let (width, height) = window.drawable_size();
    let mut renderer = Renderer::new(program, texture, meshes, width, height);

    let start = Instant::now();
    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::Resized(w, h),
                    ..
                } => renderer.resize(w, h),
                _ => {}
            }
        }

        renderer.render(start.elapsed().as_secs_f32());
        window.gl_swap_window();
    }

    log::info!("Window closed, shutting down");
    Ok(())
}

fn load_meshes(path: &Path) -> Result<Vec<GlMesh>, LoadError> {
    let model = gltf::load_model(path)?;
    let meshes = gltf::build_meshes(&model, &mut GlUploader)?;
    let primitive_count: usize = meshes.iter().map(|mesh| mesh.primitives.len()).sum();
    log::info!(
        "Uploaded {} meshes with {primitive_count} primitives from {}",
        meshes.len(),
        path.display()
    );
    Ok(meshes)
}

#[derive(Debug)]
pub struct SdlErr(String);
impl Display for SdlErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sdl error: {}", self.0)
    }
}
impl Error for SdlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}
