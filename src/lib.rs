//! An OpenGL sandbox that loads glTF meshes and draws them.
//!
//! [`gltf`] holds the GL-independent loading pipeline, [`renderer`] the GL
//! side, and [`config`] the command line options of the viewer binary.

pub mod config;
pub mod gltf;
pub mod renderer;
