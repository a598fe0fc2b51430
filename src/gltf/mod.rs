//! Turns a glTF document into meshes of interleaved vertices and 16-bit
//! indices, ready to be handed to the GPU.
//!
//! The pipeline per primitive is: resolve the POSITION, NORMAL and
//! TEXCOORD_0 accessors ([`accessor`]), interleave them ([`vertex`]),
//! resolve and bounds-check the indices, then hand the result to a
//! [`GpuUpload`] implementation ([`mesh`]).

pub mod accessor;
pub mod document;
mod error;
pub mod mesh;
pub mod vertex;

pub use document::{load_model, Model};
pub use error::LoadError;
pub use mesh::{assemble_meshes, build_meshes, GpuUpload, Mesh, NoUpload, Primitive};
pub use vertex::{Vertex, VERTEX_ATTRIBUTES, VERTEX_STRIDE};
