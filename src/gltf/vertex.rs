use std::mem;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::gltf::LoadError;

/// The vertex attribute location of the POSITION attribute.
pub const ATTR_LOC_POSITION: u32 = 0;
/// The vertex attribute location of the NORMAL attribute.
pub const ATTR_LOC_NORMAL: u32 = 1;
/// The vertex attribute location of the TEXCOORD_0 attribute.
pub const ATTR_LOC_TEXCOORD_0: u32 = 2;

/// Size of one interleaved [`Vertex`] in bytes: 8 floats.
pub const VERTEX_STRIDE: usize = 8 * mem::size_of::<f32>();

/// One float attribute inside the interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub byte_offset: usize,
}

/// The layout the GPU side must bind for [`Vertex`] buffers.
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        location: ATTR_LOC_POSITION,
        components: 3,
        byte_offset: 0,
    },
    VertexAttribute {
        location: ATTR_LOC_NORMAL,
        components: 3,
        byte_offset: 3 * mem::size_of::<f32>(),
    },
    VertexAttribute {
        location: ATTR_LOC_TEXCOORD_0,
        components: 2,
        byte_offset: 6 * mem::size_of::<f32>(),
    },
];

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

/// Interleaves per-attribute float arrays into [`Vertex`] records.
///
/// The arrays must describe the same number of vertices, with no leftover
/// components.
pub fn assemble_vertices(
    positions: &[f32],
    normals: &[f32],
    texcoords: &[f32],
) -> Result<Vec<Vertex>, LoadError> {
    let vertex_count = positions.len() / 3;
    if positions.len() % 3 != 0
        || normals.len() != vertex_count * 3
        || texcoords.len() != vertex_count * 2
    {
        return Err(LoadError::malformed(format!(
            "attribute counts disagree: {} position floats, {} normal floats, {} texcoord floats",
            positions.len(),
            normals.len(),
            texcoords.len()
        )));
    }

    let mut vertices = Vec::with_capacity(vertex_count);
    for ((position, normal), texcoord) in positions
        .chunks_exact(3)
        .zip(normals.chunks_exact(3))
        .zip(texcoords.chunks_exact(2))
    {
        vertices.push(Vertex {
            position: Vec3::from_slice(position),
            normal: Vec3::from_slice(normal),
            texcoord: Vec2::from_slice(texcoord),
        });
    }
    Ok(vertices)
}
