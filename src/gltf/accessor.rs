//! Resolves accessors into typed arrays: accessor → buffer view → buffer.
//!
//! Only tightly packed data is supported. Sparse accessors and interleaved
//! (strided) buffer views are reported as malformed rather than misread.

use std::mem;

use crate::gltf::document::{
    AccessorType, Model, PrimitiveDesc, COMPONENT_TYPE_FLOAT, COMPONENT_TYPE_UNSIGNED_SHORT,
};
use crate::gltf::LoadError;

/// A scalar type an accessor's components can be decoded into.
pub trait Element: Copy {
    /// The glTF `componentType` this element type is stored as.
    const COMPONENT_TYPE: u32;

    /// Decodes one element from exactly `size_of::<Self>()` little-endian
    /// bytes.
    fn from_le_bytes(bytes: &[u8]) -> Self;
}

impl Element for f32 {
    const COMPONENT_TYPE: u32 = COMPONENT_TYPE_FLOAT;

    fn from_le_bytes(bytes: &[u8]) -> f32 {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl Element for u16 {
    const COMPONENT_TYPE: u32 = COMPONENT_TYPE_UNSIGNED_SHORT;

    fn from_le_bytes(bytes: &[u8]) -> u16 {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }
}

/// Decodes every component of accessor `accessor_index` as `T`, which must
/// hold elements of type `kind`.
///
/// The returned array is flat: a VEC3 accessor with `count` elements yields
/// `3 * count` values.
pub fn resolve_accessor<T: Element>(
    model: &Model,
    accessor_index: usize,
    kind: AccessorType,
) -> Result<Vec<T>, LoadError> {
    let accessor = model.accessors.get(accessor_index).ok_or_else(|| {
        LoadError::malformed(format!(
            "accessor {accessor_index} does not exist ({} accessors)",
            model.accessors.len()
        ))
    })?;
    if accessor.kind != kind {
        return Err(LoadError::malformed(format!(
            "accessor {accessor_index} holds {:?} elements, expected {kind:?}",
            accessor.kind
        )));
    }
    if accessor.component_type != T::COMPONENT_TYPE {
        return Err(LoadError::malformed(format!(
            "accessor {accessor_index} has component type {}, expected {}",
            accessor.component_type,
            T::COMPONENT_TYPE
        )));
    }
    let Some(buffer_view_index) = accessor.buffer_view else {
        return Err(LoadError::malformed(format!(
            "accessor {accessor_index} has no buffer view, sparse accessors are not supported"
        )));
    };
    let buffer_view = model.buffer_views.get(buffer_view_index).ok_or_else(|| {
        LoadError::malformed(format!(
            "accessor {accessor_index} refers to buffer view {buffer_view_index}, but there are only {}",
            model.buffer_views.len()
        ))
    })?;
    let buffer = model.buffers.get(buffer_view.buffer).ok_or_else(|| {
        LoadError::malformed(format!(
            "buffer view {buffer_view_index} refers to buffer {}, but there are only {}",
            buffer_view.buffer,
            model.buffers.len()
        ))
    })?;

    let components = accessor.kind.components();
    let element_size = components * mem::size_of::<T>();
    if let Some(stride) = buffer_view.byte_stride {
        if stride != element_size {
            return Err(LoadError::malformed(format!(
                "buffer view {buffer_view_index} has a byte stride of {stride}, only tightly packed data ({element_size} bytes) is supported"
            )));
        }
    }

    let view_bytes = buffer_view
        .byte_offset
        .checked_add(buffer_view.byte_length)
        .and_then(|view_end| buffer.data.get(buffer_view.byte_offset..view_end))
        .ok_or_else(|| {
            LoadError::malformed(format!(
                "buffer view {buffer_view_index} ({} bytes at {}) overruns buffer {} ({} bytes)",
                buffer_view.byte_length,
                buffer_view.byte_offset,
                buffer_view.buffer,
                buffer.data.len()
            ))
        })?;
    let accessor_bytes = accessor
        .count
        .checked_mul(element_size)
        .and_then(|length| Some(accessor.byte_offset..accessor.byte_offset.checked_add(length)?))
        .and_then(|range| view_bytes.get(range))
        .ok_or_else(|| {
            LoadError::malformed(format!(
                "accessor {accessor_index} ({} elements at {}) overruns buffer view {buffer_view_index} ({} bytes)",
                accessor.count,
                accessor.byte_offset,
                buffer_view.byte_length
            ))
        })?;

    Ok(accessor_bytes
        .chunks_exact(mem::size_of::<T>())
        .map(T::from_le_bytes)
        .collect())
}

/// Resolves the float data of the attribute `semantic` (e.g. "POSITION") of a
/// primitive, whose accessor must hold `kind` elements.
pub fn attribute_data(
    model: &Model,
    primitive: &PrimitiveDesc,
    semantic: &str,
    kind: AccessorType,
) -> Result<Vec<f32>, LoadError> {
    let &accessor_index = primitive
        .attributes
        .get(semantic)
        .ok_or_else(|| LoadError::MissingAttribute(semantic.to_string()))?;
    resolve_accessor(model, accessor_index, kind)
}

/// Resolves the SCALAR index data of a primitive, checking every index
/// against `vertex_count`. Non-indexed primitives get the sequence
/// `0..vertex_count`, which is limited to 65535 vertices: glTF reserves the
/// index value 65535 for primitive restart.
pub fn index_data(
    model: &Model,
    primitive: &PrimitiveDesc,
    vertex_count: usize,
) -> Result<Vec<u16>, LoadError> {
    let Some(accessor_index) = primitive.indices else {
        let last = u16::try_from(vertex_count).map_err(|_| {
            LoadError::malformed(format!(
                "{vertex_count} vertices need index values above 65534, and 65535 is reserved for primitive restart"
            ))
        })?;
        return Ok((0..last).collect());
    };

    let indices = resolve_accessor::<u16>(model, accessor_index, AccessorType::Scalar)?;
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(LoadError::malformed(format!(
            "index {index} in accessor {accessor_index} is out of range for {vertex_count} vertices"
        )));
    }
    Ok(indices)
}
