use crate::gltf::accessor::{attribute_data, index_data};
use crate::gltf::document::{AccessorType, Model, PrimitiveDesc};
use crate::gltf::vertex::{assemble_vertices, Vertex};
use crate::gltf::LoadError;

/// A drawable unit: interleaved vertices, 16-bit indices into them, and the
/// GPU objects they were uploaded into (`()` before upload).
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive<H = ()> {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub material: Option<usize>,
    /// The glTF topology, which matches the GL draw mode enums.
    pub mode: u32,
    pub gpu: H,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<H = ()> {
    pub name: Option<String>,
    pub primitives: Vec<Primitive<H>>,
}

/// Receives finished primitives and creates whatever the GPU side needs to
/// draw them. Called on the thread that owns the graphics context.
pub trait GpuUpload {
    type Handle;

    fn upload(&mut self, primitive: &Primitive) -> Self::Handle;
}

/// Keeps meshes on the CPU only.
pub struct NoUpload;

impl GpuUpload for NoUpload {
    type Handle = ();

    fn upload(&mut self, _primitive: &Primitive) {}
}

impl Mesh {
    /// Hands every primitive to `uploader`, in order.
    pub fn upload<U: GpuUpload>(self, uploader: &mut U) -> Mesh<U::Handle> {
        let primitives = self
            .primitives
            .into_iter()
            .map(|primitive| {
                let gpu = uploader.upload(&primitive);
                Primitive {
                    vertices: primitive.vertices,
                    indices: primitive.indices,
                    material: primitive.material,
                    mode: primitive.mode,
                    gpu,
                }
            })
            .collect();
        Mesh {
            name: self.name,
            primitives,
        }
    }
}

/// Builds the meshes of `model` and uploads them.
///
/// All primitives are assembled before the first upload, so a malformed
/// primitive anywhere in the model means nothing is uploaded at all.
pub fn build_meshes<U: GpuUpload>(
    model: &Model,
    uploader: &mut U,
) -> Result<Vec<Mesh<U::Handle>>, LoadError> {
    let meshes = assemble_meshes(model)?;
    Ok(meshes
        .into_iter()
        .map(|mesh| mesh.upload(uploader))
        .collect())
}

/// Builds CPU-side meshes mirroring the mesh/primitive order of `model`.
pub fn assemble_meshes(model: &Model) -> Result<Vec<Mesh>, LoadError> {
    let mut meshes = Vec::with_capacity(model.meshes.len());
    for (mesh_index, mesh_desc) in model.meshes.iter().enumerate() {
        let mut primitives = Vec::with_capacity(mesh_desc.primitives.len());
        for primitive_desc in &mesh_desc.primitives {
            let primitive = assemble_primitive(model, primitive_desc)?;
            log::debug!(
                "Assembled primitive {} of mesh {mesh_index}: {} vertices, {} indices",
                primitives.len(),
                primitive.vertices.len(),
                primitive.indices.len(),
            );
            primitives.push(primitive);
        }
        meshes.push(Mesh {
            name: mesh_desc.name.clone(),
            primitives,
        });
    }
    Ok(meshes)
}

fn assemble_primitive(model: &Model, primitive: &PrimitiveDesc) -> Result<Primitive, LoadError> {
    let positions = attribute_data(model, primitive, "POSITION", AccessorType::Vec3)?;
    let normals = attribute_data(model, primitive, "NORMAL", AccessorType::Vec3)?;
    let texcoords = attribute_data(model, primitive, "TEXCOORD_0", AccessorType::Vec2)?;
    let vertices = assemble_vertices(&positions, &normals, &texcoords)?;
    let indices = index_data(model, primitive, vertices.len())?;
    Ok(Primitive {
        vertices,
        indices,
        material: primitive.material,
        mode: primitive.mode,
        gpu: (),
    })
}
