//! The parsed, in-memory form of a glTF document.
//!
//! Only the parts needed to pull vertex and index data out of a model are
//! read: buffers, buffer views, accessors and meshes. Scenes, nodes,
//! materials and the rest of the document are ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tinyjson::JsonValue;

use crate::gltf::LoadError;

/// glTF `componentType` of 16-bit unsigned integers.
pub const COMPONENT_TYPE_UNSIGNED_SHORT: u32 = 5123;
/// glTF `componentType` of 32-bit floats.
pub const COMPONENT_TYPE_FLOAT: u32 = 5126;
/// glTF primitive `mode` for triangle lists, the default when absent.
pub const MODE_TRIANGLES: u32 = 4;
/// The largest glTF primitive `mode` (TRIANGLE_FAN). Modes 0 through 6 match
/// the GL draw mode enums.
pub const MODE_MAX: u32 = 6;

/// The element kind of an accessor, i.e. how many components make up one
/// element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorType {
    pub fn components(self) -> usize {
        match self {
            AccessorType::Scalar => 1,
            AccessorType::Vec2 => 2,
            AccessorType::Vec3 => 3,
            AccessorType::Vec4 => 4,
            AccessorType::Mat2 => 4,
            AccessorType::Mat3 => 9,
            AccessorType::Mat4 => 16,
        }
    }

    fn from_name(name: &str) -> Option<AccessorType> {
        match name {
            "SCALAR" => Some(AccessorType::Scalar),
            "VEC2" => Some(AccessorType::Vec2),
            "VEC3" => Some(AccessorType::Vec3),
            "VEC4" => Some(AccessorType::Vec4),
            "MAT2" => Some(AccessorType::Mat2),
            "MAT3" => Some(AccessorType::Mat3),
            "MAT4" => Some(AccessorType::Mat4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub buffers: Vec<Buffer>,
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub meshes: Vec<MeshDesc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    /// Absent for sparse or zero-initialized accessors, which are not
    /// supported when resolving data.
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    pub component_type: u32,
    pub count: usize,
    pub kind: AccessorType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDesc {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveDesc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveDesc {
    /// Attribute semantic (e.g. "POSITION") to accessor index.
    pub attributes: HashMap<String, usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
    pub mode: u32,
}

/// Reads the glTF document at `path` and the buffer files it references.
///
/// Buffer URIs are resolved relative to the directory of the document.
pub fn load_model(path: impl AsRef<Path>) -> Result<Model, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root = parse_json(&json)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let mut resources = Vec::new();
    for (i, buffer) in top_level_array(&root, "buffers")?.iter().enumerate() {
        let buffer = take_object(buffer, "buffer")?;
        let uri = buffer_uri(i, buffer)?;
        let buffer_path = base_dir.join(uri);
        let data = fs::read(&buffer_path).map_err(|source| LoadError::Io {
            path: buffer_path,
            source,
        })?;
        resources.push((uri, data));
    }
    let resources = resources
        .iter()
        .map(|(uri, data)| (*uri, data.as_slice()))
        .collect::<Vec<_>>();

    let model = Model::from_root(&root, &resources)?;
    log::info!(
        "Loaded glTF document {}: {} buffers, {} buffer views, {} accessors, {} meshes",
        path.display(),
        model.buffers.len(),
        model.buffer_views.len(),
        model.accessors.len(),
        model.meshes.len(),
    );
    Ok(model)
}

impl Model {
    /// Parses a glTF JSON document, taking buffer contents from `resources`,
    /// which pairs each buffer URI with its bytes.
    pub fn from_json(json: &str, resources: &[(&str, &[u8])]) -> Result<Model, LoadError> {
        Model::from_root(&parse_json(json)?, resources)
    }

    fn from_root(root: &JsonValue, resources: &[(&str, &[u8])]) -> Result<Model, LoadError> {
        let buffers_json = top_level_array(root, "buffers")?;
        let mut buffers = Vec::with_capacity(buffers_json.len());
        for (i, buffer) in buffers_json.iter().enumerate() {
            let buffer = take_object(buffer, "buffer")?;
            let uri = buffer_uri(i, buffer)?;
            let byte_length = required_usize(buffer, "byteLength", "buffer")?;
            let Some((_, data)) = resources.iter().find(|(name, _)| *name == uri) else {
                return Err(LoadError::malformed(format!(
                    "no data found for buffer uri \"{uri}\""
                )));
            };
            if data.len() < byte_length {
                return Err(LoadError::malformed(format!(
                    "buffer {i} declares {byte_length} bytes but \"{uri}\" only has {}",
                    data.len()
                )));
            }
            buffers.push(Buffer {
                data: data[..byte_length].to_vec(),
            });
        }

        let buffer_views_json = top_level_array(root, "bufferViews")?;
        let mut buffer_views = Vec::with_capacity(buffer_views_json.len());
        for buffer_view in buffer_views_json {
            let buffer_view = take_object(buffer_view, "buffer view")?;
            buffer_views.push(BufferView {
                buffer: required_usize(buffer_view, "buffer", "buffer view")?,
                byte_offset: optional_usize(buffer_view, "byteOffset")?.unwrap_or(0),
                byte_length: required_usize(buffer_view, "byteLength", "buffer view")?,
                byte_stride: optional_usize(buffer_view, "byteStride")?,
            });
        }

        let accessors_json = top_level_array(root, "accessors")?;
        let mut accessors = Vec::with_capacity(accessors_json.len());
        for accessor in accessors_json {
            let accessor = take_object(accessor, "accessor")?;
            let kind = match accessor.get("type").map(|v| v.get::<String>()) {
                Some(Some(name)) => AccessorType::from_name(name).ok_or_else(|| {
                    LoadError::malformed(format!("unknown accessor type \"{name}\""))
                })?,
                _ => return Err(LoadError::malformed("accessor is missing its type")),
            };
            accessors.push(Accessor {
                buffer_view: optional_usize(accessor, "bufferView")?,
                byte_offset: optional_usize(accessor, "byteOffset")?.unwrap_or(0),
                component_type: required_usize(accessor, "componentType", "accessor")? as u32,
                count: required_usize(accessor, "count", "accessor")?,
                kind,
            });
        }

        let meshes_json = top_level_array(root, "meshes")?;
        let mut meshes = Vec::with_capacity(meshes_json.len());
        for mesh in meshes_json {
            let mesh = take_object(mesh, "mesh")?;
            let name = mesh.get("name").and_then(|v| v.get::<String>()).cloned();
            let primitives_json = match mesh.get("primitives") {
                Some(primitives) => take_array(primitives, "mesh primitives")?,
                None => return Err(LoadError::malformed("mesh has no primitives")),
            };
            let mut primitives = Vec::with_capacity(primitives_json.len());
            for primitive in primitives_json {
                let primitive = take_object(primitive, "primitive")?;
                let attributes_json = match primitive.get("attributes") {
                    Some(attributes) => take_object(attributes, "primitive attributes")?,
                    None => return Err(LoadError::malformed("primitive has no attributes")),
                };
                let mut attributes = HashMap::with_capacity(attributes_json.len());
                for (semantic, accessor) in attributes_json {
                    attributes.insert(semantic.clone(), take_usize(accessor, semantic)?);
                }
                primitives.push(PrimitiveDesc {
                    attributes,
                    indices: optional_usize(primitive, "indices")?,
                    material: optional_usize(primitive, "material")?,
                    mode: primitive_mode(primitive)?,
                });
            }
            meshes.push(MeshDesc { name, primitives });
        }

        Ok(Model {
            buffers,
            buffer_views,
            accessors,
            meshes,
        })
    }
}

fn primitive_mode(primitive: &HashMap<String, JsonValue>) -> Result<u32, LoadError> {
    match optional_usize(primitive, "mode")? {
        None => Ok(MODE_TRIANGLES),
        Some(mode) if mode <= MODE_MAX as usize => Ok(mode as u32),
        Some(mode) => Err(LoadError::malformed(format!(
            "unknown primitive mode {mode}"
        ))),
    }
}

fn parse_json(json: &str) -> Result<JsonValue, LoadError> {
    json.parse::<JsonValue>()
        .map_err(|err| LoadError::malformed(format!("invalid JSON: {err}")))
}

/// Returns the URI of an external buffer file. Embedded and GLB buffers are
/// rejected.
fn buffer_uri(index: usize, buffer: &HashMap<String, JsonValue>) -> Result<&str, LoadError> {
    match buffer.get("uri").map(|v| v.get::<String>()) {
        Some(Some(uri)) if uri.starts_with("data:") => Err(LoadError::malformed(format!(
            "buffer {index} uses an embedded data uri, which is not supported"
        ))),
        Some(Some(uri)) => Ok(uri.as_str()),
        Some(None) => Err(LoadError::malformed(format!(
            "buffer {index} has a non-string uri"
        ))),
        None => Err(LoadError::malformed(format!(
            "buffer {index} has no uri, binary glTF buffers are not supported"
        ))),
    }
}

/// Returns the named top-level array, or an empty slice if it's absent.
fn top_level_array<'a>(root: &'a JsonValue, key: &str) -> Result<&'a [JsonValue], LoadError> {
    let root = take_object(root, "document root")?;
    match root.get(key) {
        Some(value) => Ok(take_array(value, key)?.as_slice()),
        None => Ok(&[]),
    }
}

fn take_object<'a>(
    value: &'a JsonValue,
    what: &str,
) -> Result<&'a HashMap<String, JsonValue>, LoadError> {
    value
        .get::<HashMap<_, _>>()
        .ok_or_else(|| LoadError::malformed(format!("expected {what} to be an object")))
}

fn take_array<'a>(value: &'a JsonValue, what: &str) -> Result<&'a Vec<JsonValue>, LoadError> {
    value
        .get::<Vec<_>>()
        .ok_or_else(|| LoadError::malformed(format!("expected {what} to be an array")))
}

/// Return usize if JsonValue is a non-negative whole number.
fn take_usize(value: &JsonValue, what: &str) -> Result<usize, LoadError> {
    match value.get::<f64>() {
        Some(&n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => Ok(n as usize),
        _ => Err(LoadError::malformed(format!(
            "expected {what} to be a non-negative integer"
        ))),
    }
}

fn optional_usize(object: &HashMap<String, JsonValue>, key: &str) -> Result<Option<usize>, LoadError> {
    object.get(key).map(|value| take_usize(value, key)).transpose()
}

fn required_usize(
    object: &HashMap<String, JsonValue>,
    key: &str,
    what: &str,
) -> Result<usize, LoadError> {
    optional_usize(object, key)?
        .ok_or_else(|| LoadError::malformed(format!("{what} is missing \"{key}\"")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_VIEWS: &str = r#"{
        "buffers": [{ "uri": "data.bin", "byteLength": 8 }],
        "bufferViews": [
            { "buffer": 0, "byteLength": 6 },
            { "buffer": 0, "byteOffset": 6, "byteLength": 2, "byteStride": 2 }
        ],
        "accessors": [
            { "bufferView": 1, "componentType": 5123, "count": 1, "type": "SCALAR" }
        ],
        "meshes": [
            {
                "name": "Quad",
                "primitives": [
                    { "attributes": { "POSITION": 0 }, "indices": 0, "material": 2 },
                    { "attributes": { "POSITION": 0 }, "mode": 1 }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_layout_and_meshes() {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let model = Model::from_json(TWO_VIEWS, &[("data.bin", &data[..])]).unwrap();

        assert_eq!(model.buffers[0].data, &data[..8]);
        assert_eq!(model.buffer_views.len(), 2);
        assert_eq!(model.buffer_views[0].byte_offset, 0);
        assert_eq!(model.buffer_views[1].byte_offset, 6);
        assert_eq!(model.buffer_views[1].byte_stride, Some(2));

        let accessor = &model.accessors[0];
        assert_eq!(accessor.buffer_view, Some(1));
        assert_eq!(accessor.component_type, COMPONENT_TYPE_UNSIGNED_SHORT);
        assert_eq!(accessor.kind, AccessorType::Scalar);

        let mesh = &model.meshes[0];
        assert_eq!(mesh.name.as_deref(), Some("Quad"));
        assert_eq!(mesh.primitives[0].attributes["POSITION"], 0);
        assert_eq!(mesh.primitives[0].indices, Some(0));
        assert_eq!(mesh.primitives[0].material, Some(2));
        assert_eq!(mesh.primitives[0].mode, MODE_TRIANGLES);
        assert_eq!(mesh.primitives[1].indices, None);
        assert_eq!(mesh.primitives[1].mode, 1);
    }

    #[test]
    fn primitive_modes_are_limited_to_gl_draw_modes() {
        let fan = r#"{ "meshes": [{ "primitives": [{ "attributes": {}, "mode": 6 }] }] }"#;
        let model = Model::from_json(fan, &[]).unwrap();
        assert_eq!(model.meshes[0].primitives[0].mode, MODE_MAX);

        let unknown = r#"{ "meshes": [{ "primitives": [{ "attributes": {}, "mode": 9 }] }] }"#;
        assert!(matches!(
            Model::from_json(unknown, &[]),
            Err(LoadError::MalformedAsset(_))
        ));
    }

    #[test]
    fn missing_sections_are_empty() {
        let model = Model::from_json(r#"{ "asset": { "version": "2.0" } }"#, &[]).unwrap();
        assert_eq!(model, Model::default());
    }

    #[test]
    fn short_buffer_is_malformed() {
        let result = Model::from_json(TWO_VIEWS, &[("data.bin", &[0u8; 4][..])]);
        assert!(matches!(result, Err(LoadError::MalformedAsset(_))));
    }

    #[test]
    fn unsupported_buffer_sources_are_malformed() {
        for json in [
            r#"{ "buffers": [{ "byteLength": 4 }] }"#,
            r#"{ "buffers": [{ "uri": "data:application/octet-stream;base64,AAAA", "byteLength": 3 }] }"#,
            r#"{ "buffers": [{ "uri": "elsewhere.bin", "byteLength": 4 }] }"#,
        ] {
            let result = Model::from_json(json, &[("data.bin", &[0u8; 4][..])]);
            assert!(matches!(result, Err(LoadError::MalformedAsset(_))), "{json}");
        }
    }

    #[test]
    fn bad_json_is_malformed() {
        for json in [
            "{ not json",
            "[]",
            r#"{ "accessors": [{ "componentType": 5126, "count": -1, "type": "VEC3" }] }"#,
            r#"{ "accessors": [{ "componentType": 5126, "count": 1.5, "type": "VEC3" }] }"#,
            r#"{ "accessors": [{ "componentType": 5126, "count": 1, "type": "VEC5" }] }"#,
            r#"{ "accessors": [{ "componentType": 5126, "count": 1 }] }"#,
            r#"{ "meshes": [{ "primitives": [{ "indices": 0 }] }] }"#,
            r#"{ "meshes": [{ "primitives": [{ "attributes": {}, "mode": 7 }] }] }"#,
        ] {
            let result = Model::from_json(json, &[]);
            assert!(matches!(result, Err(LoadError::MalformedAsset(_))), "{json}");
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("gltf-sandbox-does-not-exist.gltf");
        match load_model(&path) {
            Err(LoadError::Io { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected an io error, got {other:?}"),
        }
    }
}
