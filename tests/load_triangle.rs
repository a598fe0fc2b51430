use std::path::PathBuf;

use glam::{Vec2, Vec3};
use gltf_sandbox::gltf::{self, LoadError, NoUpload};

fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join(name)
}

#[test]
fn loads_shipped_triangle() {
    let model = gltf::load_model(asset("Triangle.gltf")).unwrap();
    let meshes = gltf::build_meshes(&model, &mut NoUpload).unwrap();

    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].name.as_deref(), Some("Triangle"));
    assert_eq!(meshes[0].primitives.len(), 1);

    let primitive = &meshes[0].primitives[0];
    assert_eq!(primitive.indices, vec![0, 1, 2]);
    assert_eq!(primitive.mode, 4);
    assert_eq!(primitive.material, None);

    let vertices = &primitive.vertices;
    assert_eq!(vertices.len(), 3);
    assert_eq!(vertices[0].position, Vec3::new(-0.5, -0.5, 0.0));
    assert_eq!(vertices[1].position, Vec3::new(0.5, -0.5, 0.0));
    assert_eq!(vertices[2].position, Vec3::new(0.0, 0.5, 0.0));
    assert!(vertices.iter().all(|v| v.normal == Vec3::Z));
    assert_eq!(vertices[2].texcoord, Vec2::new(0.5, 1.0));
}

#[test]
fn loading_twice_gives_equal_meshes() {
    let first = gltf::assemble_meshes(&gltf::load_model(asset("Triangle.gltf")).unwrap()).unwrap();
    let second = gltf::assemble_meshes(&gltf::load_model(asset("Triangle.gltf")).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn uses_the_given_path() {
    match gltf::load_model(asset("Missing.gltf")) {
        Err(LoadError::Io { path, .. }) => assert_eq!(path, asset("Missing.gltf")),
        other => panic!("expected an io error, got {other:?}"),
    }
}
