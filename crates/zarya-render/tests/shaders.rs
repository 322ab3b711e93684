//! Validation of the WGSL programs without a GPU
//!
//! Both programs are parsed and validated with naga, and the values they
//! hard-code are checked against the host-side algorithms they mirror.

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use naga::valid::{Capabilities, ValidationFlags, Validator};
use zarya_core::proxy::{CUBE_INDICES, CUBE_NORMALS, CUBE_POSITIONS};
use zarya_core::raymarch::{HIT_THRESHOLD, MAX_STEPS, NORMAL_EPSILON};
use zarya_core::sdf::{LATTICE_PERIOD, LATTICE_SPHERE_RADIUS};
use zarya_render::{MESH_SHADER, MeshUniforms, RAYMARCH_SHADER, RaymarchUniforms};

fn parse_and_validate(label: &str, source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{label} failed to parse:\n{}", e.emit_to_string(source)));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{label} failed validation:\n{}", e.emit_to_string(source)));
    module
}

fn entry_points(module: &naga::Module) -> Vec<(&str, naga::ShaderStage)> {
    module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect()
}

fn uniform_struct_size(module: &naga::Module) -> u32 {
    module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(name), naga::TypeInner::Struct { span, .. }) if name == "Uniforms" => Some(*span),
            _ => None,
        })
        .expect("shader declares a Uniforms struct")
}

fn constant(module: &naga::Module, name: &str) -> naga::Literal {
    let (_, c) = module
        .constants
        .iter()
        .find(|(_, c)| c.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("constant {name} missing"));
    match module.global_expressions[c.init] {
        naga::Expression::Literal(literal) => literal,
        ref other => panic!("constant {name} is not a literal: {other:?}"),
    }
}

/// Numbers inside the initializer of `var<private> NAME`
fn table(source: &str, name: &str) -> Vec<f32> {
    let start = source
        .find(&format!("var<private> {name}"))
        .unwrap_or_else(|| panic!("table {name} missing"));
    let body = &source[start..];
    let body = &body[body.find(">(").unwrap() + 2..body.find(");").unwrap()];
    body.replace("vec3<f32>", "")
        .split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .filter(|tok| !tok.is_empty())
        .map(|tok| tok.parse::<f32>().unwrap())
        .collect()
}

#[test]
fn mesh_shader_validates() {
    let module = parse_and_validate("mesh.wgsl", MESH_SHADER);
    let eps = entry_points(&module);
    assert!(eps.contains(&("vs_mesh", naga::ShaderStage::Vertex)));
    assert!(eps.contains(&("fs_mesh", naga::ShaderStage::Fragment)));
    assert_eq!(
        uniform_struct_size(&module) as usize,
        std::mem::size_of::<MeshUniforms>()
    );
}

#[test]
fn raymarch_shader_validates() {
    let module = parse_and_validate("raymarch.wgsl", RAYMARCH_SHADER);
    let eps = entry_points(&module);
    assert!(eps.contains(&("vs_raymarch", naga::ShaderStage::Vertex)));
    assert!(eps.contains(&("fs_raymarch", naga::ShaderStage::Fragment)));
    assert_eq!(
        uniform_struct_size(&module) as usize,
        std::mem::size_of::<RaymarchUniforms>()
    );
}

#[test]
fn raymarch_constants_match_host() {
    let module = parse_and_validate("raymarch.wgsl", RAYMARCH_SHADER);
    assert_eq!(
        constant(&module, "MAX_STEPS"),
        naga::Literal::I32(MAX_STEPS as i32)
    );
    assert_eq!(
        constant(&module, "HIT_THRESHOLD"),
        naga::Literal::F32(HIT_THRESHOLD)
    );
    assert_eq!(
        constant(&module, "NORMAL_EPSILON"),
        naga::Literal::F32(NORMAL_EPSILON)
    );
    assert_eq!(
        constant(&module, "LATTICE_PERIOD"),
        naga::Literal::F32(LATTICE_PERIOD)
    );
    assert_eq!(
        constant(&module, "LATTICE_SPHERE_RADIUS"),
        naga::Literal::F32(LATTICE_SPHERE_RADIUS)
    );
}

#[test]
fn proxy_tables_match_host() {
    let positions: Vec<f32> = CUBE_POSITIONS.iter().flat_map(|p| p.to_array()).collect();
    let normals: Vec<f32> = CUBE_NORMALS.iter().flat_map(|n| n.to_array()).collect();
    let indices: Vec<f32> = CUBE_INDICES.iter().map(|&i| i as f32).collect();

    assert_eq!(table(RAYMARCH_SHADER, "CUBE_POSITIONS"), positions);
    assert_eq!(table(RAYMARCH_SHADER, "CUBE_NORMALS"), normals);
    assert_eq!(table(RAYMARCH_SHADER, "CUBE_INDICES"), indices);
}

#[test]
fn raymarch_writes_depth() {
    let module = parse_and_validate("raymarch.wgsl", RAYMARCH_SHADER);
    let fs = module
        .entry_points
        .iter()
        .find(|ep| ep.name == "fs_raymarch")
        .unwrap();
    let result = fs.function.result.as_ref().expect("fragment returns outputs");
    let naga::TypeInner::Struct { ref members, .. } = module.types[result.ty].inner else {
        panic!("fragment output should be a struct");
    };
    assert!(members.iter().any(|m| matches!(
        m.binding,
        Some(naga::Binding::BuiltIn(naga::BuiltIn::FragDepth))
    )));
}
