/// Tests for ShaderVariant compile/reflect against the MockRenderer

use super::*;
use crate::renderer::mock_renderer::{self, MockRenderer, MOCK_BYTECODE_HEADER};

const PIXEL_SOURCE: &str = "float4 main() : SV_Target { return baseColor; }";

fn pixel_variant() -> ShaderVariant {
    ShaderVariant::new(ShaderKeyword::from_keywords(["FOG"]), ShaderStage::Pixel, PIXEL_SOURCE)
}

// ============================================================================
// Code buffer
// ============================================================================

#[test]
fn test_new_variant_is_uncompiled_source() {
    let variant = pixel_variant();
    assert!(!variant.is_compiled());
    assert_eq!(variant.code(), &ShaderCode::Source(PIXEL_SOURCE.to_string()));
    assert!(variant.shader().is_none());
    assert!(variant.reflection().is_empty());
}

#[test]
fn test_set_bytes_then_source_switches_compiled_flag() {
    let mut variant = pixel_variant();

    variant.set_bytes_code(&[0x44, 0x58, 0x42, 0x43]);
    assert!(variant.is_compiled());
    assert_eq!(variant.code().as_bytes(), &[0x44, 0x58, 0x42, 0x43]);

    variant.set_source_code("void main() {}");
    assert!(!variant.is_compiled());
    assert_eq!(variant.code(), &ShaderCode::Source("void main() {}".to_string()));
}

#[test]
fn test_code_capacity_never_shrinks() {
    let mut variant = pixel_variant();
    variant.set_bytes_code(&vec![7u8; 4096]);
    let capacity = variant.code().capacity();
    assert!(capacity >= 4096);

    variant.set_source_code("x");
    assert!(variant.code().capacity() >= capacity);
    variant.set_bytes_code(&[1, 2]);
    assert!(variant.code().capacity() >= capacity);
}

// ============================================================================
// compile()
// ============================================================================

#[test]
fn test_compile_creates_stage_object() {
    let mut renderer = MockRenderer::new();
    let mut variant = pixel_variant();

    variant.compile(&mut renderer).unwrap();

    assert!(variant.is_compiled());
    assert!(variant.code().as_bytes().starts_with(MOCK_BYTECODE_HEADER));
    assert_eq!(variant.shader().unwrap().stage(), ShaderStage::Pixel);
    assert_eq!(renderer.stats().shaders_created, 1);
}

#[test]
fn test_compile_twice_is_noop() {
    let mut renderer = MockRenderer::new();
    let mut variant = pixel_variant();

    variant.compile(&mut renderer).unwrap();
    let bytes = variant.code().clone();
    variant.compile(&mut renderer).unwrap();

    assert_eq!(variant.code(), &bytes);
    assert_eq!(*renderer.compile_calls.lock().unwrap(), 1);
    assert_eq!(renderer.stats().shaders_created, 1);
}

#[test]
fn test_compile_prebuilt_bytecode_only_creates_stage_object() {
    let mut renderer = MockRenderer::new();
    let mut variant = ShaderVariant::from_code(
        ShaderKeyword::new(),
        ShaderStage::Vertex,
        ShaderCode::Bytecode(vec![3, 2, 0x23, 0x07]),
    );

    variant.compile(&mut renderer).unwrap();

    assert_eq!(*renderer.compile_calls.lock().unwrap(), 0);
    assert!(variant.shader().is_some());
    assert_eq!(variant.code().as_bytes(), &[3, 2, 0x23, 0x07]);
}

#[test]
fn test_compile_failure_leaves_variant_uncompiled() {
    let mut renderer = MockRenderer::new();
    renderer.fail_compile_marker = Some("baseColor".to_string());
    let mut variant = pixel_variant();

    let err = variant.compile(&mut renderer).unwrap_err();

    match err {
        Error::CompileError { stage, keywords, diagnostic } => {
            assert_eq!(stage, ShaderStage::Pixel);
            assert_eq!(keywords, "_FOG");
            assert!(diagnostic.contains("syntax error"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!variant.is_compiled());
    assert!(variant.shader().is_none());
    assert_eq!(variant.code(), &ShaderCode::Source(PIXEL_SOURCE.to_string()));
}

#[test]
fn test_stage_object_failure_keeps_source() {
    let mut renderer = MockRenderer::new();
    renderer.fail_shader_creation = true;
    let mut variant = pixel_variant();

    assert!(variant.compile(&mut renderer).is_err());
    assert!(!variant.is_compiled());
    assert!(variant.shader().is_none());
}

// ============================================================================
// reflect()
// ============================================================================

#[test]
fn test_reflect_source_restores_code() {
    let mut renderer = mock_renderer::lit_renderer();
    let mut variant = pixel_variant();

    variant.reflect(&mut renderer).unwrap();

    assert!(!variant.is_compiled());
    assert_eq!(variant.code(), &ShaderCode::Source(PIXEL_SOURCE.to_string()));
    assert_eq!(variant.constant_bindings().len(), 1);
    assert_eq!(variant.constant_bindings()[0].name, "PerMaterial");
    assert_eq!(variant.sampler_bindings()[0].name, "albedoMap");
}

#[test]
fn test_reflect_failure_restores_code() {
    let mut renderer = mock_renderer::lit_renderer();
    renderer.fail_reflect = true;
    let mut variant = pixel_variant();

    let err = variant.reflect(&mut renderer).unwrap_err();

    assert!(matches!(err, Error::ReflectError { stage: ShaderStage::Pixel, .. }));
    assert!(!variant.is_compiled());
    assert_eq!(variant.code(), &ShaderCode::Source(PIXEL_SOURCE.to_string()));
    assert!(variant.reflection().is_empty());
}

#[test]
fn test_reflect_transient_compile_failure() {
    let mut renderer = mock_renderer::lit_renderer();
    renderer.fail_compile_marker = Some("SV_Target".to_string());
    let mut variant = pixel_variant();

    let err = variant.reflect(&mut renderer).unwrap_err();

    assert!(matches!(err, Error::CompileError { .. }));
    assert_eq!(variant.code(), &ShaderCode::Source(PIXEL_SOURCE.to_string()));
}

#[test]
fn test_reflect_compiled_variant_keeps_bytecode() {
    let mut renderer = mock_renderer::lit_renderer();
    let mut variant = pixel_variant();
    variant.compile(&mut renderer).unwrap();
    let bytes = variant.code().clone();

    variant.reflect(&mut renderer).unwrap();

    assert!(variant.is_compiled());
    assert_eq!(variant.code(), &bytes);
    let (binding, roughness) = variant.constant_variable("roughness").unwrap();
    assert_eq!(binding.name, "PerMaterial");
    assert_eq!(roughness.offset, 16);
    assert!(variant.constant_variable("missing").is_none());
}
