//! End-to-end lifecycle tests on the headless device
//!
//! Drives the resource manager and frame renderer through the full
//! initialize/render/resize/teardown cycle and asserts the device state
//! recorded at each step.

use crate::core::config::{RendererConfig, ShaderConfig, ShaderFailurePolicy};
use crate::render::api::{BufferTarget, ClearFlags, RenderDevice};
use crate::render::backends::{FrameOp, HeadlessDevice, ObjectKind, VertexAttribute};
use crate::render::frame::FrameRenderer;
use crate::render::geometry::Mesh;
use crate::render::resources::{LifecycleState, ResourceManager};
use crate::render::shader::ShaderStageSources;
use crate::render::RenderError;

const VERT: &str = "#version 330 core\n\
    layout (location = 0) in vec3 aPosition;\n\
    void main() { gl_Position = vec4(aPosition, 1.0); }\n";
const FRAG: &str = "#version 330 core\n\
    out vec4 FragColor;\n\
    void main() { FragColor = vec4(1.0, 0.5, 0.2, 1.0); }\n";

fn sources() -> ShaderStageSources {
    ShaderStageSources::from_strings(VERT, FRAG)
}

fn initialized() -> (HeadlessDevice, ResourceManager) {
    let mut device = HeadlessDevice::new();
    let mut resources = ResourceManager::new();
    resources
        .initialize_with_sources(
            &mut device,
            &Mesh::quad(),
            &sources(),
            ShaderFailurePolicy::Lenient,
        )
        .unwrap();
    (device, resources)
}

fn kind_counts(log: &[(ObjectKind, u64)]) -> (usize, usize, usize, usize) {
    let count = |kind| log.iter().filter(|(k, _)| *k == kind).count();
    (
        count(ObjectKind::Buffer),
        count(ObjectKind::VertexArray),
        count(ObjectKind::Shader),
        count(ObjectKind::Program),
    )
}

#[test]
fn test_initialize_creates_one_of_each_resource() {
    let (device, resources) = initialized();

    let (buffers, arrays, shaders, programs) = kind_counts(device.creation_log());
    assert_eq!(buffers, 2, "vertex and index buffer");
    assert_eq!(arrays, 1);
    assert_eq!(shaders, 2, "vertex and fragment stage");
    assert_eq!(programs, 1);
    assert_eq!(device.live_object_count(), 6);

    let program = resources.program().unwrap();
    assert!(device.program_link_status(program));
    assert_eq!(device.active_program(), Some(program));
}

#[test]
fn test_quad_upload_layout_and_sizes() {
    let (device, resources) = initialized();

    let vertex_buffer = resources.vertex_buffer().unwrap();
    let index_buffer = resources.index_buffer().unwrap();
    let vertex_array = resources.vertex_array().unwrap();

    // 4 vertices of 3 floats, 6 u32 indices
    assert_eq!(device.buffer_len(vertex_buffer), Some(48));
    assert_eq!(device.buffer_len(index_buffer), Some(24));

    assert_eq!(
        device.attribute(vertex_array, 0),
        Some(VertexAttribute {
            components: 3,
            stride: 12,
            offset: 0,
            buffer: Some(vertex_buffer),
        })
    );
    assert!(device.attribute_enabled(vertex_array, 0));
    assert_eq!(device.captured_index_buffer(vertex_array), Some(index_buffer));
}

#[test]
fn test_frame_sequence_is_clear_then_draw() {
    let (mut device, mut resources) = initialized();
    let renderer = FrameRenderer::new(&RendererConfig::default());

    renderer.render_frame(&mut device, &mut resources).unwrap();

    let frames = device.presented_frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(
        frames[0].ops,
        vec![
            FrameOp::Clear {
                color: [0.2, 0.3, 0.3, 1.0],
                flags: ClearFlags::COLOR,
            },
            FrameOp::Draw {
                program: resources.program(),
                vertex_array: resources.vertex_array(),
                index_count: 6,
                offset: 0,
            },
        ]
    );
}

#[test]
fn test_rendering_many_frames_is_stable() {
    let (mut device, mut resources) = initialized();
    let renderer = FrameRenderer::new(&RendererConfig::default());

    for _ in 0..5 {
        renderer.render_frame(&mut device, &mut resources).unwrap();
    }

    let frames = device.presented_frames();
    assert_eq!(frames.len(), 5);
    for frame in &frames[1..] {
        assert_eq!(frame.ops, frames[0].ops);
    }
    assert_eq!(device.live_object_count(), 6, "no per-frame allocations");
}

#[test]
fn test_resize_sets_full_framebuffer_viewport() {
    let (mut device, mut resources) = initialized();
    let renderer = FrameRenderer::new(&RendererConfig::default());

    for (width, height) in [(600, 600), (1, 1), (1920, 1080), (800, 600)] {
        renderer.on_resize(&mut device, width, height);
        assert_eq!(device.viewport(), (0, 0, width, height));
    }

    // Resize changes nothing but the viewport
    renderer.render_frame(&mut device, &mut resources).unwrap();
    renderer.on_resize(&mut device, 320, 240);
    renderer.render_frame(&mut device, &mut resources).unwrap();
    let frames = device.presented_frames();
    assert_eq!(frames[0].ops, frames[1].ops);
    assert_eq!(frames[1].viewport, (0, 0, 320, 240));
}

#[test]
fn test_teardown_deletes_in_reverse_creation_order() {
    let (mut device, mut resources) = initialized();
    resources.teardown(&mut device);

    let mut expected: Vec<_> = device.creation_log().to_vec();
    expected.reverse();
    assert_eq!(device.deletion_log(), expected.as_slice());
    assert_eq!(device.live_object_count(), 0);
}

#[test]
fn test_teardown_leaves_no_bindings() {
    let (mut device, mut resources) = initialized();
    resources.teardown(&mut device);

    assert_eq!(device.bound_vertex_array(), None);
    assert_eq!(device.bound_buffer(BufferTarget::Vertex), None);
    assert_eq!(device.bound_buffer(BufferTarget::Index), None);
    assert_eq!(device.active_program(), None);
}

#[test]
fn test_missing_shader_file_allocates_nothing() {
    let mut device = HeadlessDevice::new();
    let mut resources = ResourceManager::new();
    let config = ShaderConfig::new("missing/quad.vert", "missing/quad.frag");

    let err = resources.initialize(
        &mut device,
        &Mesh::quad(),
        &config,
        ShaderFailurePolicy::Lenient,
    );

    assert!(matches!(err, Err(RenderError::ShaderFile { .. })));
    assert!(device.creation_log().is_empty(), "no GPU object was created");
    assert_eq!(device.live_object_count(), 0);
    assert_eq!(resources.state(), LifecycleState::Uninitialized);
}

#[test]
fn test_lenient_policy_draws_with_broken_program() {
    let mut device = HeadlessDevice::new();
    let mut resources = ResourceManager::new();
    let broken = ShaderStageSources::from_strings(VERT, "#error not finished\n");

    resources
        .initialize_with_sources(
            &mut device,
            &Mesh::quad(),
            &broken,
            ShaderFailurePolicy::Lenient,
        )
        .unwrap();

    let program = resources.program().unwrap();
    assert!(!device.program_link_status(program));

    // Rendering proceeds; the output is degraded, not absent
    let renderer = FrameRenderer::new(&RendererConfig::default());
    renderer.render_frame(&mut device, &mut resources).unwrap();
    assert!(matches!(
        device.presented_frames()[0].ops[1],
        FrameOp::Draw { index_count: 6, .. }
    ));
}

#[test]
fn test_strict_failure_rolls_back_in_reverse_order() {
    let mut device = HeadlessDevice::new();
    let mut resources = ResourceManager::new();
    let broken = ShaderStageSources::from_strings(VERT, "#error not finished\n");

    let err = resources.initialize_with_sources(
        &mut device,
        &Mesh::quad(),
        &broken,
        ShaderFailurePolicy::Strict,
    );

    assert!(matches!(err, Err(RenderError::ShaderCompile { .. })));
    assert_eq!(resources.state(), LifecycleState::Uninitialized);
    assert_eq!(device.live_object_count(), 0);

    // Partial rollback follows the same reverse-of-creation rule
    let mut expected: Vec<_> = device.creation_log().to_vec();
    expected.reverse();
    assert_eq!(device.deletion_log(), expected.as_slice());
}

#[test]
fn test_lifecycle_state_transitions() {
    let mut device = HeadlessDevice::new();
    let mut resources = ResourceManager::new();
    let renderer = FrameRenderer::new(&RendererConfig::default());
    assert_eq!(resources.state(), LifecycleState::Uninitialized);

    resources
        .initialize_with_sources(
            &mut device,
            &Mesh::quad(),
            &sources(),
            ShaderFailurePolicy::Lenient,
        )
        .unwrap();
    assert_eq!(resources.state(), LifecycleState::Initialized);

    renderer.render_frame(&mut device, &mut resources).unwrap();
    assert_eq!(resources.state(), LifecycleState::Rendering);

    resources.teardown(&mut device);
    assert_eq!(resources.state(), LifecycleState::TornDown);

    let err = renderer.render_frame(&mut device, &mut resources);
    assert!(matches!(err, Err(RenderError::NotInitialized)));

    // Teardown stays single-shot
    resources.teardown(&mut device);
    assert_eq!(device.deletion_log().len(), device.creation_log().len());
}
