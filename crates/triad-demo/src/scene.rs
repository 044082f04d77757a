//! Scene meshes: one parameterized builder for every demo mesh.

use anyhow::{Context, Result};
use glam::{Vec2, Vec4};
use triad_engine::backend::GlBackend;
use triad_engine::device::Gpu;
use triad_engine::render::{
    AttributeDescriptor, ComponentCount, GeometryDescription, Mesh, TextureImage, Uniform,
    UsageHint,
};

use crate::shaders;

const VEC2: AttributeDescriptor = AttributeDescriptor::float(ComponentCount::Vec2);
const VEC3: AttributeDescriptor = AttributeDescriptor::float(ComponentCount::Vec3);

/// position (vec3) + color (vec3)
const COLOR_LAYOUT: [AttributeDescriptor; 2] = [VEC3, VEC3];
/// position (vec3) + uv (vec2)
const TEXTURED_LAYOUT: [AttributeDescriptor; 2] = [VEC3, VEC2];

#[rustfmt::skip]
const COLOR_TRIANGLE: [f32; 18] = [
    // position         color
     0.5, -0.5, 0.0,    1.0, 0.0, 0.0,
    -0.5, -0.5, 0.0,    0.0, 1.0, 0.0,
     0.0,  0.5, 0.0,    0.0, 0.0, 1.0,
];

#[rustfmt::skip]
const TEXTURED_TRIANGLE: [f32; 15] = [
    // position         uv
     0.5, -0.5, 0.0,    1.0, 0.0,
    -0.5, -0.5, 0.0,    0.0, 0.0,
     0.0,  0.5, 0.0,    0.5, 1.0,
];

/// Everything needed to build one mesh.
///
/// A mesh with a texture uses the textured shader contract: the texture is
/// sampled through `u_texture` on unit 0 and multiplied by `u_tint`.
#[derive(Debug, Clone, Copy)]
pub struct SceneMesh<'a> {
    pub label: &'static str,
    pub vertices: &'a [f32],
    pub layout: &'a [AttributeDescriptor],
    pub vertex_shader: &'static str,
    pub fragment_shader: &'static str,
    pub texture: Option<TextureImage<'a>>,
    pub offset: Vec2,
}

/// A built mesh plus the uniforms the app drives per frame.
pub struct DemoMesh<B: GlBackend> {
    pub label: &'static str,
    pub mesh: Mesh<B>,
    pub tint: Option<Uniform<Vec4>>,
}

impl SceneMesh<'static> {
    pub fn colored_triangle(offset: Vec2) -> Self {
        Self {
            label: "colored triangle",
            vertices: &COLOR_TRIANGLE,
            layout: &COLOR_LAYOUT,
            vertex_shader: shaders::COLOR_VERTEX,
            fragment_shader: shaders::COLOR_FRAGMENT,
            texture: None,
            offset,
        }
    }
}

impl<'a> SceneMesh<'a> {
    pub fn textured_triangle(texture: TextureImage<'a>, offset: Vec2) -> Self {
        Self {
            label: "textured triangle",
            vertices: &TEXTURED_TRIANGLE,
            layout: &TEXTURED_LAYOUT,
            vertex_shader: shaders::TEXTURED_VERTEX,
            fragment_shader: shaders::TEXTURED_FRAGMENT,
            texture: Some(texture),
            offset,
        }
    }

    pub fn build<B: GlBackend>(&self, gpu: &Gpu<B>) -> Result<DemoMesh<B>> {
        let label = self.label;

        let mut program = gpu
            .create_program(self.vertex_shader, self.fragment_shader)
            .with_context(|| format!("{label}: shader program"))?;
        program
            .bind_vec2f("u_offset")
            .with_context(|| format!("{label}: offset uniform"))?
            .set(self.offset);

        let mut vertex_buffer = gpu
            .create_vertex_buffer()
            .with_context(|| format!("{label}: vertex buffer"))?;
        vertex_buffer
            .upload_slice(self.vertices, self.layout, UsageHint::StaticDraw)
            .with_context(|| format!("{label}: vertex upload"))?;
        let geometry = GeometryDescription::triangles(vertex_buffer.vertex_count());

        let mut textures = Vec::new();
        let mut tint = None;
        if let Some(image) = &self.texture {
            textures.push(
                gpu.create_texture_2d(image)
                    .with_context(|| format!("{label}: texture"))?,
            );
            program
                .bind_vec1i("u_texture")
                .with_context(|| format!("{label}: sampler uniform"))?
                .set(0);
            let handle = program
                .bind_vec4f("u_tint")
                .with_context(|| format!("{label}: tint uniform"))?;
            handle.set(Vec4::ONE);
            tint = Some(handle);
        }

        Ok(DemoMesh {
            label,
            mesh: Mesh::new(program, vertex_buffer, textures, geometry),
            tint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triad_engine::backend::{GlCall, RecordingBackend, ShaderStage};
    use triad_engine::render::{ColorFormat, UniformKind, UniformValue};

    fn gpu() -> Gpu<RecordingBackend> {
        Gpu::new(RecordingBackend::new().with_uniforms(["u_offset", "u_texture", "u_tint"]))
    }

    #[test]
    fn colored_triangle_has_three_vertices_and_no_texture() {
        let gpu = gpu();
        let built = SceneMesh::colored_triangle(Vec2::ZERO).build(&gpu).unwrap();

        assert_eq!(built.mesh.geometry(), GeometryDescription::triangles(3));
        assert!(built.mesh.textures().is_empty());
        assert!(built.tint.is_none());
        assert_eq!(
            built.mesh.vertex_buffer().layout().map(|l| l.stride()),
            Some(24)
        );
    }

    #[test]
    fn textured_triangle_samples_unit_zero_with_white_tint() {
        let gpu = gpu();
        let pixels = [255u8; 2 * 2 * 3];
        let image = TextureImage::new(2, 2, ColorFormat::Rgb, &pixels);
        let built = SceneMesh::textured_triangle(image, Vec2::new(0.5, 0.0))
            .build(&gpu)
            .unwrap();

        let program = built.mesh.program();
        assert_eq!(program.bound_kind("u_texture"), Some(UniformKind::Vec1i));
        assert_eq!(program.bound_kind("u_tint"), Some(UniformKind::Vec4f));
        assert_eq!(built.mesh.textures().len(), 1);
        assert_eq!(
            built.mesh.vertex_buffer().layout().map(|l| l.stride()),
            Some(20)
        );

        gpu.backend().take_calls();
        built.mesh.render_in_current_context();
        let pushed: Vec<_> = gpu
            .backend()
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GlCall::PushUniform { value, .. } => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(
            pushed,
            vec![
                UniformValue::Vec2f(Vec2::new(0.5, 0.0)),
                UniformValue::Vec1i(0),
                UniformValue::Vec4f(Vec4::ONE),
            ]
        );
    }

    #[test]
    fn shader_failure_names_the_mesh() {
        let gpu = Gpu::new(RecordingBackend::new().failing_compile(ShaderStage::Vertex, "bad"));
        let err = SceneMesh::colored_triangle(Vec2::ZERO)
            .build(&gpu)
            .err()
            .unwrap();
        assert_eq!(format!("{err}"), "colored triangle: shader program");
        assert_eq!(
            format!("{:#}", err),
            "colored triangle: shader program: vertex shader compile failed: bad"
        );
    }
}
