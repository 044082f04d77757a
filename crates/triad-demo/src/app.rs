use anyhow::Context;
use glam::{Vec2, Vec4};
use triad_engine::backend::GlowBackend;
use triad_engine::core::{App, AppControl, FrameCtx};
use triad_engine::device::Gpu;
use triad_engine::paint::Color;

use crate::resources::LoadedImage;
use crate::scene::{DemoMesh, SceneMesh};

pub const CLEAR_COLOR: Color = Color::rgb(0.2, 0.3, 0.3);

/// Which meshes the demo draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SceneChoice {
    /// Vertex-colored triangle
    Triangle,
    /// Textured, tinted triangle
    Textured,
    /// Both, side by side
    #[default]
    Both,
}

pub struct DemoApp {
    scene: SceneChoice,
    texture: Option<LoadedImage>,
    meshes: Vec<DemoMesh<GlowBackend>>,
}

impl SceneChoice {
    pub fn samples_texture(self) -> bool {
        matches!(self, SceneChoice::Textured | SceneChoice::Both)
    }
}

impl DemoApp {
    /// `texture` is required by scenes that sample one; see [`SceneChoice::samples_texture`].
    pub fn new(scene: SceneChoice, texture: Option<LoadedImage>) -> Self {
        Self {
            scene,
            texture,
            meshes: Vec::new(),
        }
    }
}

impl App for DemoApp {
    fn on_start(&mut self, gpu: &Gpu<GlowBackend>) -> anyhow::Result<()> {
        let (colored, textured) = match self.scene {
            SceneChoice::Triangle => (Some(Vec2::ZERO), None),
            SceneChoice::Textured => (None, Some(Vec2::ZERO)),
            SceneChoice::Both => (Some(Vec2::new(-0.5, 0.0)), Some(Vec2::new(0.5, 0.0))),
        };

        if let Some(offset) = colored {
            self.meshes.push(SceneMesh::colored_triangle(offset).build(gpu)?);
        }
        if let Some(offset) = textured {
            // Pixels are on the GPU after this; the CPU copy is not kept.
            let image = self
                .texture
                .take()
                .context("textured scene started without a texture image")?;
            self.meshes
                .push(SceneMesh::textured_triangle(image.as_texture_image(), offset).build(gpu)?);
        }

        for demo in &self.meshes {
            log::info!(
                "{}: {} vertices, {} textures",
                demo.label,
                demo.mesh.geometry().vertex_count,
                demo.mesh.textures().len()
            );
        }
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        ctx.clear(CLEAR_COLOR);

        let tint = tint_at(ctx.time.elapsed);
        for demo in &self.meshes {
            if let Some(handle) = &demo.tint {
                handle.set(tint);
            }
            demo.mesh.render_in_current_context();
        }

        if ctx.time.frame_index > 0 && ctx.time.frame_index % 600 == 0 {
            log::debug!("frame {} (dt {:.4}s)", ctx.time.frame_index, ctx.time.dt);
        }

        AppControl::Continue
    }
}

/// Slow hue cycle kept in `[0.5, 1.0]` per channel so the texture stays visible.
pub fn tint_at(elapsed: f32) -> Vec4 {
    use std::f32::consts::TAU;

    let channel = |phase: f32| 0.75 + 0.25 * (elapsed + phase * TAU).sin();
    Vec4::new(channel(0.0), channel(1.0 / 3.0), channel(2.0 / 3.0), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_stays_in_visible_range() {
        for step in 0..200 {
            let t = tint_at(step as f32 * 0.1);
            for c in [t.x, t.y, t.z] {
                assert!((0.5..=1.0).contains(&c), "channel {c} out of range");
            }
            assert_eq!(t.w, 1.0);
        }
    }

    #[test]
    fn only_triangle_scene_skips_the_texture() {
        assert!(!SceneChoice::Triangle.samples_texture());
        assert!(SceneChoice::Textured.samples_texture());
        assert!(SceneChoice::Both.samples_texture());
    }

    #[test]
    fn tint_changes_over_time() {
        assert_ne!(tint_at(0.0), tint_at(1.0));
    }
}
