//! Triad demo: draws a vertex-colored triangle and a textured, tinted one.

mod app;
mod resources;
mod scene;
mod shaders;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use triad_engine::device::GlInit;
use triad_engine::logging::{init_logging, LoggingConfig};
use triad_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

use crate::app::{DemoApp, SceneChoice};
use crate::resources::{LoadedImage, ResourceLoadError};

#[derive(Debug, Parser)]
#[command(name = "triad-demo", about = "Draw triangles through the triad GL layer", version)]
struct Args {
    /// Meshes to draw
    #[arg(long, value_enum, default_value_t = SceneChoice::Both)]
    scene: SceneChoice,

    /// Image for the textured mesh; a checkerboard is generated when omitted
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Log filter, env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(match args.log {
        Some(ref filter) => LoggingConfig::with_filter(filter),
        None => LoggingConfig::default(),
    });

    let texture = texture_for(&args)?;

    let config = RuntimeConfig {
        title: "triad demo".to_string(),
        initial_size: LogicalSize::new(args.width as f64, args.height as f64),
        resizable: true,
    };

    Runtime::run(config, GlInit::default(), DemoApp::new(args.scene, texture))
}

/// Decodes the texture only for scenes that sample one.
fn texture_for(args: &Args) -> Result<Option<LoadedImage>, ResourceLoadError> {
    if !args.scene.samples_texture() {
        return Ok(None);
    }
    match &args.texture {
        Some(path) => resources::load_texture_image(path).map(Some),
        None => Ok(Some(resources::checkerboard(256, 32))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_window() {
        let args = Args::try_parse_from(["triad-demo"]).unwrap();
        assert_eq!(args.scene, SceneChoice::Both);
        assert_eq!((args.width, args.height), (800, 600));
        assert!(args.texture.is_none());
    }

    #[test]
    fn scene_and_texture_flags_parse() {
        let args =
            Args::try_parse_from(["triad-demo", "--scene", "textured", "--texture", "crate.png"])
                .unwrap();
        assert_eq!(args.scene, SceneChoice::Textured);
        assert_eq!(args.texture, Some(PathBuf::from("crate.png")));
    }

    #[test]
    fn triangle_scene_never_decodes_the_texture() {
        let args =
            Args::try_parse_from(["triad-demo", "--scene", "triangle", "--texture", "/nonexistent.png"])
                .unwrap();
        assert_eq!(texture_for(&args).unwrap(), None);
    }

    #[test]
    fn textured_scenes_load_or_fall_back() {
        let missing =
            Args::try_parse_from(["triad-demo", "--scene", "both", "--texture", "/nonexistent.png"])
                .unwrap();
        assert!(matches!(
            texture_for(&missing),
            Err(ResourceLoadError::TextureLoadFailed { .. })
        ));

        let fallback = Args::try_parse_from(["triad-demo", "--scene", "textured"]).unwrap();
        let board = texture_for(&fallback).unwrap().unwrap();
        assert_eq!((board.width, board.height), (256, 256));
    }

    #[test]
    fn unknown_scene_is_rejected() {
        assert!(Args::try_parse_from(["triad-demo", "--scene", "cube"]).is_err());
    }
}
