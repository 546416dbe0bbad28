/// End-to-end run: acquire, load, preview, animate, encode
use flyby_core::asset::{ensure_local, Fetcher};
use flyby_core::{load_mesh, FlybyConfig, Mesh, Result};
use std::path::PathBuf;

use crate::animation::AnimationDriver;
use crate::context::{RenderContext, RenderSettings};
use crate::encoder::encode_gif;
use crate::preview::TerminalPreview;

/// Render the configured model into a rotating GIF.
///
/// Returns the path of the written animation. Any failure aborts the run
/// and leaves no output file.
pub fn render_model(config: &FlybyConfig, fetcher: &dyn Fetcher) -> Result<PathBuf> {
    config.validate()?;

    let path = ensure_local(
        &config.model.dir,
        &config.model.filename,
        config.model.url.as_deref(),
        fetcher,
    )?;
    let mesh = load_mesh(&path)?;

    if config.preview.enabled {
        preview(&mesh, config)?;
    }

    create_animation(&mesh, config)?;
    Ok(config.animation.output.clone())
}

/// Show the interactive terminal preview
pub fn preview(mesh: &Mesh, config: &FlybyConfig) -> Result<()> {
    let mut preview = TerminalPreview::new(
        mesh,
        config.preview_camera(),
        config.light(),
        RenderSettings::from_config(config),
    )?;
    preview.run()
}

/// Sweep the camera around `mesh` and write the configured GIF
pub fn create_animation(mesh: &Mesh, config: &FlybyConfig) -> Result<()> {
    config.validate()?;
    let animation = &config.animation;

    let frames = RenderContext::scoped(RenderSettings::from_config(config), |context| {
        AnimationDriver::new(mesh, config.sweep_camera(), config.light(), animation.steps)?
            .run(context)
    })?;

    encode_gif(&frames, animation.duration, &animation.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flyby_core::asset::LocalOnly;
    use flyby_core::{write_mesh, FlybyError};

    fn small_config(dir: &std::path::Path) -> FlybyConfig {
        let mut config = FlybyConfig::default();
        config.model.dir = dir.to_path_buf();
        config.model.filename = "tetra.obj".into();
        config.animation.steps = 6;
        config.animation.output = dir.join("tetra.gif");
        config.render.width = 32;
        config.render.height = 24;
        config.camera.zoom = 0.5;
        config
    }

    #[test]
    fn test_render_model_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tetra.obj"), write_mesh(&Mesh::tetrahedron(1.0))).unwrap();
        let config = small_config(dir.path());

        let output = render_model(&config, &LocalOnly).unwrap();
        assert_eq!(output, dir.path().join("tetra.gif"));

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = options
            .read_info(std::fs::File::open(&output).unwrap())
            .unwrap();
        let mut count = 0;
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            assert_eq!(frame.delay, 4);
            count += 1;
        }
        assert_eq!(count, 6);
        assert_eq!((decoder.width(), decoder.height()), (32, 24));
    }

    #[test]
    fn test_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let err = render_model(&config, &LocalOnly).unwrap_err();
        assert!(matches!(err, FlybyError::NotFound(_)));
        assert!(!config.animation.output.exists());
    }

    #[test]
    fn test_empty_mesh_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tetra.obj"), "# nothing here\n").unwrap();
        let config = small_config(dir.path());

        let err = render_model(&config, &LocalOnly).unwrap_err();
        assert!(matches!(err, FlybyError::InvalidMesh(_)));
        assert!(!config.animation.output.exists());
    }

    #[test]
    fn test_invalid_config_rejected_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.animation.steps = 0;
        assert!(matches!(
            create_animation(&Mesh::tetrahedron(1.0), &config),
            Err(FlybyError::Config(_))
        ));
    }
}
