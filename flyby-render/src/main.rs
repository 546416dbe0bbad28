/// Flyby - render a rotating GIF of a shape model
///
/// Usage:
///   flyby kernels/dsk/PHOBOS_K275_DLR_V02.OBJ -o render/phobos.gif
///   flyby --config flyby.toml --preview
use anyhow::{Context, Result};
use clap::Parser;
use flyby_core::asset::LocalOnly;
use flyby_core::FlybyConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flyby", version, about = "Render a rotating GIF of a shape model")]
struct Args {
    /// Shape model file (`v`/`f` records); overrides [model] in the config
    model: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output GIF path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of one-degree rotation steps
    #[arg(long)]
    steps: Option<u32>,

    /// Seconds per frame
    #[arg(long)]
    duration: Option<f32>,

    /// Frame width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Vertical field of view in degrees (0 = orthographic)
    #[arg(long)]
    fov: Option<f32>,

    /// Camera zoom factor
    #[arg(long)]
    zoom: Option<f32>,

    /// Camera elevation in degrees
    #[arg(long, allow_negative_numbers = true)]
    elevation: Option<f32>,

    /// Show the interactive terminal preview before rendering
    #[arg(long)]
    preview: bool,
}

impl Args {
    fn apply(&self, config: &mut FlybyConfig) {
        if let Some(model) = &self.model {
            config.model.dir = model
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            config.model.filename = model
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        if let Some(output) = &self.output {
            config.animation.output = output.clone();
        }
        if let Some(steps) = self.steps {
            config.animation.steps = steps;
        }
        if let Some(duration) = self.duration {
            config.animation.duration = duration;
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if let Some(fov) = self.fov {
            config.camera.fov = fov;
        }
        if let Some(zoom) = self.zoom {
            config.camera.zoom = zoom;
        }
        if let Some(elevation) = self.elevation {
            config.camera.elevation = elevation;
        }
        if self.preview {
            config.preview.enabled = true;
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FlybyConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FlybyConfig::default(),
    };
    args.apply(&mut config);

    if config.model.filename.is_empty() {
        anyhow::bail!("No shape model given (pass a path or set [model] filename)");
    }
    config.validate().context("Invalid settings")?;

    let output = flyby_render::render_model(&config, &LocalOnly)
        .with_context(|| format!("Failed to render {}", config.model_path().display()))?;

    tracing::info!("Done: {}", output.display());
    Ok(())
}
