/// Run configuration (TOML); every field has a default
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::camera::CameraState;
use crate::error::{FlybyError, Result};
use crate::lighting::{LightConfig, Material};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlybyConfig {
    /// Where the shape model lives
    #[serde(default)]
    pub model: ModelConfig,
    /// Sweep and output settings
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Camera projection settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Viewport and material settings
    #[serde(default)]
    pub render: RenderConfig,
    /// The scene light
    #[serde(default)]
    pub light: LightSection,
    /// Interactive terminal preview
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Local directory holding the model (default: ".")
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
    /// File name inside `dir`
    #[serde(default)]
    pub filename: String,
    /// Remote location to fetch from when the file is missing
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Number of one-degree steps (default: 360)
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Seconds each frame is shown (default: 0.04)
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Output GIF path (default: "render.gif")
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees; 0 is orthographic (default: 60)
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// Zoom factor (default: 0.1)
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    /// Elevation held during the sweep (default: 25)
    #[serde(default = "default_elevation")]
    pub elevation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Frame width in pixels (default: 500)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Frame height in pixels (default: 400)
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_ambient")]
    pub ambient: f32,
    #[serde(default = "default_diffuse")]
    pub diffuse: f32,
    #[serde(default)]
    pub specular: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    /// Surface colour, unit-interval RGB
    #[serde(default = "default_color")]
    pub color: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSection {
    /// Homogeneous position; w = 0 is directional (default: [5, 5, 5, 0])
    #[serde(default = "default_light_position")]
    pub position: [f32; 4],
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Show the terminal preview before animating (default: false)
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_preview_azimuth")]
    pub azimuth: f32,
    #[serde(default = "default_elevation")]
    pub elevation: f32,
}

impl FlybyConfig {
    /// Load a configuration file.
    ///
    /// The result is not validated, so callers can layer overrides on top
    /// before calling [`FlybyConfig::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FlybyError::NotFound(path.to_path_buf()),
            _ => FlybyError::Io(e),
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FlybyError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.animation;
        if a.steps == 0 {
            return Err(FlybyError::Config("animation.steps must be positive".into()));
        }
        if !(a.duration > 0.0) {
            return Err(FlybyError::Config("animation.duration must be positive".into()));
        }

        let r = &self.render;
        let max = u32::from(u16::MAX);
        if r.width == 0 || r.height == 0 || r.width > max || r.height > max {
            return Err(FlybyError::Config(format!(
                "render size {}x{} must be within 1..={} in both dimensions",
                r.width, r.height, max
            )));
        }

        let c = &self.camera;
        if !(c.zoom > 0.0) {
            return Err(FlybyError::Config("camera.zoom must be positive".into()));
        }
        if !(0.0..180.0).contains(&c.fov) {
            return Err(FlybyError::Config("camera.fov must be in [0, 180)".into()));
        }
        Ok(())
    }

    /// Path of the model file
    pub fn model_path(&self) -> PathBuf {
        self.model.dir.join(&self.model.filename)
    }

    /// Camera used for the sweep, starting at azimuth 0
    pub fn sweep_camera(&self) -> CameraState {
        CameraState::new(0.0, self.camera.elevation, self.camera.fov, self.camera.zoom)
    }

    /// Camera the preview opens with
    pub fn preview_camera(&self) -> CameraState {
        CameraState::new(
            self.preview.azimuth,
            self.preview.elevation,
            self.camera.fov,
            self.camera.zoom,
        )
    }

    pub fn light(&self) -> LightConfig {
        LightConfig::new(self.light.position, self.light.enabled)
    }

    pub fn material(&self) -> Material {
        Material {
            color: self.render.color,
            ambient: self.render.ambient,
            diffuse: self.render.diffuse,
            specular: self.render.specular,
            shininess: self.render.shininess,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_model_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_steps() -> u32 {
    360
}

fn default_duration() -> f32 {
    0.04
}

fn default_output() -> PathBuf {
    PathBuf::from("render.gif")
}

fn default_fov() -> f32 {
    60.0
}

fn default_zoom() -> f32 {
    0.1
}

fn default_elevation() -> f32 {
    25.0
}

fn default_width() -> u32 {
    500
}

fn default_height() -> u32 {
    400
}

fn default_ambient() -> f32 {
    Material::default().ambient
}

fn default_diffuse() -> f32 {
    Material::default().diffuse
}

fn default_shininess() -> f32 {
    Material::default().shininess
}

fn default_color() -> [f32; 3] {
    Material::default().color
}

fn default_light_position() -> [f32; 4] {
    LightConfig::default().position
}

fn default_preview_azimuth() -> f32 {
    120.0
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            filename: String::new(),
            url: None,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            duration: default_duration(),
            output: default_output(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            zoom: default_zoom(),
            elevation: default_elevation(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        let material = Material::default();
        Self {
            width: default_width(),
            height: default_height(),
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: material.specular,
            shininess: material.shininess,
            color: material.color,
        }
    }
}

impl Default for LightSection {
    fn default() -> Self {
        Self {
            position: default_light_position(),
            enabled: true,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            azimuth: default_preview_azimuth(),
            elevation: default_elevation(),
        }
    }
}
