/// Off-screen render target, acquired once per run
use flyby_core::{FlybyConfig, FlybyError, Frame, Material, Result};

/// Immutable settings of a render context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub material: Material,
    pub background: [f32; 3],
}

impl RenderSettings {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            material: Material::default(),
            background: [0.0, 0.0, 0.0],
        }
    }

    pub fn from_config(config: &FlybyConfig) -> Self {
        Self {
            material: config.material(),
            ..Self::new(config.render.width, config.render.height)
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new(500, 400)
    }
}

/// Colour and depth buffers for one viewport.
///
/// The buffers are scratch space: every `render` call starts from a cleared
/// state, so nothing drawn by one call is visible to the next.
pub struct RenderContext {
    pub(crate) settings: RenderSettings,
    pub(crate) color: Frame,
    pub(crate) depth: Vec<f32>,
}

impl RenderContext {
    pub fn acquire(settings: RenderSettings) -> Result<Self> {
        if settings.width == 0 || settings.height == 0 {
            return Err(FlybyError::Config(format!(
                "viewport {}x{} has no pixels",
                settings.width, settings.height
            )));
        }

        tracing::debug!(
            "Acquired {}x{} render context",
            settings.width,
            settings.height
        );
        let pixels = settings.width as usize * settings.height as usize;
        Ok(Self {
            color: Frame::filled(settings.width, settings.height, settings.background),
            depth: vec![f32::INFINITY; pixels],
            settings,
        })
    }

    /// Run `f` with a fresh context that is released when `f` returns,
    /// whether it succeeds, fails or panics
    pub fn scoped<T, F>(settings: RenderSettings, f: F) -> Result<T>
    where
        F: FnOnce(&mut RenderContext) -> Result<T>,
    {
        let mut context = Self::acquire(settings)?;
        f(&mut context)
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn width(&self) -> u32 {
        self.settings.width
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    pub(crate) fn clear(&mut self) {
        let background = self.settings.background;
        for chunk in self.color.samples_mut().chunks_exact_mut(Frame::CHANNELS) {
            chunk.copy_from_slice(&background);
        }
        self.depth.fill(f32::INFINITY);
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        tracing::debug!(
            "Released {}x{} render context",
            self.settings.width,
            self.settings.height
        );
    }
}
