/// Azimuth sweep: one rendered frame per degree of rotation
use flyby_core::{CameraState, FlybyError, Frame, LightConfig, Mesh, Result};

use crate::context::RenderContext;

/// Default number of frames in a full turn
pub const DEFAULT_STEPS: u32 = 360;

/// Azimuth advance per frame, in degrees
pub const DEGREES_PER_STEP: f32 = 1.0;

/// Progress of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    /// The next step to render
    Rendering(u32),
    Done,
}

/// Drives the camera around the model and collects frames in step order
pub struct AnimationDriver<'a> {
    mesh: &'a Mesh,
    camera: CameraState,
    light: LightConfig,
    steps: u32,
    state: DriverState,
}

impl<'a> AnimationDriver<'a> {
    /// `camera` supplies elevation, field of view and zoom; its azimuth is
    /// replaced at every step.
    pub fn new(mesh: &'a Mesh, camera: CameraState, light: LightConfig, steps: u32) -> Result<Self> {
        if steps == 0 {
            return Err(FlybyError::Config("animation needs at least one step".into()));
        }
        Ok(Self {
            mesh,
            camera,
            light,
            steps,
            state: DriverState::Idle,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Camera for a given step
    pub fn camera_at(&self, step: u32) -> CameraState {
        self.camera.with_azimuth(step as f32 * DEGREES_PER_STEP)
    }

    /// Every camera of the sweep, in order
    pub fn sweep(&self) -> impl Iterator<Item = CameraState> + '_ {
        (0..self.steps).map(move |step| self.camera_at(step))
    }

    /// Render the next step. Returns `None` once the sweep is done.
    ///
    /// A render failure ends the sweep.
    pub fn advance(&mut self, context: &mut RenderContext) -> Result<Option<Frame>> {
        let step = match self.state {
            DriverState::Idle => 0,
            DriverState::Rendering(step) => step,
            DriverState::Done => return Ok(None),
        };
        self.state = DriverState::Rendering(step);

        let camera = self.camera_at(step);
        tracing::debug!("Rendering step {} (azimuth {:.1})", step, camera.azimuth);
        let frame = match context.render(self.mesh, &camera, &self.light) {
            Ok(frame) => frame,
            Err(e) => {
                self.state = DriverState::Done;
                return Err(e);
            }
        };

        self.state = if step + 1 < self.steps {
            DriverState::Rendering(step + 1)
        } else {
            DriverState::Done
        };
        Ok(Some(frame))
    }

    /// Render the whole sweep.
    ///
    /// Frames are only returned if every step succeeds.
    pub fn run(mut self, context: &mut RenderContext) -> Result<Vec<Frame>> {
        tracing::info!(
            "Rendering {} frames at {}x{}",
            self.steps,
            context.width(),
            context.height()
        );

        let report_every = (self.steps / 10).max(1) as usize;
        let mut frames = Vec::with_capacity(self.steps as usize);
        while let Some(frame) = self.advance(context)? {
            frames.push(frame);
            if frames.len() % report_every == 0 {
                tracing::info!("Rendered {}/{} frames", frames.len(), self.steps);
            }
        }

        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderSettings;

    fn setup() -> (Mesh, CameraState, LightConfig) {
        (
            Mesh::tetrahedron(1.0),
            CameraState::new(0.0, 25.0, 60.0, 0.5),
            LightConfig::default(),
        )
    }

    #[test]
    fn test_zero_steps_rejected() {
        let (mesh, camera, light) = setup();
        assert!(matches!(
            AnimationDriver::new(&mesh, camera, light, 0),
            Err(FlybyError::Config(_))
        ));
    }

    #[test]
    fn test_sweep_azimuths() {
        let (mesh, camera, light) = setup();
        let driver = AnimationDriver::new(&mesh, camera, light, 5).unwrap();
        let azimuths: Vec<f32> = driver.sweep().map(|c| c.azimuth).collect();
        assert_eq!(azimuths, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(driver.sweep().all(|c| c.elevation == 25.0 && c.zoom == 0.5));

        let full = AnimationDriver::new(&mesh, camera, light, DEFAULT_STEPS).unwrap();
        let last = full.sweep().last().unwrap();
        assert_eq!(last.azimuth, 359.0);
    }

    #[test]
    fn test_state_machine() {
        let (mesh, camera, light) = setup();
        let mut ctx = RenderContext::acquire(RenderSettings::new(8, 8)).unwrap();
        let mut driver = AnimationDriver::new(&mesh, camera, light, 2).unwrap();

        assert_eq!(driver.state(), DriverState::Idle);
        assert!(driver.advance(&mut ctx).unwrap().is_some());
        assert_eq!(driver.state(), DriverState::Rendering(1));
        assert!(driver.advance(&mut ctx).unwrap().is_some());
        assert_eq!(driver.state(), DriverState::Done);
        assert!(driver.advance(&mut ctx).unwrap().is_none());
    }

    #[test]
    fn test_frames_in_step_order() {
        let (mesh, camera, light) = setup();
        let mut ctx = RenderContext::acquire(RenderSettings::new(24, 16)).unwrap();

        let driver = AnimationDriver::new(&mesh, camera, light, 12).unwrap();
        let expected: Vec<Frame> = driver
            .sweep()
            .map(|c| ctx.render(&mesh, &c, &light).unwrap())
            .collect();
        let frames = driver.run(&mut ctx).unwrap();

        assert_eq!(frames.len(), 12);
        assert_eq!(frames, expected);
    }

    #[test]
    fn test_render_error_aborts() {
        let mesh = Mesh::default();
        let (_, camera, light) = setup();
        let mut ctx = RenderContext::acquire(RenderSettings::new(8, 8)).unwrap();

        let mut driver = AnimationDriver::new(&mesh, camera, light, 3).unwrap();
        assert!(matches!(driver.advance(&mut ctx), Err(FlybyError::InvalidMesh(_))));
        assert_eq!(driver.state(), DriverState::Done);

        let driver = AnimationDriver::new(&mesh, camera, light, 3).unwrap();
        assert!(matches!(driver.run(&mut ctx), Err(FlybyError::InvalidMesh(_))));
    }
}
