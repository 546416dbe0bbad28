/// Camera state and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::transform::Transform;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Orientation of the orbiting camera.
///
/// Angles are in degrees. A field of view of zero selects an orthographic
/// projection. `zoom` sets the visible half-height at the look-at point to
/// `1 / zoom` world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub azimuth: f32,
    pub elevation: f32,
    pub fov: f32,
    pub zoom: f32,
}

impl CameraState {
    pub fn new(azimuth: f32, elevation: f32, fov: f32, zoom: f32) -> Self {
        Self {
            azimuth: Transform::wrap_degrees(azimuth),
            elevation: elevation.clamp(-90.0, 90.0),
            fov,
            zoom,
        }
    }

    pub fn with_azimuth(self, azimuth: f32) -> Self {
        Self {
            azimuth: Transform::wrap_degrees(azimuth),
            ..self
        }
    }

    pub fn with_elevation(self, elevation: f32) -> Self {
        Self {
            elevation: elevation.clamp(-90.0, 90.0),
            ..self
        }
    }

    /// Orbit by the given deltas, wrapping azimuth and clamping elevation
    pub fn orbit(self, d_azimuth: f32, d_elevation: f32) -> Self {
        self.with_azimuth(self.azimuth + d_azimuth)
            .with_elevation(self.elevation + d_elevation)
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        if self.fov > 0.0 {
            ProjectionMode::Perspective
        } else {
            ProjectionMode::Orthographic
        }
    }

    /// Resolve the orbit into a concrete camera looking at `target`.
    ///
    /// `scene_radius` bounds the geometry around the target and is used to
    /// pick clip planes that enclose it.
    pub fn resolve(&self, target: Point3<f32>, scene_radius: f32, width: u32, height: u32) -> Camera {
        let half_height = 1.0 / self.zoom;
        let radius = scene_radius.max(f32::EPSILON);
        let mode = self.projection_mode();

        let distance = match mode {
            ProjectionMode::Perspective => half_height / (self.fov.to_radians() / 2.0).tan(),
            // Any distance works; stay just outside the geometry.
            ProjectionMode::Orthographic => radius + 1.0,
        };
        // Keep the nearest point of the bounding sphere strictly inside the
        // near plane so rounding cannot clip it.
        let near = match mode {
            ProjectionMode::Perspective => ((distance - radius) * 0.9).max(distance * 1e-3),
            ProjectionMode::Orthographic => 1e-3,
        };
        let far = distance + radius + 1.0;

        let direction = Transform::orbit_direction(self.azimuth, self.elevation);
        Camera {
            position: target + direction * distance,
            target,
            up: Transform::orbit_up(self.azimuth, self.elevation),
            fov: self.fov.to_radians(),
            aspect: width as f32 / height as f32,
            half_height,
            near,
            far,
            mode,
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(0.0, 25.0, 60.0, 0.1)
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    /// Half-height of the orthographic view volume
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.half_height;
                let width = height * self.aspect;
                Matrix4::new_orthographic(-width, width, -height, height, self.near, self.far)
            }
        }
    }

    /// Unit vector from `point` towards the eye
    pub fn view_direction(&self, point: &Point3<f32>) -> Vector3<f32> {
        match self.mode {
            ProjectionMode::Perspective => (self.position - point)
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(|| (self.position - self.target).normalize()),
            ProjectionMode::Orthographic => (self.position - self.target).normalize(),
        }
    }

    /// Build a projector for a raster of the given size
    pub fn projector(&self, width: u32, height: u32) -> Projector {
        Projector {
            matrix: Transform::mvp_matrix(
                &Matrix4::identity(),
                &self.view_matrix(),
                &self.projection_matrix(),
            ),
            width: width as f32,
            height: height as f32,
        }
    }
}

/// World-to-screen mapping for one camera and raster size
#[derive(Debug, Clone)]
pub struct Projector {
    matrix: Matrix4<f32>,
    width: f32,
    height: f32,
}

impl Projector {
    /// Project a world point to screen space.
    ///
    /// Returns `(x, y, depth)` with pixel coordinates growing right and down
    /// and depth in normalized device units (smaller is closer). Points behind
    /// the camera or outside the near/far range yield `None`; points outside
    /// the viewport laterally are still returned.
    pub fn project(&self, point: &Point3<f32>) -> Option<Point3<f32>> {
        let clip = self.matrix * point.to_homogeneous();

        // Prevent division by near-zero or negative w (behind the eye)
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * self.width;
        let screen_y = (1.0 - ndc.y) * 0.5 * self.height;

        Some(Point3::new(screen_x, screen_y, ndc.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wraps_and_clamps() {
        let state = CameraState::new(370.0, 120.0, 60.0, 1.0);
        assert!((state.azimuth - 10.0).abs() < 1e-4);
        assert_eq!(state.elevation, 90.0);

        let orbited = state.orbit(-20.0, -200.0);
        assert!((orbited.azimuth - 350.0).abs() < 1e-4);
        assert_eq!(orbited.elevation, -90.0);
    }

    #[test]
    fn test_projection_mode() {
        assert_eq!(CameraState::default().projection_mode(), ProjectionMode::Perspective);
        let ortho = CameraState::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(ortho.projection_mode(), ProjectionMode::Orthographic);
    }

    #[test]
    fn test_resolve_perspective_distance() {
        let state = CameraState::new(0.0, 0.0, 90.0, 1.0);
        let camera = state.resolve(Point3::origin(), 0.5, 500, 400);
        // tan(45deg) = 1, so the eye sits 1/zoom away
        assert!((camera.position - Point3::new(0.0, -1.0, 0.0)).norm() < 1e-5);
        assert!((camera.aspect - 500.0 / 400.0).abs() < 1e-6);
        assert!(camera.near > 0.0 && camera.near < camera.far);
    }

    #[test]
    fn test_target_projects_to_center() {
        for fov in [60.0, 0.0] {
            let state = CameraState::new(120.0, 25.0, fov, 0.5);
            let target = Point3::new(3.0, -2.0, 1.0);
            let camera = state.resolve(target, 1.0, 200, 100);
            let p = camera.projector(200, 100).project(&target).unwrap();
            assert!((p.x - 100.0).abs() < 1e-3);
            assert!((p.y - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_closer_points_have_smaller_depth() {
        let state = CameraState::new(0.0, 0.0, 60.0, 1.0);
        let camera = state.resolve(Point3::origin(), 1.0, 100, 100);
        let projector = camera.projector(100, 100);
        let near = projector.project(&Point3::new(0.0, -0.5, 0.0)).unwrap();
        let far = projector.project(&Point3::new(0.0, 0.5, 0.0)).unwrap();
        assert!(near.z < far.z);
    }

    #[test]
    fn test_bounding_sphere_is_inside_clip_range() {
        for (fov, zoom) in [(45.0, 0.3), (60.0, 0.5), (30.0, 0.1), (0.0, 1.0)] {
            let state = CameraState::new(0.0, 0.0, fov, zoom);
            let camera = state.resolve(Point3::origin(), 1.0, 64, 64);
            let projector = camera.projector(64, 64);
            let nearest = projector.project(&Point3::new(0.0, -1.0, 0.0)).unwrap();
            let farthest = projector.project(&Point3::new(0.0, 1.0, 0.0)).unwrap();
            assert!(nearest.z > -1.0 && nearest.z < farthest.z, "fov {} zoom {}", fov, zoom);
        }
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let state = CameraState::new(0.0, 0.0, 60.0, 1.0);
        let camera = state.resolve(Point3::origin(), 1.0, 100, 100);
        let behind = camera.position + (camera.position - camera.target);
        assert!(camera.projector(100, 100).project(&behind).is_none());
    }

    #[test]
    fn test_view_matrix() {
        let camera = CameraState::default().resolve(Point3::origin(), 1.0, 800, 600);
        let view = camera.view_matrix();
        assert!(view.norm() > 0.0);
    }
}
