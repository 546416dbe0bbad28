/// Orbit geometry: angle conventions and model-view-projection helpers
use nalgebra::{Matrix4, Vector3};

/// World up axis. Shape models are z-up (spin axis along +z).
pub const UP: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Angle and matrix helpers for an orbiting camera
pub struct Transform;

impl Transform {
    /// Wrap an angle in degrees into `[0, 360)`
    pub fn wrap_degrees(degrees: f32) -> f32 {
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= 360.0 {
            0.0
        } else {
            wrapped
        }
    }

    /// Unit vector from the look-at point towards the camera.
    ///
    /// Azimuth rotates counter-clockwise about +z starting from -y;
    /// elevation lifts the camera towards +z.
    pub fn orbit_direction(azimuth_deg: f32, elevation_deg: f32) -> Vector3<f32> {
        let az = azimuth_deg.to_radians();
        let el = elevation_deg.to_radians();
        Vector3::new(el.cos() * az.sin(), -el.cos() * az.cos(), el.sin())
    }

    /// Up vector for a camera looking along `-orbit_direction`.
    ///
    /// Falls back to the horizontal heading when looking straight up or down,
    /// where the world up axis is parallel to the view direction.
    pub fn orbit_up(azimuth_deg: f32, elevation_deg: f32) -> Vector3<f32> {
        let el = elevation_deg.to_radians();
        if el.cos().abs() > 1e-4 {
            return UP;
        }
        let az = azimuth_deg.to_radians();
        let heading = Vector3::new(-az.sin(), az.cos(), 0.0);
        if el > 0.0 {
            heading
        } else {
            -heading
        }
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(Transform::wrap_degrees(0.0), 0.0);
        assert_eq!(Transform::wrap_degrees(359.0), 359.0);
        assert_eq!(Transform::wrap_degrees(360.0), 0.0);
        assert_eq!(Transform::wrap_degrees(725.0), 5.0);
        assert_eq!(Transform::wrap_degrees(-90.0), 270.0);
        let tiny = Transform::wrap_degrees(-1e-9);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_orbit_direction() {
        let front = Transform::orbit_direction(0.0, 0.0);
        assert!((front - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-6);

        let side = Transform::orbit_direction(90.0, 0.0);
        assert!((side - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-6);

        let top = Transform::orbit_direction(45.0, 90.0);
        assert!((top - UP).norm() < 1e-6);
    }

    #[test]
    fn test_orbit_up_is_never_parallel_to_view() {
        for el in [-90.0, -25.0, 0.0, 25.0, 90.0] {
            let dir = Transform::orbit_direction(30.0, el);
            let up = Transform::orbit_up(30.0, el);
            assert!(dir.cross(&up).norm() > 0.1, "degenerate up at elevation {}", el);
        }
    }

    #[test]
    fn test_identity_mvp() {
        let id = Matrix4::identity();
        let mvp = Transform::mvp_matrix(&id, &id, &id);
        assert!((mvp - Matrix4::identity()).norm() < 1e-6);
    }
}
