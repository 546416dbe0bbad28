/// Single-light shading model
use nalgebra::{Point3, Vector3};

/// The one light in the scene.
///
/// `position` is homogeneous: `w == 0` is a directional light shining from
/// the direction `(x, y, z)`, anything else is a point light at
/// `(x, y, z) / w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 4],
    pub enabled: bool,
}

impl LightConfig {
    pub fn new(position: [f32; 4], enabled: bool) -> Self {
        Self { position, enabled }
    }

    pub fn is_directional(&self) -> bool {
        self.position[3] == 0.0
    }

    /// Unit vector from `point` towards the light, `None` when disabled or
    /// when the point coincides with a point light
    pub fn direction_from(&self, point: &Point3<f32>) -> Option<Vector3<f32>> {
        if !self.enabled {
            return None;
        }
        let [x, y, z, w] = self.position;
        let v = if self.is_directional() {
            Vector3::new(x, y, z)
        } else {
            Point3::new(x / w, y / w, z / w) - point
        };
        v.try_normalize(f32::EPSILON)
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::new([5.0, 5.0, 5.0, 0.0], true)
    }
}

/// Surface reflectance coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl Material {
    /// Reflected intensity at a surface point, before multiplying by colour
    pub fn intensity(
        &self,
        normal: &Vector3<f32>,
        to_light: Option<Vector3<f32>>,
        to_eye: &Vector3<f32>,
    ) -> f32 {
        let mut intensity = self.ambient;
        if let Some(l) = to_light {
            let n_dot_l = normal.dot(&l);
            if n_dot_l > 0.0 {
                intensity += self.diffuse * n_dot_l;
                if self.specular > 0.0 {
                    let reflected = normal * (2.0 * n_dot_l) - l;
                    let r_dot_v = reflected.dot(to_eye).max(0.0);
                    intensity += self.specular * r_dot_v.powf(self.shininess);
                }
            }
        }
        intensity
    }

    /// Shaded RGB in the unit interval
    pub fn shade(
        &self,
        normal: &Vector3<f32>,
        to_light: Option<Vector3<f32>>,
        to_eye: &Vector3<f32>,
    ) -> [f32; 3] {
        let i = self.intensity(normal, to_light, to_eye);
        self.color.map(|c| (c * i).clamp(0.0, 1.0))
    }
}

impl Default for Material {
    /// Matte, diffuse-dominant rock
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            ambient: 0.05,
            diffuse: 0.9,
            specular: 0.0,
            shininess: 50.0,
        }
    }
}
