/// Software rasterizer: mesh + camera + light in, one frame out
use flyby_core::{CameraState, FlybyError, Frame, LightConfig, Mesh, Result};
use nalgebra::Point3;

use crate::context::RenderContext;

/// A projected vertex with its shaded colour
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    position: Point3<f32>,
    color: [f32; 3],
}

impl RenderContext {
    /// Render one view of `mesh`.
    ///
    /// The camera orbits the centre of the mesh's bounding box. The result
    /// depends only on the arguments and the context's settings.
    pub fn render(&mut self, mesh: &Mesh, camera: &CameraState, light: &LightConfig) -> Result<Frame> {
        if mesh.is_empty() {
            return Err(FlybyError::InvalidMesh(format!(
                "nothing to render ({} vertices, {} faces)",
                mesh.vertices().len(),
                mesh.faces().len()
            )));
        }

        self.clear();

        let (width, height) = (self.width(), self.height());
        let view = camera.resolve(mesh.center(), mesh.radius(), width, height);
        let projector = view.projector(width, height);
        let material = self.settings.material;

        // Gouraud shading: light each vertex once, interpolate across faces
        let normals = mesh.vertex_normals();
        let screen: Vec<Option<ScreenVertex>> = mesh
            .vertices()
            .iter()
            .zip(&normals)
            .map(|(vertex, normal)| {
                let position = projector.project(&vertex.position)?;
                let to_eye = view.view_direction(&vertex.position);
                let color = material.shade(normal, light.direction_from(&vertex.position), &to_eye);
                Some(ScreenVertex { position, color })
            })
            .collect();

        for face in mesh.faces() {
            let [a, b, c] = face.indices();
            // Skip triangles that cross the near plane
            if let (Some(v0), Some(v1), Some(v2)) = (screen[a], screen[b], screen[c]) {
                self.rasterize_triangle(&[v0, v1, v2]);
            }
        }

        Ok(self.color.clone())
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenVertex; 3]) {
        let [v0, v1, v2] = coords.map(|v| v.position);
        let width = self.width() as i32;
        let height = self.height() as i32;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(width - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(height - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    // Degenerate (zero-area) triangle
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.z + w1 * v1.z + w2 * v2.z;
                let idx = y as usize * width as usize + x as usize;
                if depth < self.depth[idx] {
                    self.depth[idx] = depth;
                    let [c0, c1, c2] = [coords[0].color, coords[1].color, coords[2].color];
                    let color = [
                        w0 * c0[0] + w1 * c1[0] + w2 * c2[0],
                        w0 * c0[1] + w1 * c1[1] + w2 * c2[1],
                        w0 * c0[2] + w1 * c1[2] + w2 * c2[2],
                    ];
                    self.color.set_pixel(x as u32, y as u32, color);
                }
            }
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
