/// Geometry primitives for shape models
use nalgebra::{Point3, Vector3};

use crate::error::{FlybyError, Result};

/// A vertex position in model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }
}

/// A triangle referencing three vertices by zero-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face(pub [u32; 3]);

impl Face {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.0[0] as usize, self.0[1] as usize, self.0[2] as usize]
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// An indexed triangle mesh.
///
/// Built once per run and never mutated afterwards. Every face index is
/// guaranteed to be in range for the vertex list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self> {
        let count = vertices.len();
        if let Some((i, face)) = faces
            .iter()
            .enumerate()
            .find(|(_, face)| face.indices().iter().any(|&idx| idx >= count))
        {
            return Err(FlybyError::InvalidMesh(format!(
                "face {} references {:?} but only {} vertices exist",
                i, face.0, count
            )));
        }

        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// True when there is nothing to rasterize
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?.position;
        let (min, max) = self.vertices.iter().fold((first, first), |(min, max), v| {
            let p = v.position;
            (
                Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        });
        Some(Bounds { min, max })
    }

    /// Centre of the bounding box, or the origin for an empty mesh
    pub fn center(&self) -> Point3<f32> {
        self.bounds()
            .map(|b| b.center())
            .unwrap_or_else(Point3::origin)
    }

    /// Distance from the centre to the farthest vertex
    pub fn radius(&self) -> f32 {
        let center = self.center();
        self.vertices
            .iter()
            .map(|v| (v.position - center).norm())
            .fold(0.0, f32::max)
    }

    /// Unnormalized face normal; its length is twice the triangle area
    pub fn face_normal(&self, face: &Face) -> Vector3<f32> {
        let [a, b, c] = face.indices();
        let v0 = self.vertices[a].position;
        let v1 = self.vertices[b].position;
        let v2 = self.vertices[c].position;

        (v1 - v0).cross(&(v2 - v0))
    }

    /// Area-weighted vertex normals.
    ///
    /// Vertices that no face touches (or that only touch degenerate faces)
    /// get a zero vector.
    pub fn vertex_normals(&self) -> Vec<Vector3<f32>> {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];
        for face in &self.faces {
            let n = self.face_normal(face);
            for idx in face.indices() {
                normals[idx] += n;
            }
        }

        for n in &mut normals {
            if let Some(unit) = n.try_normalize(f32::EPSILON) {
                *n = unit;
            }
        }
        normals
    }

    /// Number of vertices not referenced by any face
    pub fn unreferenced_vertices(&self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for face in &self.faces {
            for idx in face.indices() {
                used[idx] = true;
            }
        }
        used.iter().filter(|u| !**u).count()
    }

    /// Regular tetrahedron inscribed in a cube of half-width `size`, wound
    /// counter-clockwise when seen from outside
    pub fn tetrahedron(size: f32) -> Self {
        let s = size;
        Self {
            vertices: vec![
                Vertex::new(s, s, s),
                Vertex::new(-s, -s, s),
                Vertex::new(-s, s, -s),
                Vertex::new(s, -s, -s),
            ],
            faces: vec![
                Face::new(0, 2, 1),
                Face::new(0, 1, 3),
                Face::new(0, 3, 2),
                Face::new(1, 2, 3),
            ],
        }
    }
}
