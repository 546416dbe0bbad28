/// Flyby Core Library - shape models, camera, lighting and frames
///
/// This library provides the stateless pieces of the rotation renderer:
/// mesh loading, orbit camera math, the shading model, raster frames,
/// configuration and asset acquisition.

pub mod asset;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod lighting;
pub mod obj;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, CameraState, ProjectionMode, Projector};
pub use config::FlybyConfig;
pub use error::{FlybyError, Result};
pub use frame::Frame;
pub use geometry::{Face, Mesh, Vertex};
pub use lighting::{LightConfig, Material};
pub use obj::{load_mesh, parse_mesh, write_mesh};
