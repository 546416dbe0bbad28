/// Off-screen rasterizer, rotation sweep and GIF output for shape models
///
/// A single `RenderContext` is acquired per run and reused for every frame
/// of the sweep. The optional terminal preview renders through its own
/// context sized to the terminal.

pub mod animation;
pub mod context;
pub mod encoder;
pub mod pipeline;
pub mod preview;
pub mod renderer;

pub use animation::{AnimationDriver, DriverState};
pub use context::{RenderContext, RenderSettings};
pub use encoder::encode_gif;
pub use pipeline::{create_animation, render_model};
pub use preview::TerminalPreview;
