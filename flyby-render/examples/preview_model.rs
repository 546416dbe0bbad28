/// Example: open the terminal preview for a shape model
///
/// Usage: cargo run --example preview_model -- path/to/model.obj

use anyhow::{Context, Result};
use flyby_core::{load_mesh, CameraState, LightConfig, Mesh};
use flyby_render::{RenderSettings, TerminalPreview};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mesh = match args.get(1) {
        Some(path) => {
            println!("Loading shape model: {}", path);
            load_mesh(path).with_context(|| format!("Failed to load {}", path))?
        }
        None => {
            eprintln!("Usage: {} <model-file>", args[0]);
            eprintln!("\nNo model provided, using a tetrahedron...");
            Mesh::tetrahedron(1.0)
        }
    };

    println!("Loaded {} vertices, {} faces", mesh.vertices().len(), mesh.faces().len());

    // Frame the whole model: the visible half-height should cover its radius
    let zoom = 1.0 / (mesh.radius() * 1.2).max(f32::EPSILON);
    let camera = CameraState::new(120.0, 25.0, 60.0, zoom);

    let mut preview = TerminalPreview::new(&mesh, camera, LightConfig::default(), RenderSettings::default())?;
    preview.run()?;

    let last = preview.camera();
    println!("Last view: azimuth {:.1}, elevation {:.1}", last.azimuth, last.elevation);
    Ok(())
}
