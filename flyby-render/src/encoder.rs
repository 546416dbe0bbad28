/// Looping GIF output for a rendered sweep
use flyby_core::{FlybyError, Frame, Result};
use std::path::Path;

/// Default seconds each frame stays on screen
pub const DEFAULT_DURATION: f32 = 0.04;

/// NeuQuant sampling factor (1 = best quality, 30 = fastest)
const QUANTIZER_SPEED: i32 = 10;

/// Convert a per-frame duration in seconds to GIF delay units (1/100 s)
pub fn delay_centiseconds(duration: f32) -> Result<u16> {
    let ticks = (duration * 100.0).round();
    if !(ticks >= 0.0 && ticks <= f32::from(u16::MAX)) {
        return Err(FlybyError::Config(format!(
            "frame duration {}s does not fit a GIF delay",
            duration
        )));
    }
    Ok(ticks as u16)
}

/// Write `frames` to `path` as an endlessly looping GIF.
///
/// The GIF is assembled in a temporary file next to `path` and moved into
/// place only after the last frame is written, so a failure never leaves a
/// truncated animation behind.
pub fn encode_gif<P: AsRef<Path>>(frames: &[Frame], duration: f32, path: P) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = check_frames(frames)?;
    let delay = delay_centiseconds(duration)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".flyby-")
        .suffix(".gif.part")
        .tempfile_in(dir)?;

    {
        let mut encoder =
            gif::Encoder::new(tmp.as_file_mut(), width, height, &[]).map_err(encoding_error)?;

        // Repeat count 0 = infinite loop
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(encoding_error)?;

        for frame in frames {
            let rgb = frame.to_rgb8();
            let mut gif_frame = gif::Frame::from_rgb_speed(width, height, &rgb, QUANTIZER_SPEED);
            gif_frame.delay = delay;
            encoder.write_frame(&gif_frame).map_err(encoding_error)?;
        }

        // Writes the trailer
        encoder.into_inner()?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    tracing::info!(
        "GIF saved: {} ({} frames, {}x{})",
        path.display(),
        frames.len(),
        width,
        height
    );
    Ok(())
}

/// All frames must exist and share one size that fits GIF's 16-bit fields
fn check_frames(frames: &[Frame]) -> Result<(u16, u16)> {
    let first = frames
        .first()
        .ok_or_else(|| FlybyError::InvalidFrame("no frames to encode".into()))?;
    let (width, height) = (first.width(), first.height());

    if let Some((i, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, f)| f.width() != width || f.height() != height)
    {
        return Err(FlybyError::InvalidFrame(format!(
            "frame {} is {}x{}, expected {}x{}",
            i,
            frame.width(),
            frame.height(),
            width,
            height
        )));
    }

    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(FlybyError::InvalidFrame(format!(
            "{}x{} is not a valid GIF size",
            width, height
        ))),
    }
}

fn encoding_error(e: gif::EncodingError) -> FlybyError {
    match e {
        gif::EncodingError::Io(err) => FlybyError::Io(err),
        other => FlybyError::InvalidFrame(other.to_string()),
    }
}
