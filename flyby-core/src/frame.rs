/// Raster frames produced by the renderer
use crate::error::{FlybyError, Result};

/// An RGB raster with unit-interval `f32` samples, row-major, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    /// A frame filled with one colour
    pub fn filled(width: u32, height: u32, color: [f32; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut samples = Vec::with_capacity(pixels * Self::CHANNELS);
        for _ in 0..pixels {
            samples.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            samples,
        }
    }

    pub fn from_samples(width: u32, height: u32, samples: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize * Self::CHANNELS;
        if samples.len() != expected {
            return Err(FlybyError::InvalidFrame(format!(
                "{}x{} frame needs {} samples, got {}",
                width,
                height,
                expected,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        [self.samples[i], self.samples[i + 1], self.samples[i + 2]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 3]) {
        let i = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        self.samples[i..i + Self::CHANNELS].copy_from_slice(&color);
    }

    /// Rec. 601 luma of a pixel
    pub fn luminance(&self, x: u32, y: u32) -> f32 {
        let [r, g, b] = self.pixel(x, y);
        0.299 * r + 0.587 * g + 0.114 * b
    }

    /// Convert to 8-bit RGB.
    ///
    /// Each sample is clamped to `[0, 1]`, scaled by 255 and truncated, so
    /// identical frames always produce identical bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.samples.iter().map(|&s| to_u8(s)).collect()
    }
}

fn to_u8(sample: f32) -> u8 {
    // NaN clamps to NaN and then casts to 0
    (sample.clamp(0.0, 1.0) * 255.0) as u8
}
