//! Recording assembly.
//!
//! Converts the sampled keyframes into an animated GIF held in memory:
//! RGB565 frames are expanded to RGBA, scaled up with nearest-neighbor
//! filtering, repacked to RGB, and written with a fixed per-frame delay
//! and a finite repeat count.

use image::RgbaImage;
use image::imageops::FilterType;
use thiserror::Error;

use crate::config::RecordingConfig;
use crate::sampler::Keyframe;

#[derive(Debug, Error)]
pub enum RecordingError {
    /// The sampler produced no keyframes (degenerate or empty history).
    /// Downstream canvas dimensions would be undefined, so this fails
    /// fast instead.
    #[error("no keyframes to encode")]
    EmptyKeyframes,
    /// A keyframe's pixel buffer did not match its declared dimensions.
    #[error("keyframe at history index {render_index} has a malformed pixel buffer")]
    MalformedFrame { render_index: usize },
    #[error("GIF encoding failed")]
    Encode(#[from] gif::EncodingError),
}

/// Serialize keyframes into an animated GIF byte buffer.
///
/// The canvas takes its dimensions from the last keyframe, scaled by
/// `canvas_scale` in both directions.
pub fn assemble_recording(
    keyframes: &[Keyframe],
    config: &RecordingConfig,
) -> Result<Vec<u8>, RecordingError> {
    let last = keyframes.last().ok_or(RecordingError::EmptyKeyframes)?;
    let width = last.frame.width * config.canvas_scale;
    let height = last.frame.height * config.canvas_scale;

    let mut buffer = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut buffer, width as u16, height as u16, &[])?;
        encoder.set_repeat(gif::Repeat::Finite(config.repeat))?;

        for key in keyframes {
            let rgba = key.frame.to_rgba();
            let still = RgbaImage::from_raw(key.frame.width, key.frame.height, rgba)
                .ok_or(RecordingError::MalformedFrame { render_index: key.render_index })?;
            let scaled = image::imageops::resize(&still, width, height, FilterType::Nearest);

            // Repack RGBA to RGB for the GIF encoder (no alpha in output)
            let raw = scaled.into_raw();
            let mut rgb_pixels: Vec<u8> = Vec::with_capacity(raw.len() * 3 / 4);
            for chunk in raw.chunks(4) {
                rgb_pixels.push(chunk[0]);
                rgb_pixels.push(chunk[1]);
                rgb_pixels.push(chunk[2]);
            }

            let mut frame = gif::Frame::from_rgb(width as u16, height as u16, &rgb_pixels);
            frame.delay = config.frame_delay;
            encoder.write_frame(&frame)?;
        }
    }

    tracing::debug!(
        frames = keyframes.len(),
        width,
        height,
        bytes = buffer.len(),
        "recording assembled"
    );

    Ok(buffer)
}
