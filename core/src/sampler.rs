//! Temporal frame sampling.
//!
//! Downsamples the dense 60 Hz frame history into an ordered keyframe
//! sequence: frames are kept on a cadence derived from the target
//! recording rate, but only when their content actually changed since the
//! last kept frame. Content dedup takes precedence over cadence, so a
//! static screen produces a single keyframe no matter how long it lasts.

use attract_shared::Frame;

use crate::config::SamplerConfig;

/// A retained frame, tagged with its position in the original history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyframe {
    pub frame: Frame,
    /// Index in the source history this keyframe represents.
    pub render_index: usize,
}

/// Sample the frame history down to keyframes.
///
/// Index 0 is always kept. A later frame is kept when at least
/// `cadence_ticks` have elapsed since the last keep and its content
/// differs from the last kept frame. If the history's final frame differs
/// from the last kept frame, a trailing anchor duplicating the last kept
/// content is appended, tagged with the full history length, so the
/// recording's duration reaches the simulation's true end even when the
/// tail never met the cadence.
pub fn sample_keyframes(frames: &[Frame], config: &SamplerConfig) -> Vec<Keyframe> {
    let cadence = config.cadence_ticks();
    let mut kept: Vec<Keyframe> = Vec::new();
    let mut ticks_since_kept: u32 = 0;

    for (index, frame) in frames.iter().enumerate() {
        if index == 0 {
            kept.push(Keyframe { frame: frame.clone(), render_index: 0 });
            ticks_since_kept = 0;
            continue;
        }

        let changed = kept.last().is_none_or(|key| key.frame != *frame);
        if ticks_since_kept >= cadence && changed {
            kept.push(Keyframe { frame: frame.clone(), render_index: index });
            ticks_since_kept = 0;
        } else {
            ticks_since_kept += 1;
        }
    }

    let anchor = match (kept.last(), frames.last()) {
        (Some(key), Some(raw)) if key.frame != *raw => Some(Keyframe {
            frame: key.frame.clone(),
            render_index: frames.len(),
        }),
        _ => None,
    };
    if let Some(anchor) = anchor {
        kept.push(anchor);
    }

    kept
}
