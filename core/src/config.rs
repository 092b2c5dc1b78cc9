//! Pipeline configuration.
//!
//! All tunables live in explicit config values handed to the stages that
//! use them; nothing reads ambient globals.

use serde::{Deserialize, Serialize};

use crate::detect::CandidateSpec;
use attract_shared::{LogicalInput, TICK_RATE};

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub detector: DetectorConfig,
    pub sampler: SamplerConfig,
    pub recording: RecordingConfig,
}

/// Configuration for the speculative autoplay detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of frames the idle probe loop adds on top of the scripted
    /// history before giving up (30 real seconds at 60 Hz).
    pub idle_probe_frames: usize,
    /// The fixed, ordered probe menu tried at each detection checkpoint.
    /// Exactly one entry should carry `preferred_on_tie`.
    pub probe_menu: Vec<CandidateSpec>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            idle_probe_frames: (30 * TICK_RATE) as usize,
            probe_menu: vec![
                CandidateSpec { probe: LogicalInput::A, preferred_on_tie: true },
                CandidateSpec { probe: LogicalInput::B, preferred_on_tie: false },
                CandidateSpec { probe: LogicalInput::DOWN, preferred_on_tie: false },
                CandidateSpec { probe: LogicalInput::UP, preferred_on_tie: false },
                CandidateSpec { probe: LogicalInput::LEFT, preferred_on_tie: false },
                CandidateSpec { probe: LogicalInput::RIGHT, preferred_on_tie: false },
            ],
        }
    }
}

/// Configuration for the keyframe sampler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Source frame rate of the emulation (ticks per second).
    pub source_fps: u32,
    /// Target frame rate of the recording.
    pub recording_fps: u32,
}

impl SamplerConfig {
    /// Minimum ticks between kept frames.
    pub fn cadence_ticks(&self) -> u32 {
        self.source_fps / self.recording_fps.max(1)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { source_fps: TICK_RATE, recording_fps: 30 }
    }
}

/// Configuration for the GIF assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Canvas scale applied in both dimensions.
    pub canvas_scale: u32,
    /// Per-frame delay in GIF time units (hundredths of a second).
    pub frame_delay: u16,
    /// Extra loop repetitions after the first playthrough.
    pub repeat: u16,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self { canvas_scale: 2, frame_delay: 1, repeat: 1 }
    }
}
