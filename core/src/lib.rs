//! Attract Core - speculative attract-mode detection pipeline
//!
//! Drives a deterministic emulation core through a scripted input sequence,
//! probes the long-run idle behavior for a self-triggering "attract mode"
//! loop by forking the simulation into parallel hypothetical futures, and
//! compresses the resulting frame history into an animated GIF.
//!
//! # Architecture
//!
//! - [`StateTransitionEngine`] - Boundary trait for the emulation core
//! - [`script`] - Turns logical inputs into timed transition commands
//! - [`detect`] - The speculative branch-exploration loop
//! - [`sampler`] - Downsamples the frame history into keyframes
//! - [`recording`] - Encodes keyframes into an animated GIF buffer
//! - [`pipeline::emulate`] - End-to-end entry point

pub mod config;
pub mod detect;
pub mod engine;
pub mod pipeline;
pub mod recording;
pub mod sampler;
pub mod script;
#[cfg(test)]
pub mod test_utils;

// Re-export the pipeline surface
pub use config::{DetectorConfig, PipelineConfig, RecordingConfig, SamplerConfig};
pub use detect::{CandidateSpec, run_detection};
pub use engine::{EmulationState, StateTransitionEngine};
pub use pipeline::{EmulateOutput, EmulateRequest, RECORDING_NAME, emulate};
pub use recording::{RecordingError, assemble_recording};
pub use sampler::{Keyframe, sample_keyframes};
pub use script::run_script;

// Re-export shared types for convenience
pub use attract_shared::{Buttons, CoreType, Frame, InputCommand, LogicalInput, TICK_RATE};
