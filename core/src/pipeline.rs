//! End-to-end pipeline.
//!
//! Composes the four stages: scripted input playback, speculative
//! autoplay detection, keyframe sampling, and recording assembly.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::engine::{EmulationState, StateTransitionEngine};
use crate::{detect, recording, sampler, script};
use attract_shared::{CoreType, LogicalInput};

/// Fixed name of the recording artifact.
pub const RECORDING_NAME: &str = "event.gif";

/// Everything needed to run one emulation session.
#[derive(Debug, Clone)]
pub struct EmulateRequest {
    pub core_type: CoreType,
    /// ROM contents.
    pub game_image: Vec<u8>,
    /// Serialized machine state to resume from (empty = cold boot).
    pub initial_state: Vec<u8>,
    /// Ordered logical inputs to script before the idle probe.
    pub inputs: Vec<LogicalInput>,
}

/// Final result of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulateOutput {
    /// Serialized machine state at the end of the run.
    pub state: Vec<u8>,
    /// Animated GIF of the run's visual highlights.
    pub recording: Vec<u8>,
    pub recording_name: String,
}

/// Run the full pipeline: script, probe, sample, encode.
///
/// Deterministic for a fixed request as long as the engine honors the
/// [`StateTransitionEngine`] purity contract.
pub async fn emulate<E: StateTransitionEngine>(
    engine: &Arc<E>,
    request: EmulateRequest,
    config: &PipelineConfig,
) -> Result<EmulateOutput> {
    let emulation_started = Instant::now();

    let state = EmulationState::new(request.core_type, request.game_image, request.initial_state);
    let state = script::run_script(engine.as_ref(), state, &request.inputs)
        .await
        .context("scripted input phase failed")?;
    let state = detect::run_detection(engine, state, &config.detector)
        .await
        .context("autoplay detection failed")?;

    tracing::debug!(
        elapsed_ms = emulation_started.elapsed().as_millis() as u64,
        frames = state.frame_count(),
        "emulation finished"
    );

    let sampling_started = Instant::now();
    let keyframes = sampler::sample_keyframes(&state.frames, &config.sampler);
    tracing::debug!(
        elapsed_ms = sampling_started.elapsed().as_millis() as u64,
        keyframes = keyframes.len(),
        "frame sampling finished"
    );

    let encoding_started = Instant::now();
    let recording = recording::assemble_recording(&keyframes, &config.recording)
        .context("failed to assemble recording")?;
    tracing::debug!(
        elapsed_ms = encoding_started.elapsed().as_millis() as u64,
        bytes = recording.len(),
        "recording encoded"
    );

    Ok(EmulateOutput {
        state: state.state_blob,
        recording,
        recording_name: RECORDING_NAME.to_string(),
    })
}
