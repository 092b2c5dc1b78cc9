//! Speculative autoplay detection.
//!
//! After the scripted phase, the simulation is probed for a distinct
//! self-triggering "attract mode" loop. Each iteration forks the current
//! snapshot into a no-input control branch and one branch per probe input,
//! then compares checkpoint checksums:
//!
//! - a probe whose checksum matches the control is an ordinary idle
//!   continuation and is discarded;
//! - exactly one divergent outcome from the preferred probe commits that
//!   branch (the detected attract trigger path);
//! - two or more mutually different divergent outcomes make the search
//!   ambiguous and abort the loop with the pre-iteration state intact.
//!
//! Checksum comparison is a coarse behavioral-equivalence oracle: it asks
//! "does this input change the long-run idle trajectory" without ever
//! inspecting engine state, at the cost of a small collision risk.

use std::sync::Arc;

use anyhow::{Context, Result};
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinSet;

use crate::config::DetectorConfig;
use crate::engine::{EmulationState, StateTransitionEngine};
use attract_shared::{InputCommand, LogicalInput, checkpoint_checksum};

/// Idle hold for the per-iteration control branch.
const CONTROL_IDLE_TICKS: u32 = 20;
/// Hold for a candidate probe press.
const PROBE_PRESS_TICKS: u32 = 4;
/// Idle settle after a probe press, before the checkpoint frame.
const PROBE_SETTLE_TICKS: u32 = 16;
/// Idle continuation appended after each committed iteration.
const ITERATION_IDLE_TICKS: u32 = 32;
/// Idle tail appended once after the loop ends, however it ends.
const TAIL_IDLE_TICKS: u32 = 30;

/// One entry of the fixed probe menu tried at each detection checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSpec {
    /// Input pressed on this branch.
    pub probe: LogicalInput,
    /// Wins the bucket slot when two probes hash to the same checksum.
    pub preferred_on_tie: bool,
}

/// One observed divergent outcome, keyed by checksum in the bucket map.
struct DetectionCandidate {
    checksum: u64,
    preferred: bool,
    state: EmulationState,
}

type CandidateBuckets = Mutex<HashMap<u64, DetectionCandidate>>;

/// Checksum of a branch's checkpoint frame (the last frame it appended).
fn checkpoint_sum(state: &EmulationState) -> Result<u64> {
    let frame = state
        .checkpoint()
        .context("transition produced an empty frame history")?;
    Ok(checkpoint_checksum(&frame.pixels))
}

/// Run the detection loop and the idle tail.
///
/// Returns the state after the tail transition. Engine failures on any
/// branch are fatal and propagate; ambiguity is not an error.
pub async fn run_detection<E: StateTransitionEngine>(
    engine: &Arc<E>,
    mut state: EmulationState,
    config: &DetectorConfig,
) -> Result<EmulationState> {
    let target_frames = state.frame_count() + config.idle_probe_frames;

    while state.frame_count() < target_frames {
        let buckets: Arc<CandidateBuckets> = Arc::new(Mutex::new(HashMap::new()));
        let (control_sum_tx, control_sum_rx) = watch::channel(None::<u64>);

        // Control branch: idle continuation. Its checksum is computed once
        // and published to every candidate task through the watch channel.
        let control = {
            let engine = Arc::clone(engine);
            let parent = state.clone();
            tokio::spawn(async move {
                let branch = engine
                    .transition(parent, InputCommand::idle(CONTROL_IDLE_TICKS))
                    .await?;
                let sum = checkpoint_sum(&branch)?;
                // Receivers may be gone if every probe short-circuited.
                let _ = control_sum_tx.send(Some(sum));
                anyhow::Ok(branch)
            })
        };

        let mut probes = JoinSet::new();
        for spec in &config.probe_menu {
            let engine = Arc::clone(engine);
            let parent = state.clone();
            let buckets = Arc::clone(&buckets);
            let mut control_sum_rx = control_sum_rx.clone();
            let spec = *spec;

            probes.spawn(async move {
                // Best-effort short-circuit: with two distinct outcomes the
                // iteration is already ambiguous, so this probe's work is
                // wasted. Checked once at task start only; a task past this
                // point runs to completion.
                if buckets.lock().await.len() > 1 {
                    return anyhow::Ok(());
                }

                let pressed = engine
                    .transition(parent, InputCommand::press(spec.probe, PROBE_PRESS_TICKS))
                    .await?;
                let settled = engine
                    .transition(pressed, InputCommand::idle(PROBE_SETTLE_TICKS))
                    .await?;
                let sum = checkpoint_sum(&settled)?;

                let control_sum = (*control_sum_rx
                    .wait_for(Option::is_some)
                    .await
                    .context("control branch ended without publishing its checksum")?)
                .context("control checksum unset")?;

                if sum == control_sum {
                    // Ordinary idle continuation, not divergent.
                    return Ok(());
                }

                let mut map = buckets.lock().await;
                match map.entry(sum) {
                    Entry::Vacant(slot) => {
                        slot.insert(DetectionCandidate {
                            checksum: sum,
                            preferred: spec.preferred_on_tie,
                            state: settled,
                        });
                    }
                    Entry::Occupied(mut slot) => {
                        if spec.preferred_on_tie {
                            slot.insert(DetectionCandidate {
                                checksum: sum,
                                preferred: true,
                                state: settled,
                            });
                        }
                    }
                }

                Ok(())
            });
        }

        // Settle every candidate before inspecting the buckets. Errors are
        // remembered but reported only after the control branch is joined,
        // so an engine failure on the control path surfaces as itself.
        let mut probe_error = None;
        while let Some(joined) = probes.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(join_error) => Err(anyhow::anyhow!(join_error).context("candidate probe task failed")),
            };
            if let Err(error) = result
                && probe_error.is_none()
            {
                probe_error = Some(error);
            }
        }

        let control_state = control
            .await
            .context("control branch task failed")??;

        if let Some(error) = probe_error {
            return Err(error);
        }

        let candidate = {
            let mut map = buckets.lock().await;
            if map.len() > 1 {
                tracing::debug!(
                    buckets = map.len(),
                    frame = state.frame_count(),
                    "divergent outcomes ambiguous, aborting detection"
                );
                // Discard this iteration's speculative work entirely; the
                // pre-iteration state proceeds to the tail unchanged.
                break;
            }
            map.drain().next().map(|(_, candidate)| candidate)
        };

        state = match candidate {
            Some(candidate) if candidate.preferred => {
                tracing::info!(
                    checksum = candidate.checksum,
                    frame = candidate.state.frame_count(),
                    "attract trigger path detected"
                );
                candidate.state
            }
            // No divergence, or a lone non-preferred one: keep idling.
            _ => control_state,
        };

        state = engine
            .transition(state, InputCommand::idle(ITERATION_IDLE_TICKS))
            .await?;
    }

    engine
        .transition(state, InputCommand::idle(TAIL_IDLE_TICKS))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::test_utils::{ScriptedConsole, boot_state, init_test_logging};
    use attract_shared::Buttons;

    fn small_config() -> DetectorConfig {
        init_test_logging();
        DetectorConfig {
            idle_probe_frames: 120,
            ..DetectorConfig::default()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_idle_game_commits_control_until_budget() {
        let engine = Arc::new(ScriptedConsole::idle());
        let state = boot_state();

        let result = run_detection(&engine, state, &small_config()).await.unwrap();

        // Each iteration adds control(20) + idle(32) frames; the loop runs
        // while under 120, then the 30-tick tail always follows.
        assert_eq!(result.frame_count(), 52 * 3 + 30);
        // Scene never changed
        assert_eq!(result.state_blob, vec![0, 0]);
        assert!(result.frames.iter().all(|f| f.pixels[0] == 0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_preferred_probe_commits_attract_branch() {
        // Only A diverges: the classic attract-mode trigger.
        let engine = Arc::new(ScriptedConsole::new(vec![(Buttons::A, 5)]));
        let state = boot_state();

        let result = run_detection(&engine, state, &small_config()).await.unwrap();

        // The A branch was committed in the first iteration
        assert_eq!(result.state_blob[0], 5);
        // Branch frames: press(4) + settle(16), then idle(32) per iteration
        assert!(result.frames.iter().any(|f| f.pixels[0] == 5));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_non_preferred_divergence_keeps_idle_path() {
        // Only B diverges; a lone non-preferred bucket commits the control.
        let engine = Arc::new(ScriptedConsole::new(vec![(Buttons::B, 7)]));
        let state = boot_state();

        let result = run_detection(&engine, state, &small_config()).await.unwrap();

        assert_eq!(result.state_blob[0], 0);
        assert!(result.frames.iter().all(|f| f.pixels[0] == 0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_ambiguity_aborts_with_state_unchanged() {
        // A and B produce two distinct divergent outcomes in one iteration.
        let engine = Arc::new(ScriptedConsole::new(vec![
            (Buttons::A, 2),
            (Buttons::B, 3),
        ]));
        let state = boot_state();

        let result = run_detection(&engine, state, &small_config()).await.unwrap();

        // The loop aborted on its first iteration without committing any
        // branch: only the 30-tick tail was appended to the initial state.
        assert_eq!(result.frame_count(), 30);
        assert_eq!(result.state_blob[0], 0);
        assert!(result.frames.iter().all(|f| f.pixels[0] == 0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_tie_break_prefers_priority_probe() {
        // A and B switch to the same scene: identical divergent checksums.
        let engine = Arc::new(ScriptedConsole::new(vec![
            (Buttons::A, 4),
            (Buttons::B, 4),
        ]));
        let state = boot_state();

        let result = run_detection(&engine, state, &small_config()).await.unwrap();

        // One bucket, stored candidate is the preferred A branch; the
        // committed state carries A's trigger marker, not B's.
        assert_eq!(result.state_blob[0], 4);
        assert_eq!(result.state_blob[1], Buttons::A.bits() as u8);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_engine_failure_is_fatal() {
        let engine = Arc::new(ScriptedConsole::failing_after(10));
        let state = boot_state();

        let result = run_detection(&engine, state, &small_config()).await;
        assert!(result.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_detection_is_deterministic() {
        let engine = Arc::new(ScriptedConsole::new(vec![(Buttons::A, 5)]));

        let first = run_detection(&engine, boot_state(), &small_config()).await.unwrap();
        let second = run_detection(&engine, boot_state(), &small_config()).await.unwrap();

        assert_eq!(first.state_blob, second.state_blob);
        assert_eq!(first.frames, second.frames);
    }
}
