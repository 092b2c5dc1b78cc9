//! Transition engine boundary.
//!
//! The emulation core itself (CPU/PPU, timing) lives behind the
//! [`StateTransitionEngine`] trait. The pipeline only requires that a
//! transition is deterministic, side-effect-free, and appends the frames
//! rendered while the command's button mask was held.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use attract_shared::{CoreType, Frame, InputCommand};

/// Immutable snapshot of an emulation run.
///
/// Threaded through the pipeline by substitution: every transition returns
/// a new snapshot and the previous one is dropped or kept as a fork point.
/// Forking is a `clone()`; branches derived from the same parent never
/// alias or mutate its buffers (the game image is shared read-only).
#[derive(Clone)]
pub struct EmulationState {
    pub core_type: CoreType,
    /// ROM contents, shared across all forks of a run.
    pub game_image: Arc<[u8]>,
    /// Opaque serialized machine state owned by the engine.
    pub state_blob: Vec<u8>,
    /// Append-only frame history. Forking never truncates or rewrites
    /// frames already present in a lineage.
    pub frames: Vec<Frame>,
}

impl EmulationState {
    pub fn new(core_type: CoreType, game_image: Vec<u8>, state_blob: Vec<u8>) -> Self {
        Self {
            core_type,
            game_image: game_image.into(),
            state_blob,
            frames: Vec::new(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The checkpoint frame: the last frame appended by this lineage.
    pub fn checkpoint(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl fmt::Debug for EmulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmulationState")
            .field("core_type", &self.core_type)
            .field("game_image_len", &self.game_image.len())
            .field("state_blob_len", &self.state_blob.len())
            .field("frames", &self.frames.len())
            .finish()
    }
}

/// Boundary trait for the emulation core.
///
/// `transition` must be a pure function of `(state, command)`: identical
/// inputs yield byte-identical output state and frames, including when
/// invoked concurrently from independent forks of the same parent. The
/// whole detection algorithm is unsound without this.
///
/// A transition failure is fatal to the pipeline; there is no local retry
/// since a partially-applied command has unclear semantics for a black-box
/// engine.
pub trait StateTransitionEngine: Send + Sync + 'static {
    /// Advance `state` by one command, returning a new snapshot with the
    /// rendered frames appended to its history.
    fn transition(
        &self,
        state: EmulationState,
        command: InputCommand,
    ) -> impl Future<Output = Result<EmulationState>> + Send;
}
