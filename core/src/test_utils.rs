//! Shared test fixtures.
//!
//! `ScriptedConsole` is a deterministic stand-in for a real emulation
//! core: the machine state is a single "scene" byte rendered into every
//! frame, and a configurable set of buttons switches the scene
//! permanently. That is enough to stage idle, attract-trigger, tie, and
//! ambiguous detection scenarios without any real emulation.

use std::future::Future;
use std::sync::Mutex;

use anyhow::{Result, bail};

use crate::engine::{EmulationState, StateTransitionEngine};
use attract_shared::{Buttons, CoreType, Frame, InputCommand};

/// Install a test subscriber so `RUST_LOG` filters pipeline logs.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fresh two-byte machine state: `[scene, last_trigger_button]`.
pub fn boot_state() -> EmulationState {
    EmulationState::new(CoreType::Nes, vec![0xde, 0xad], vec![0, 0])
}

/// One 2x2 RGB565 frame whose content encodes the scene byte.
pub fn scene_frame(scene: u8) -> Frame {
    Frame::new(vec![scene; 8], 2, 2)
}

/// Deterministic fake transition engine.
///
/// Appends one frame per tick. Every received command is recorded so
/// tests can assert on the exact emission sequence.
pub struct ScriptedConsole {
    /// Buttons that permanently switch the scene when pressed.
    scene_triggers: Vec<(Buttons, u8)>,
    /// Every command received, in call order.
    pub commands: Mutex<Vec<InputCommand>>,
    /// Fail the Nth and all later transitions (None = never fail).
    fail_after: Option<usize>,
}

impl ScriptedConsole {
    pub fn new(scene_triggers: Vec<(Buttons, u8)>) -> Self {
        Self {
            scene_triggers,
            commands: Mutex::new(Vec::new()),
            fail_after: None,
        }
    }

    /// A console that never reacts to any input.
    pub fn idle() -> Self {
        Self::new(Vec::new())
    }

    /// A console whose engine breaks after `calls` transitions.
    pub fn failing_after(calls: usize) -> Self {
        Self {
            scene_triggers: Vec::new(),
            commands: Mutex::new(Vec::new()),
            fail_after: Some(calls),
        }
    }

    /// Snapshot of the commands received so far.
    pub fn received(&self) -> Vec<InputCommand> {
        self.commands.lock().expect("command log poisoned").clone()
    }
}

impl StateTransitionEngine for ScriptedConsole {
    fn transition(
        &self,
        state: EmulationState,
        command: InputCommand,
    ) -> impl Future<Output = Result<EmulationState>> + Send {
        async move {
            let call_index = {
                let mut log = self.commands.lock().expect("command log poisoned");
                log.push(command);
                log.len()
            };
            if let Some(limit) = self.fail_after
                && call_index > limit
            {
                bail!("scripted engine failure at call {call_index}");
            }

            let mut state = state;
            let mut scene = state.state_blob.first().copied().unwrap_or(0);
            let mut marker = state.state_blob.get(1).copied().unwrap_or(0);
            for &(mask, next_scene) in &self.scene_triggers {
                if command.buttons.contains(mask) {
                    scene = next_scene;
                    marker = mask.bits() as u8;
                }
            }
            state.state_blob = vec![scene, marker];

            for _ in 0..command.hold_ticks {
                state.frames.push(scene_frame(scene));
            }

            Ok(state)
        }
    }
}
