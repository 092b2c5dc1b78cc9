//! Input script driver.
//!
//! Turns the caller's ordered logical inputs into timed transition
//! commands and feeds them through the engine in strict program order.
//! No forking happens here; that starts in [`crate::detect`].

use anyhow::Result;
use smallvec::{SmallVec, smallvec};

use crate::engine::{EmulationState, StateTransitionEngine};
use attract_shared::{InputCommand, LogicalInput};

/// Hold duration for a direction repeated by a neighboring input.
const HELD_DIRECTION_TICKS: u32 = 20;
/// Press and release halves of a direction tap.
const TAP_TICKS: u32 = 8;
/// Press duration for a non-directional button.
const PRESS_TICKS: u32 = 4;
/// Release gap after a non-directional press.
const RELEASE_TICKS: u32 = 16;

/// Commands emitted for one input given its neighbors.
///
/// A direction that equals its predecessor or successor is treated as part
/// of a held span and emitted as a single long hold. A lone direction is a
/// tap (press then release). Anything else is a short button press with a
/// longer release so menus register it as one activation.
pub fn commands_for(
    prev: Option<&LogicalInput>,
    current: &LogicalInput,
    next: Option<&LogicalInput>,
) -> SmallVec<[InputCommand; 2]> {
    if current.is_direction() {
        if prev == Some(current) || next == Some(current) {
            smallvec![InputCommand::press(*current, HELD_DIRECTION_TICKS)]
        } else {
            smallvec![
                InputCommand::press(*current, TAP_TICKS),
                InputCommand::idle(TAP_TICKS),
            ]
        }
    } else {
        smallvec![
            InputCommand::press(*current, PRESS_TICKS),
            InputCommand::idle(RELEASE_TICKS),
        ]
    }
}

/// Run the scripted input phase.
///
/// Each emission is a sequential transition; the running state is replaced
/// by each result.
pub async fn run_script<E: StateTransitionEngine>(
    engine: &E,
    mut state: EmulationState,
    inputs: &[LogicalInput],
) -> Result<EmulationState> {
    for (i, current) in inputs.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|j| inputs.get(j));
        let next = inputs.get(i + 1);

        for command in commands_for(prev, current, next) {
            state = engine.transition(state, command).await?;
        }
    }

    Ok(state)
}
