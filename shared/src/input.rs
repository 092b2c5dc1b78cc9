//! Logical inputs and scripted input commands.
//!
//! `LogicalInput` is the caller-facing sparse button set (no timing).
//! `InputCommand` is what the transition engine consumes: a button mask
//! held for a fixed number of ticks.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Packed button mask in the engine's wire layout.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u16 {
        const UP     = 0b0000_0001;
        const DOWN   = 0b0000_0010;
        const LEFT   = 0b0000_0100;
        const RIGHT  = 0b0000_1000;
        const A      = 0b0001_0000;
        const B      = 0b0010_0000;
        const START  = 0b0100_0000;
        const SELECT = 0b1000_0000;
    }
}

// Manual serde implementation (bitflags types serialize as their raw bits)
impl Serialize for Buttons {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Buttons {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(Buttons::from_bits_truncate(bits))
    }
}

/// Sparse set of pressed buttons, as supplied by the caller.
///
/// Carries no timing; the script driver decides hold durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicalInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub a: bool,
    pub b: bool,
    pub start: bool,
    pub select: bool,
}

impl LogicalInput {
    /// No buttons pressed.
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
        a: false,
        b: false,
        start: false,
        select: false,
    };

    pub const UP: Self = Self { up: true, ..Self::NONE };
    pub const DOWN: Self = Self { down: true, ..Self::NONE };
    pub const LEFT: Self = Self { left: true, ..Self::NONE };
    pub const RIGHT: Self = Self { right: true, ..Self::NONE };
    pub const A: Self = Self { a: true, ..Self::NONE };
    pub const B: Self = Self { b: true, ..Self::NONE };
    pub const START: Self = Self { start: true, ..Self::NONE };
    pub const SELECT: Self = Self { select: true, ..Self::NONE };

    /// Convert to the engine's packed button mask.
    pub fn buttons(&self) -> Buttons {
        let mut mask = Buttons::empty();
        mask.set(Buttons::UP, self.up);
        mask.set(Buttons::DOWN, self.down);
        mask.set(Buttons::LEFT, self.left);
        mask.set(Buttons::RIGHT, self.right);
        mask.set(Buttons::A, self.a);
        mask.set(Buttons::B, self.b);
        mask.set(Buttons::START, self.start);
        mask.set(Buttons::SELECT, self.select);
        mask
    }

    /// True when exactly one directional flag is set and nothing else.
    pub fn is_direction(&self) -> bool {
        let directions =
            u8::from(self.up) + u8::from(self.down) + u8::from(self.left) + u8::from(self.right);
        let actions =
            u8::from(self.a) + u8::from(self.b) + u8::from(self.start) + u8::from(self.select);
        directions == 1 && actions == 0
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// One scripted transition command: hold a button mask for `hold_ticks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCommand {
    pub buttons: Buttons,
    pub hold_ticks: u32,
}

impl InputCommand {
    /// Hold the given input for `hold_ticks` ticks.
    pub fn press(input: LogicalInput, hold_ticks: u32) -> Self {
        Self { buttons: input.buttons(), hold_ticks }
    }

    /// Hold no input for `hold_ticks` ticks.
    pub fn idle(hold_ticks: u32) -> Self {
        Self { buttons: Buttons::empty(), hold_ticks }
    }

    pub fn is_idle(&self) -> bool {
        self.buttons.is_empty()
    }
}
