//! Shared types for the attract-mode probe pipeline.
//!
//! Console-agnostic value types used by both the pipeline core and engine
//! adapters: core identifiers, logical inputs, scripted input commands,
//! raw frames, and the content checksum used for branch comparison.

use serde::{Deserialize, Serialize};

pub mod checksum;
pub mod frame;
pub mod input;

pub use checksum::checkpoint_checksum;
pub use frame::Frame;
pub use input::{Buttons, InputCommand, LogicalInput};

/// Simulation steps per second. One tick is one emulated frame.
pub const TICK_RATE: u32 = 60;

/// Emulation core identifier.
///
/// Selects which console core the transition engine runs. The pipeline
/// itself treats this as an opaque tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreType {
    Nes,
    Snes,
    Gb,
    Gba,
}

impl CoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoreType::Nes => "nes",
            CoreType::Snes => "snes",
            CoreType::Gb => "gb",
            CoreType::Gba => "gba",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_type_names() {
        assert_eq!(CoreType::Nes.as_str(), "nes");
        assert_eq!(CoreType::Snes.as_str(), "snes");
        assert_eq!(CoreType::Gb.as_str(), "gb");
        assert_eq!(CoreType::Gba.as_str(), "gba");
    }
}
