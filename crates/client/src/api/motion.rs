//! Motion switcher service: mode query and selection

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::Error;

/// Query the currently active motion mode
pub const GET_MODE: u32 = 1001;

/// Select a motion mode by name
pub const SELECT_MODE: u32 = 1002;

/// Motion modes the switcher accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    /// Everyday gait and the one-shot actions
    Normal,
    /// Acrobatics controller for sustained stunts
    Ai,
}

impl MotionMode {
    /// Mode name as the switcher spells it
    pub const fn as_str(self) -> &'static str {
        match self {
            MotionMode::Normal => "normal",
            MotionMode::Ai => "ai",
        }
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MotionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(MotionMode::Normal),
            "ai" => Ok(MotionMode::Ai),
            other => Err(Error::Transport(format!(
                "unknown motion mode reported by switcher: {other:?}"
            ))),
        }
    }
}

/// Payload of a mode query response
#[derive(Debug, Clone, Deserialize)]
pub struct SwitcherState {
    /// Active mode name
    pub name: String,

    /// Controller form, reported by some firmware revisions
    #[serde(default)]
    pub form: Option<String>,
}
