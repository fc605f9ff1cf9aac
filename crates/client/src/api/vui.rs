//! VUI service: speaker volume, head-light brightness and color

use std::fmt;
use std::ops::RangeInclusive;

use serde::Deserialize;

/// Set the speaker volume (`{"volume": n}`)
pub const SET_VOLUME: u32 = 1003;

/// Query the speaker volume
pub const GET_VOLUME: u32 = 1004;

/// Set the head-light brightness (`{"brightness": n}`)
pub const SET_BRIGHTNESS: u32 = 1005;

/// Query the head-light brightness
pub const GET_BRIGHTNESS: u32 = 1006;

/// Set the head-light color, steady or flashing
pub const SET_COLOR: u32 = 1007;

/// Levels the VUI service accepts for volume and brightness
pub const LEVEL_RANGE: RangeInclusive<u8> = 0..=10;

/// Head-light colors the VUI service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VuiColor {
    White,
    Red,
    Yellow,
    Blue,
    Green,
    Cyan,
    Purple,
}

impl VuiColor {
    /// Color name as the VUI service spells it
    pub const fn as_str(self) -> &'static str {
        match self {
            VuiColor::White => "white",
            VuiColor::Red => "red",
            VuiColor::Yellow => "yellow",
            VuiColor::Blue => "blue",
            VuiColor::Green => "green",
            VuiColor::Cyan => "cyan",
            VuiColor::Purple => "purple",
        }
    }
}

impl fmt::Display for VuiColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a volume query response
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeState {
    /// Current level, 0..=10
    pub volume: u8,
}

/// Payload of a brightness query response
#[derive(Debug, Clone, Deserialize)]
pub struct BrightnessState {
    /// Current level, 0..=10
    pub brightness: u8,
}
