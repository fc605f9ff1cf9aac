//! Data-channel topics for the onboard services this client talks to

/// Motion switcher service (mode query and selection)
pub const MOTION_SWITCHER: &str = "rt/api/motion_switcher/request";

/// Sport service (posture, gait, and stunt commands)
pub const SPORT: &str = "rt/api/sport/request";

/// VUI service (volume, head-light brightness and color)
pub const VUI: &str = "rt/api/vui/request";
