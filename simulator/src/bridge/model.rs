use homecore::devices::DoorStatus;
use homecore::{SecurityMode, SecuritySnapshot};

/// Indicator styling for one status readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub class: &'static str,
    pub color: &'static str,
    pub text: &'static str,
}

const ACTIVE: &str = "#4dff4d";
const INACTIVE: &str = "#808080";
const WARNING: &str = "#ffbb33";
const ALERT: &str = "#ff4d4d";

pub fn mode_badge(mode: SecurityMode) -> Badge {
    let (class, color) = match mode {
        SecurityMode::Disarmed => ("status-inactive", INACTIVE),
        SecurityMode::ArmedHome => ("status-warning", WARNING),
        SecurityMode::ArmedAway => ("status-active", ACTIVE),
    };
    Badge {
        class,
        color,
        text: mode.label(),
    }
}

pub fn door_badge(status: DoorStatus) -> Badge {
    match status {
        DoorStatus::Open => Badge {
            class: "status-alert",
            color: ALERT,
            text: status.label(),
        },
        DoorStatus::Closed => Badge {
            class: "status-active",
            color: ACTIVE,
            text: status.label(),
        },
    }
}

pub fn camera_badge(enabled: bool) -> Badge {
    if enabled {
        Badge {
            class: "status-active",
            color: ACTIVE,
            text: "Active",
        }
    } else {
        Badge {
            class: "status-inactive",
            color: INACTIVE,
            text: "Inactive",
        }
    }
}

pub fn motion_badge(motion: bool) -> Badge {
    if motion {
        Badge {
            class: "status-alert",
            color: ALERT,
            text: "Detected",
        }
    } else {
        Badge {
            class: "status-inactive",
            color: INACTIVE,
            text: "None",
        }
    }
}

/// Everything the page renderer needs for one response.
#[derive(Debug, Clone)]
pub struct DashboardModel {
    pub snapshot: SecuritySnapshot,
    pub refresh_secs: u64,
    pub notice: Option<String>,
}

impl DashboardModel {
    pub fn new(snapshot: SecuritySnapshot, refresh_secs: u64) -> Self {
        Self {
            snapshot,
            refresh_secs,
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}
