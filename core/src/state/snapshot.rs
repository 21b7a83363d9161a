use crate::devices::{CameraId, DoorId, DoorStatus};
use crate::prelude::SecurityMode;
use crate::state::activity::ActivityEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorState {
    pub id: DoorId,
    pub status: DoorStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraState {
    pub id: CameraId,
    pub enabled: bool,
}

/// Read-only copy of the session state handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySnapshot {
    pub mode: SecurityMode,
    pub doors: Vec<DoorState>,
    pub cameras: Vec<CameraState>,
    pub motion: bool,
    pub alerts: Vec<String>,
    pub activity_log: Vec<ActivityEntry>,
    pub last_update: String,
}

impl SecuritySnapshot {
    pub fn door(&self, id: DoorId) -> Option<DoorStatus> {
        self.doors
            .iter()
            .find(|door| door.id == id)
            .map(|door| door.status)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
