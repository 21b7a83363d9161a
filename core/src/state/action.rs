use crate::devices::{CameraId, DeviceKey, DoorId, DoorStatus};
use crate::prelude::{SecurityError, SecurityMode, SecurityResult};
use serde::{Deserialize, Serialize};

/// A validated user action, applied after the tick of a render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SetMode(SecurityMode),
    SetDoor(DoorId, DoorStatus),
    ToggleCamera(CameraId),
    ClearAlerts,
}

/// Action as it arrives from an HTML form or a JSON body.
///
/// `kind` selects the operation; `target` names the door or camera and
/// `value` carries the new mode or door status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ActionRequest {
    pub fn set_mode(mode: SecurityMode) -> Self {
        Action::SetMode(mode).into()
    }

    pub fn set_door(door: DoorId, status: DoorStatus) -> Self {
        Action::SetDoor(door, status).into()
    }

    pub fn toggle_camera(camera: CameraId) -> Self {
        Action::ToggleCamera(camera).into()
    }

    pub fn clear_alerts() -> Self {
        Action::ClearAlerts.into()
    }

    pub fn to_action(&self) -> SecurityResult<Action> {
        match self.kind.as_str() {
            "set_mode" => Ok(Action::SetMode(self.field("value", &self.value)?.parse()?)),
            "set_door" => Ok(Action::SetDoor(
                self.field("target", &self.target)?.parse()?,
                self.field("value", &self.value)?.parse()?,
            )),
            "toggle_camera" => Ok(Action::ToggleCamera(
                self.field("target", &self.target)?.parse()?,
            )),
            "clear_alerts" => Ok(Action::ClearAlerts),
            other => Err(SecurityError::InvalidAction(format!(
                "unknown action kind '{}'",
                other
            ))),
        }
    }

    fn field<'a>(&self, name: &str, field: &'a Option<String>) -> SecurityResult<&'a str> {
        field.as_deref().ok_or_else(|| {
            SecurityError::InvalidAction(format!("{} requires a {}", self.kind, name))
        })
    }
}

impl From<Action> for ActionRequest {
    fn from(action: Action) -> Self {
        let (kind, target, value) = match action {
            Action::SetMode(mode) => ("set_mode", None, Some(mode.as_str())),
            Action::SetDoor(door, status) => {
                ("set_door", Some(door.as_str()), Some(status.as_str()))
            }
            Action::ToggleCamera(camera) => ("toggle_camera", Some(camera.as_str()), None),
            Action::ClearAlerts => ("clear_alerts", None, None),
        };
        Self {
            kind: kind.to_string(),
            target: target.map(str::to_string),
            value: value.map(str::to_string),
        }
    }
}
