use crate::devices::table::{DeviceKey, DeviceTable};
use crate::prelude::SecurityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cameras available to the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CameraId {
    FrontDoor,
    Backyard,
    Garage,
}

impl CameraId {
    pub fn display_name(self) -> &'static str {
        match self {
            CameraId::FrontDoor => "Front door",
            CameraId::Backyard => "Backyard",
            CameraId::Garage => "Garage",
        }
    }
}

impl DeviceKey for CameraId {
    const KIND: &'static str = "camera";
    const ALL: &'static [Self] = &[CameraId::FrontDoor, CameraId::Backyard, CameraId::Garage];

    fn as_str(self) -> &'static str {
        match self {
            CameraId::FrontDoor => "front_door",
            CameraId::Backyard => "backyard",
            CameraId::Garage => "garage",
        }
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraId {
    type Err = SecurityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse_key(value)
    }
}

/// Enabled flag per camera.
pub type CameraTable = DeviceTable<CameraId, bool>;

impl Default for CameraTable {
    fn default() -> Self {
        CameraTable::from_fn(|camera| camera == CameraId::FrontDoor)
    }
}

impl CameraTable {
    /// Flips the camera and returns its new state.
    pub fn toggle(&mut self, camera: CameraId) -> bool {
        let enabled = !*self.get(camera);
        self.replace(camera, enabled);
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn only_front_door_starts_enabled() {
        let cameras = CameraTable::default();
        assert!(*cameras.get(CameraId::FrontDoor));
        assert!(!*cameras.get(CameraId::Backyard));
        assert!(!*cameras.get(CameraId::Garage));
    }

    #[test]
    fn toggle_flips_state() {
        let mut cameras = CameraTable::default();
        assert!(!cameras.toggle(CameraId::FrontDoor));
        assert!(cameras.toggle(CameraId::FrontDoor));
    }

    #[test]
    fn entries_reject_unknown_camera() {
        let entries: BTreeMap<String, bool> = [
            ("front_door", true),
            ("backyard", true),
            ("garage", false),
            ("driveway", true),
        ]
        .into_iter()
        .map(|(name, enabled)| (name.to_string(), enabled))
        .collect();

        let err = CameraTable::from_entries(&entries).unwrap_err();
        assert_eq!(
            err,
            SecurityError::InvalidKey {
                kind: "camera",
                key: "driveway".into()
            }
        );
    }
}
