use crate::devices::table::{DeviceKey, DeviceTable};
use crate::prelude::{SecurityError, SecurityResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Doors wired into the simulated house.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DoorId {
    Main,
    Garage,
    Back,
}

impl DoorId {
    pub fn display_name(self) -> &'static str {
        match self {
            DoorId::Main => "Main",
            DoorId::Garage => "Garage",
            DoorId::Back => "Back",
        }
    }
}

impl DeviceKey for DoorId {
    const KIND: &'static str = "door";
    const ALL: &'static [Self] = &[DoorId::Main, DoorId::Garage, DoorId::Back];

    fn as_str(self) -> &'static str {
        match self {
            DoorId::Main => "main",
            DoorId::Garage => "garage",
            DoorId::Back => "back",
        }
    }
}

impl fmt::Display for DoorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoorId {
    type Err = SecurityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse_key(value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DoorStatus {
    Open,
    #[default]
    Closed,
}

impl DoorStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DoorStatus::Open => "open",
            DoorStatus::Closed => "closed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DoorStatus::Open => "Open",
            DoorStatus::Closed => "Closed",
        }
    }

    pub fn is_open(self) -> bool {
        self == DoorStatus::Open
    }
}

impl fmt::Display for DoorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoorStatus {
    type Err = SecurityError;

    fn from_str(value: &str) -> SecurityResult<Self> {
        match value {
            "open" => Ok(DoorStatus::Open),
            "closed" => Ok(DoorStatus::Closed),
            other => Err(SecurityError::InvalidStatus(other.to_string())),
        }
    }
}

pub type DoorTable = DeviceTable<DoorId, DoorStatus>;

impl Default for DoorTable {
    fn default() -> Self {
        DoorTable::from_fn(|_| DoorStatus::Closed)
    }
}
