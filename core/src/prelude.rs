use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Armed state of the security system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecurityMode {
    #[default]
    Disarmed,
    ArmedHome,
    ArmedAway,
}

impl SecurityMode {
    pub const ALL: [SecurityMode; 3] = [
        SecurityMode::Disarmed,
        SecurityMode::ArmedHome,
        SecurityMode::ArmedAway,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SecurityMode::Disarmed => "disarmed",
            SecurityMode::ArmedHome => "armed_home",
            SecurityMode::ArmedAway => "armed_away",
        }
    }

    /// Human-facing label used by dashboards.
    pub fn label(self) -> &'static str {
        match self {
            SecurityMode::Disarmed => "Disarmed",
            SecurityMode::ArmedHome => "Armed (Home)",
            SecurityMode::ArmedAway => "Armed (Away)",
        }
    }

    pub fn is_armed(self) -> bool {
        self != SecurityMode::Disarmed
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityMode {
    type Err = SecurityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SecurityMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .ok_or_else(|| SecurityError::InvalidMode(value.to_string()))
    }
}

/// Category attached to every activity log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Info,
    Security,
    Motion,
    Alert,
    System,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Info => "info",
            LogKind::Security => "security",
            LogKind::Motion => "motion",
            LogKind::Alert => "alert",
            LogKind::System => "system",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunables for a single state machine instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineConfig {
    pub motion_probability: f64,
    pub log_capacity: usize,
}

impl MachineConfig {
    pub fn validate(&self) -> SecurityResult<()> {
        if !(0.0..=1.0).contains(&self.motion_probability) {
            return Err(SecurityError::InvalidConfig(format!(
                "motion_probability must be within [0, 1], got {}",
                self.motion_probability
            )));
        }
        if self.log_capacity == 0 {
            return Err(SecurityError::InvalidConfig(
                "log_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            motion_probability: 0.15,
            log_capacity: 8,
        }
    }
}

/// Errors surfaced to callers of the state machine and its parsers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("unknown {kind} identifier: {key}")]
    InvalidKey { kind: &'static str, key: String },
    #[error("missing {kind} identifier: {key}")]
    MissingKey { kind: &'static str, key: &'static str },
    #[error("unknown security mode: {0}")]
    InvalidMode(String),
    #[error("unknown door status: {0}")]
    InvalidStatus(String),
    #[error("malformed action: {0}")]
    InvalidAction(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SecurityResult<T> = Result<T, SecurityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_wire_names() {
        for mode in SecurityMode::ALL {
            assert_eq!(mode.as_str().parse::<SecurityMode>().unwrap(), mode);
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "armed_vacation".parse::<SecurityMode>().unwrap_err();
        assert_eq!(err, SecurityError::InvalidMode("armed_vacation".into()));
    }

    #[test]
    fn config_rejects_out_of_range_probability() {
        let cfg = MachineConfig {
            motion_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SecurityError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_rejects_zero_capacity() {
        let cfg = MachineConfig {
            log_capacity: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        assert!(MachineConfig::default().validate().is_ok());
    }
}
