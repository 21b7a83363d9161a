use crate::devices::{CameraId, CameraTable, DoorId, DoorStatus, DoorTable};
use crate::prelude::{LogKind, MachineConfig, SecurityMode, SecurityResult};
use crate::sensors::{Clock, RandomSource};
use crate::state::action::Action;
use crate::state::activity::{ActivityEntry, ActivityLog};
use crate::state::alerts::AlertBoard;
use crate::state::snapshot::{CameraState, DoorState, SecuritySnapshot};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

pub const MOTION_ALERT: &str = "Security alert: Motion detected while system armed away!";

/// Edge observed on the motion flag during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionTransition {
    Started,
    Stopped,
    Steady,
}

/// Owns every piece of mutable session state and the transitions over it.
pub struct SecurityStateMachine {
    config: MachineConfig,
    mode: SecurityMode,
    doors: DoorTable,
    cameras: CameraTable,
    motion: bool,
    alerts: AlertBoard,
    activity: ActivityLog,
    last_update: String,
    random: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl SecurityStateMachine {
    pub fn new(
        config: MachineConfig,
        random: Box<dyn RandomSource>,
        mut clock: Box<dyn Clock>,
    ) -> SecurityResult<Self> {
        config.validate()?;
        let last_update = clock.stamp();
        Ok(Self {
            activity: ActivityLog::with_capacity(config.log_capacity),
            config,
            mode: SecurityMode::Disarmed,
            doors: DoorTable::default(),
            cameras: CameraTable::default(),
            motion: false,
            alerts: AlertBoard::default(),
            last_update,
            random,
            clock,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        })
    }

    /// Replaces the initial camera states.
    pub fn with_cameras(mut self, cameras: CameraTable) -> Self {
        self.cameras = cameras;
        self
    }

    /// One probabilistic evaluation of the motion sensor.
    pub fn simulate_tick(&mut self) -> MotionTransition {
        let detected = self.random.next_unit() < self.config.motion_probability;
        let transition = match (self.motion, detected) {
            (false, true) => MotionTransition::Started,
            (true, false) => MotionTransition::Stopped,
            _ => MotionTransition::Steady,
        };
        self.motion = detected;

        if transition == MotionTransition::Started {
            self.logger.record("motion sensor tripped");
            self.append_log("Motion detected", LogKind::Motion);
            if self.mode == SecurityMode::ArmedAway && self.alerts.raise_once(MOTION_ALERT) {
                self.metrics.record_alert();
                self.logger.record(MOTION_ALERT);
            }
        }

        self.last_update = self.clock.stamp();
        self.metrics
            .record_tick(transition == MotionTransition::Started);
        transition
    }

    /// Always logs, even when `mode` is already active.
    pub fn set_mode(&mut self, mode: SecurityMode) {
        let old = std::mem::replace(&mut self.mode, mode);
        self.logger
            .record(&format!("security mode {} -> {}", old, mode));
        self.metrics.record_transition();
        self.append_log(
            format!("Security system changed from {} to {}", old, mode),
            LogKind::Security,
        );
    }

    /// Opening a door while armed raises an alert on every call.
    pub fn set_door(&mut self, door: DoorId, status: DoorStatus) {
        let old = self.doors.replace(door, status);
        self.logger
            .record(&format!("{} door {} -> {}", door, old, status));
        self.metrics.record_transition();
        self.append_log(format!("{} door {}", door, status), LogKind::Security);

        if status.is_open() && self.mode.is_armed() {
            let alert = format!("Security alert: {} door opened while system armed!", door);
            self.logger.record(&alert);
            self.metrics.record_alert();
            self.alerts.raise(alert.clone());
            self.append_log(alert, LogKind::Alert);
        }
    }

    /// Returns the camera's new enabled state.
    pub fn toggle_camera(&mut self, camera: CameraId) -> bool {
        let enabled = self.cameras.toggle(camera);
        let verb = if enabled { "activated" } else { "deactivated" };
        self.logger.record(&format!("{} camera {}", camera, verb));
        self.metrics.record_transition();
        self.append_log(format!("{} camera {}", camera, verb), LogKind::Security);
        enabled
    }

    /// Returns how many alerts were dismissed.
    pub fn clear_alerts(&mut self) -> usize {
        let cleared = self.alerts.clear();
        self.logger.record(&format!("cleared {} alerts", cleared));
        self.metrics.record_transition();
        self.append_log("All alerts cleared", LogKind::System);
        cleared
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetMode(mode) => self.set_mode(mode),
            Action::SetDoor(door, status) => self.set_door(door, status),
            Action::ToggleCamera(camera) => {
                self.toggle_camera(camera);
            }
            Action::ClearAlerts => {
                self.clear_alerts();
            }
        }
    }

    pub fn append_log(&mut self, message: impl Into<String>, kind: LogKind) {
        let entry = ActivityEntry {
            message: message.into(),
            time: self.clock.stamp(),
            kind,
        };
        let evicted = self.activity.push(entry);
        if evicted > 0 {
            self.metrics.record_evicted(evicted);
        }
    }

    pub fn snapshot(&self) -> SecuritySnapshot {
        SecuritySnapshot {
            mode: self.mode,
            doors: self
                .doors
                .iter()
                .map(|(id, status)| DoorState {
                    id,
                    status: *status,
                })
                .collect(),
            cameras: self
                .cameras
                .iter()
                .map(|(id, enabled)| CameraState {
                    id,
                    enabled: *enabled,
                })
                .collect(),
            motion: self.motion,
            alerts: self.alerts.as_slice().to_vec(),
            activity_log: self.activity.to_vec(),
            last_update: self.last_update.clone(),
        }
    }

    pub fn mode(&self) -> SecurityMode {
        self.mode
    }

    pub fn door(&self, door: DoorId) -> DoorStatus {
        *self.doors.get(door)
    }

    pub fn camera(&self, camera: CameraId) -> bool {
        *self.cameras.get(camera)
    }

    pub fn motion(&self) -> bool {
        self.motion
    }

    pub fn alerts(&self) -> &[String] {
        self.alerts.as_slice()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn last_update(&self) -> &str {
        &self.last_update
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn telemetry(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
