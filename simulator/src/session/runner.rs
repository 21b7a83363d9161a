use homecore::state::MotionTransition;
use homecore::telemetry::{LogManager, MetricsSnapshot};
use homecore::{Action, ActionRequest, SecurityResult, SecuritySnapshot, SecurityStateMachine};
use serde::{Deserialize, Serialize};

/// Outcome of one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub motion: MotionTransition,
    pub action: Option<Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub cycles: u64,
    #[serde(flatten)]
    pub counters: MetricsSnapshot,
}

pub struct OfflineSummary {
    pub cycles: u64,
    pub motion_events: usize,
    pub snapshot: SecuritySnapshot,
}

/// One logical user session: the state machine plus its cycle counter.
pub struct Session {
    machine: SecurityStateMachine,
    cycles: u64,
    logger: LogManager,
}

impl Session {
    pub fn new(machine: SecurityStateMachine) -> Self {
        Self {
            machine,
            cycles: 0,
            logger: LogManager::with_target("homesec::session"),
        }
    }

    /// Tick, then apply at most one action.
    ///
    /// The request is validated before anything else runs, so a rejected
    /// request leaves the session untouched.
    pub fn cycle(&mut self, request: Option<&ActionRequest>) -> SecurityResult<CycleReport> {
        let action = match request.map(ActionRequest::to_action).transpose() {
            Ok(action) => action,
            Err(err) => {
                self.logger.reject(&format!("rejected action: {}", err));
                self.machine.telemetry().record_rejected();
                return Err(err);
            }
        };

        let motion = self.machine.simulate_tick();
        if let Some(action) = action {
            self.machine.apply(action);
        }
        self.cycles += 1;

        Ok(CycleReport { motion, action })
    }

    /// Runs `cycles` render cycles, feeding `script` one action per cycle.
    ///
    /// A script longer than `cycles` extends the run so every action lands.
    pub fn run_offline(
        &mut self,
        cycles: usize,
        script: &[ActionRequest],
    ) -> SecurityResult<OfflineSummary> {
        let total = cycles.max(script.len());
        if total > cycles {
            self.logger.record(&format!(
                "script has {} actions, extending run from {} to {} cycles",
                script.len(),
                cycles,
                total
            ));
        }

        let mut motion_events = 0;
        for index in 0..total {
            let report = self.cycle(script.get(index))?;
            if report.motion == MotionTransition::Started {
                motion_events += 1;
            }
        }

        Ok(OfflineSummary {
            cycles: self.cycles,
            motion_events,
            snapshot: self.snapshot(),
        })
    }

    pub fn snapshot(&self) -> SecuritySnapshot {
        self.machine.snapshot()
    }

    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics {
            cycles: self.cycles,
            counters: self.machine.metrics(),
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn machine(&self) -> &SecurityStateMachine {
        &self.machine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecore::devices::{CameraId, DoorId, DoorStatus};
    use homecore::sensors::{FixedClock, ScriptedRandom};
    use homecore::{MachineConfig, SecurityError, SecurityMode};

    fn scripted_session(draws: &[f64]) -> Session {
        let machine = SecurityStateMachine::new(
            MachineConfig::default(),
            Box::new(ScriptedRandom::new(draws.iter().copied())),
            Box::new(FixedClock::at(8, 0, 0)),
        )
        .unwrap();
        Session::new(machine)
    }

    #[test]
    fn cycle_ticks_before_applying_action() {
        let mut session = scripted_session(&[0.05]);
        let request = ActionRequest::set_mode(SecurityMode::ArmedAway);
        let report = session.cycle(Some(&request)).unwrap();

        assert_eq!(report.motion, MotionTransition::Started);
        assert_eq!(report.action, Some(Action::SetMode(SecurityMode::ArmedAway)));

        // Motion was seen while still disarmed, so no alert yet.
        let snapshot = session.snapshot();
        assert!(snapshot.alerts.is_empty());
        assert_eq!(snapshot.activity_log[1].message, "Motion detected");
        assert_eq!(session.cycles(), 1);
    }

    #[test]
    fn rejected_request_leaves_state_unchanged() {
        let mut session = scripted_session(&[0.05]);
        let before = session.snapshot();
        let request = ActionRequest {
            kind: "set_door".into(),
            target: Some("cellar".into()),
            value: Some("open".into()),
        };

        let err = session.cycle(Some(&request)).unwrap_err();
        assert!(matches!(err, SecurityError::InvalidKey { .. }));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.cycles(), 0);
        assert_eq!(session.metrics().counters.rejected, 1);
        assert_eq!(session.metrics().counters.ticks, 0);
    }

    #[test]
    fn offline_run_replays_script() {
        let mut session = scripted_session(&[0.9, 0.9, 0.01]);
        let script = vec![
            ActionRequest::set_mode(SecurityMode::ArmedAway),
            ActionRequest::set_door(DoorId::Back, DoorStatus::Open),
        ];
        let summary = session.run_offline(4, &script).unwrap();

        assert_eq!(summary.cycles, 4);
        assert_eq!(summary.motion_events, 1);
        assert_eq!(summary.snapshot.alerts.len(), 2);
        assert_eq!(summary.snapshot.door(DoorId::Back), Some(DoorStatus::Open));
        assert_eq!(session.metrics().counters.ticks, 4);
    }

    #[test]
    fn short_offline_run_still_applies_whole_script() {
        let mut session = scripted_session(&[0.9, 0.9]);
        let script = vec![
            ActionRequest::set_mode(SecurityMode::ArmedHome),
            ActionRequest::toggle_camera(CameraId::Garage),
        ];
        let summary = session.run_offline(1, &script).unwrap();

        assert_eq!(summary.cycles, 2);
        assert_eq!(session.machine().mode(), SecurityMode::ArmedHome);
        assert!(session.machine().camera(CameraId::Garage));
    }
}
