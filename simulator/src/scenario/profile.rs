use crate::session::config::DashboardConfig;
use crate::session::runner::Session;
use anyhow::Context;
use homecore::sensors::{Clock, RandomSource, SeededRandom, SystemClock, ThreadRandom};
use homecore::SecurityStateMachine;

/// Seeded configs replay the same motion pattern on every run.
pub fn build_random_source(config: &DashboardConfig) -> Box<dyn RandomSource> {
    match config.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

pub fn build_machine_with(
    config: &DashboardConfig,
    random: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
) -> anyhow::Result<SecurityStateMachine> {
    let machine = SecurityStateMachine::new(config.to_machine_config(), random, clock)
        .context("building security state machine")?;
    let cameras = config
        .camera_table()
        .context("resolving initial camera states")?;

    Ok(match cameras {
        Some(cameras) => machine.with_cameras(cameras),
        None => machine,
    })
}

pub fn build_session(config: &DashboardConfig) -> anyhow::Result<Session> {
    let machine = build_machine_with(config, build_random_source(config), Box::new(SystemClock))?;
    Ok(Session::new(machine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use homecore::devices::CameraId;
    use homecore::sensors::FixedClock;
    use std::collections::BTreeMap;

    #[test]
    fn seeded_sessions_replay_identically() {
        let config = DashboardConfig {
            seed: Some(99),
            motion_probability: 0.5,
            ..Default::default()
        };
        let run = || {
            let machine = build_machine_with(
                &config,
                build_random_source(&config),
                Box::new(FixedClock::at(1, 2, 3)),
            )
            .unwrap();
            let mut session = Session::new(machine);
            session.run_offline(30, &[]).unwrap().snapshot
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn configured_cameras_are_applied() {
        let cameras: BTreeMap<String, bool> = [("front_door", false), ("backyard", true), ("garage", false)]
            .into_iter()
            .map(|(name, enabled)| (name.to_string(), enabled))
            .collect();
        let config = DashboardConfig {
            cameras: Some(cameras),
            ..Default::default()
        };
        let session = build_session(&config).unwrap();
        assert!(!session.machine().camera(CameraId::FrontDoor));
        assert!(session.machine().camera(CameraId::Backyard));
    }

    #[test]
    fn invalid_probability_fails_to_build() {
        let config = DashboardConfig {
            motion_probability: f64::NAN,
            ..Default::default()
        };
        assert!(build_session(&config).is_err());
    }
}
