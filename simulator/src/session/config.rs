use anyhow::Context;
use homecore::devices::CameraTable;
use homecore::{ActionRequest, MachineConfig, SecurityResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

/// Host-level settings for one dashboard process.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub bind: SocketAddr,
    pub motion_probability: f64,
    pub log_capacity: usize,
    pub seed: Option<u64>,
    /// Initial camera states; must name every camera.
    pub cameras: Option<BTreeMap<String, bool>>,
    pub refresh_secs: u64,
    /// Actions replayed one per cycle by offline runs.
    pub script: Vec<ActionRequest>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let machine = MachineConfig::default();
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            motion_probability: machine.motion_probability,
            log_capacity: machine.log_capacity,
            seed: None,
            cameras: None,
            refresh_secs: 2,
            script: Vec::new(),
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        bind: SocketAddr,
        motion_probability: f64,
        log_capacity: usize,
        seed: Option<u64>,
        refresh_secs: u64,
    ) -> Self {
        Self {
            bind,
            motion_probability,
            log_capacity,
            seed,
            refresh_secs,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> SecurityResult<()> {
        self.to_machine_config().validate()?;
        self.camera_table()?;
        for request in &self.script {
            request.to_action()?;
        }
        Ok(())
    }

    pub fn to_machine_config(&self) -> MachineConfig {
        MachineConfig {
            motion_probability: self.motion_probability,
            log_capacity: self.log_capacity,
        }
    }

    pub fn camera_table(&self) -> SecurityResult<Option<CameraTable>> {
        self.cameras
            .as_ref()
            .map(CameraTable::from_entries)
            .transpose()
    }
}
