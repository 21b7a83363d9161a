//! Core state machine for the home security dashboard simulation.
//!
//! The modules keep all session state (mode, doors, cameras, motion, alerts
//! and the activity log) behind a single owning [`SecurityStateMachine`],
//! with randomness and wall-clock time injected through small traits so hosts
//! and tests control both.

pub mod devices;
pub mod prelude;
pub mod sensors;
pub mod state;
pub mod telemetry;

pub use prelude::{LogKind, MachineConfig, SecurityError, SecurityMode, SecurityResult};
pub use state::{Action, ActionRequest, SecuritySnapshot, SecurityStateMachine};
