pub mod action;
pub mod activity;
pub mod alerts;
pub mod machine;
pub mod snapshot;

pub use action::{Action, ActionRequest};
pub use activity::{ActivityEntry, ActivityLog};
pub use alerts::AlertBoard;
pub use machine::{MotionTransition, SecurityStateMachine, MOTION_ALERT};
pub use snapshot::{CameraState, DoorState, SecuritySnapshot};
