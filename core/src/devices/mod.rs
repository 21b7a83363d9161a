pub mod camera;
pub mod door;
pub mod table;

pub use camera::{CameraId, CameraTable};
pub use door::{DoorId, DoorStatus, DoorTable};
pub use table::{DeviceKey, DeviceTable};
