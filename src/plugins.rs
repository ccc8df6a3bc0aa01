pub mod camera;
pub mod control_mode;
pub mod controls;
pub mod fullscreen;
pub mod gyro_camera;
pub mod panorama;
pub mod permission;
pub mod sensor;
pub mod viewer;
