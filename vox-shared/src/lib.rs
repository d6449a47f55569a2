pub mod collision;
pub mod config;
pub mod logging;
pub mod shape;
pub mod voxel;
