pub mod config;
pub mod paths;
pub mod setup;
pub mod status;
pub mod verify;
