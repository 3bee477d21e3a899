//! Library side of the pinlog command line tool

pub mod logging;
pub mod monitor;
pub mod system_config;

pub use system_config::PinlogConfig;
