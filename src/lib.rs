//! Version update checking for applications and plugins
//!
//! See [`version`] for the engine and [`config`] for tunables.

pub mod config;
pub mod logging;
pub mod version;
