//! Streamwatch application: configuration, monitoring controller and loop,
//! command surface, and the liveness endpoint.
pub mod commands;
pub mod config;
pub mod health;
pub mod logging;
pub mod monitor;
