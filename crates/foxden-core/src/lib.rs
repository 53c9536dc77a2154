//! Core library for foxden - shared fetch pipeline, policy, and profile
//! assembly logic.

pub mod amo;
pub mod build;
pub mod config;
pub mod fetch;
pub mod license;
pub mod prefs;
pub mod profile;
pub mod style;
pub mod verify;

pub use build::build_profile;
pub use config::Manifest;

/// User Agent string for registry and download requests
pub const USER_AGENT: &str = concat!("foxden/", env!("CARGO_PKG_VERSION"));
