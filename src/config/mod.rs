//! Configuration module for StokWELL
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::StokwellPaths;
pub use settings::Settings;
