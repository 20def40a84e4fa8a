//! Configuration module for costshare
//!
//! - XDG-compliant path resolution
//! - User settings persistence and draft defaults

pub mod paths;
pub mod settings;

pub use paths::CostsharePaths;
pub use settings::Settings;
