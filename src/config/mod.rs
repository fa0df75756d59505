//! Configuration module for cashplan
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Allocation and ranking preferences

pub mod paths;
pub mod settings;

pub use paths::CashplanPaths;
pub use settings::Settings;
