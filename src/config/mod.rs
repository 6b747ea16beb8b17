//! Configuration loading and management for the leave engine.
//!
//! This module loads the engine's YAML configuration: application identity
//! and the audit trail settings handed to audit sinks.
//!
//! # Example
//!
//! ```no_run
//! use leave_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/engine.yaml").unwrap();
//! println!("Loaded: {}", config.application().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ApplicationConfig, AuditCategory, AuditConfig, AuditLevel, DEFAULT_AUDIT_SITE, EngineConfig,
};
