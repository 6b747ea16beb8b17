//! Configuration types for the leave engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the engine's YAML configuration file. Every
//! section has defaults, so a partial file is valid.

use serde::{Deserialize, Serialize};

/// Site recorded on audit events that are not tied to an employee.
pub const DEFAULT_AUDIT_SITE: &str = "General";

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Application identity.
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Application identity and defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplicationConfig {
    /// Name used as the `portion` of every audit event.
    #[serde(default = "default_application_name")]
    pub name: String,
    /// Site recorded on audit events with no employee attached.
    #[serde(default = "default_site")]
    pub default_site: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_application_name(),
            default_site: default_site(),
        }
    }
}

fn default_application_name() -> String {
    "scheduler".to_string()
}

fn default_site() -> String {
    DEFAULT_AUDIT_SITE.to_string()
}

/// How much of the audit trail is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditLevel {
    /// Everything except debug-category events.
    #[default]
    Minimal,
    /// Every event, including debug-category events.
    Debug,
}

/// Category of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditCategory {
    /// Diagnostic detail, only recorded at [`AuditLevel::Debug`].
    Debug,
    /// A record was created or changed.
    Info,
    /// An operation was refused.
    Error,
}

impl std::fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditCategory::Debug => write!(f, "debug"),
            AuditCategory::Info => write!(f, "info"),
            AuditCategory::Error => write!(f, "error"),
        }
    }
}

/// Audit trail settings.
///
/// Passed explicitly to each audit sink; nothing is read from the
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    /// Recording level.
    #[serde(default)]
    pub level: AuditLevel,
}

impl AuditConfig {
    /// Creates a configuration at the given level.
    pub fn new(level: AuditLevel) -> Self {
        Self { level }
    }

    /// Returns true if events of `category` are recorded.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::config::{AuditCategory, AuditConfig, AuditLevel};
    ///
    /// let minimal = AuditConfig::new(AuditLevel::Minimal);
    /// assert!(minimal.records(AuditCategory::Info));
    /// assert!(!minimal.records(AuditCategory::Debug));
    /// assert!(AuditConfig::new(AuditLevel::Debug).records(AuditCategory::Debug));
    /// ```
    pub fn records(&self, category: AuditCategory) -> bool {
        category != AuditCategory::Debug || self.level == AuditLevel::Debug
    }
}
