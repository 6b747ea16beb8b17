//! Audit trail for engine operations.
//!
//! Operations that change an employee's records emit an [`AuditEvent`]
//! through an [`AuditSink`]. Sinks receive their [`AuditConfig`] when they
//! are built and filter on it; nothing is read from the environment.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AuditCategory, AuditConfig, DEFAULT_AUDIT_SITE};
use crate::models::Employee;

/// One entry in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    /// Unique id of the event.
    pub id: Uuid,
    /// When the event was raised.
    pub timestamp: DateTime<Utc>,
    /// The part of the application that raised it.
    pub portion: String,
    /// Event category.
    pub category: AuditCategory,
    /// Short title, e.g. "Leave Request Approved".
    pub title: String,
    /// Free-text detail.
    pub message: String,
    /// The employee concerned, as `Last, First`; empty if none.
    pub employee: String,
    /// The employee's site, or the default site when there is none.
    pub site: String,
}

impl AuditEvent {
    /// Creates an event not tied to any employee.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_engine::audit::AuditEvent;
    /// use leave_engine::config::AuditCategory;
    ///
    /// let event = AuditEvent::new("scheduler", AuditCategory::Info, "Startup", "ready");
    /// assert_eq!(event.site, "General");
    /// assert!(event.employee.is_empty());
    /// ```
    pub fn new(portion: &str, category: AuditCategory, title: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            portion: portion.to_string(),
            category,
            title: title.to_string(),
            message: message.to_string(),
            employee: String::new(),
            site: DEFAULT_AUDIT_SITE.to_string(),
        }
    }

    /// Attaches the employee the event concerns, taking their site.
    pub fn for_employee(mut self, employee: &Employee) -> Self {
        self.employee = employee.name.last_first();
        if !employee.site_id.is_empty() {
            self.site = employee.site_id.clone();
        }
        self
    }

    /// Overrides the site recorded when no employee site applies.
    pub fn with_site(mut self, site: &str) -> Self {
        self.site = site.to_string();
        self
    }

    /// The event as a JSON value, for sinks that forward structured detail.
    pub fn details(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id.to_string(),
            "timestamp": self.timestamp.to_rfc3339(),
            "portion": self.portion,
            "category": self.category.to_string(),
            "title": self.title,
            "message": self.message,
            "employee": self.employee,
            "site": self.site,
        })
    }
}

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records `event` if the sink's configuration accepts its category.
    fn record(&self, event: AuditEvent);
}

/// Writes audit events to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink {
    config: AuditConfig,
}

impl TracingAuditSink {
    /// Creates a sink filtering on `config`.
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        if !self.config.records(event.category) {
            return;
        }
        match event.category {
            AuditCategory::Debug => debug!(
                portion = %event.portion,
                employee = %event.employee,
                site = %event.site,
                title = %event.title,
                "{}",
                event.message
            ),
            AuditCategory::Info => info!(
                portion = %event.portion,
                employee = %event.employee,
                site = %event.site,
                title = %event.title,
                "{}",
                event.message
            ),
            AuditCategory::Error => warn!(
                portion = %event.portion,
                employee = %event.employee,
                site = %event.site,
                title = %event.title,
                "{}",
                event.message
            ),
        }
    }
}

/// Keeps audit events in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    config: AuditConfig,
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink filtering on `config`.
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            events: RwLock::new(Vec::new()),
        }
    }

    /// A copy of the recorded events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        if !self.config.records(event.category) {
            return;
        }
        if let Ok(mut events) = self.events.write() {
            events.push(event);
        }
    }
}
