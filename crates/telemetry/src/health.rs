//! Health state of the record store and the spreadsheet mirror.

use parking_lot::RwLock;
use serde::Serialize;

/// Observed state of one data sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    /// Not checked yet.
    Unknown,
    Healthy,
    Unhealthy,
    /// Not configured in this process.
    Disabled,
}

#[derive(Debug)]
struct ComponentInner {
    state: ComponentState,
    message: Option<String>,
}

/// Health of a single component.
#[derive(Debug)]
pub struct ComponentHealth {
    name: &'static str,
    inner: RwLock<ComponentInner>,
}

impl ComponentHealth {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(ComponentInner {
                state: ComponentState::Unknown,
                message: None,
            }),
        }
    }

    pub fn set_healthy(&self) {
        let mut inner = self.inner.write();
        inner.state = ComponentState::Healthy;
        inner.message = None;
    }

    pub fn set_unhealthy(&self, msg: impl Into<String>) {
        let mut inner = self.inner.write();
        inner.state = ComponentState::Unhealthy;
        inner.message = Some(msg.into());
    }

    pub fn set_disabled(&self) {
        let mut inner = self.inner.write();
        inner.state = ComponentState::Disabled;
        inner.message = None;
    }

    pub fn state(&self) -> ComponentState {
        self.inner.read().state
    }

    pub fn is_healthy(&self) -> bool {
        self.state() == ComponentState::Healthy
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> Option<String> {
        self.inner.read().message.clone()
    }

    pub fn report(&self) -> ComponentHealthReport {
        let inner = self.inner.read();
        ComponentHealthReport {
            name: self.name.to_string(),
            state: inner.state,
            message: inner.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealthReport {
    pub name: String,
    pub state: ComponentState,
    pub message: Option<String>,
}

/// Health registry for the two data sinks.
pub struct HealthRegistry {
    pub store: ComponentHealth,
    pub mirror: ComponentHealth,
}

impl HealthRegistry {
    pub const fn new() -> Self {
        Self {
            store: ComponentHealth::new("store"),
            mirror: ComponentHealth::new("mirror"),
        }
    }

    pub fn report(&self) -> Vec<ComponentHealthReport> {
        vec![self.store.report(), self.mirror.report()]
    }
}

impl Default for HealthRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global health registry.
pub static HEALTH: HealthRegistry = HealthRegistry::new();

/// Get the global health registry.
pub fn health() -> &'static HealthRegistry {
    &HEALTH
}
