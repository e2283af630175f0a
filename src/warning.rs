//! Non-fatal diagnostics collected while building and rendering rigs.

use std::fmt;

/// A warning generated while building components or assembling frames.
///
/// In strict mode callers turn these into errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    /// Component the warning is about
    pub component: String,
    pub message: String,
}

impl Warning {
    pub fn for_component(component: &str, message: impl Into<String>) -> Self {
        Self { component: component.to_string(), message: message.into() }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component '{}': {}", self.component, self.message)
    }
}
