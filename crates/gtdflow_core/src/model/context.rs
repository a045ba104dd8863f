//! Context domain model.
//!
//! # Responsibility
//! - Define the GTD context tag (place/tool/energy-state, e.g. "@phone").
//! - Validate display color as a `#rrggbb` hex value.
//!
//! # Invariants
//! - A context is a pure tag: many items may reference one context, and
//!   removing a context must never invalidate the items that pointed at it
//!   (the schema clears the reference instead).

use super::{UserId, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a context.
pub type ContextId = Uuid;

/// Default display color assigned when the caller supplies none.
pub const DEFAULT_CONTEXT_COLOR: &str = "#6366f1";

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// A label representing where or how an action can be done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: ContextId,
    pub owner_id: UserId,
    pub name: String,
    /// Display color, `#rrggbb`.
    pub color: String,
}

impl Context {
    /// Creates a context, falling back to [`DEFAULT_CONTEXT_COLOR`].
    pub fn new(owner_id: UserId, name: impl Into<String>, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            color: color.unwrap_or_else(|| DEFAULT_CONTEXT_COLOR.to_string()),
        }
    }

    /// Validates field-level constraints before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankContextName);
        }
        if !HEX_COLOR_RE.is_match(&self.color) {
            return Err(ValidationError::InvalidContextColor(self.color.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Context, DEFAULT_CONTEXT_COLOR};
    use crate::model::ValidationError;
    use uuid::Uuid;

    #[test]
    fn new_context_defaults_color() {
        let context = Context::new(Uuid::new_v4(), "@home", None);
        assert_eq!(context.color, DEFAULT_CONTEXT_COLOR);
        context.validate().unwrap();
    }

    #[test]
    fn validate_rejects_malformed_color() {
        let mut context = Context::new(Uuid::new_v4(), "@phone", Some("#ff0000".to_string()));
        context.validate().unwrap();

        context.color = "red".to_string();
        assert!(matches!(
            context.validate(),
            Err(ValidationError::InvalidContextColor(_))
        ));

        context.color = "#ff00".to_string();
        assert!(context.validate().is_err());
    }
}
