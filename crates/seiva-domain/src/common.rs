//! Shared traits and identifier helpers for school records.

use uuid::Uuid;

/// Exposes the caller-supplied identifier of a stored record.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Generates a fresh random identifier for records created by frontends.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
