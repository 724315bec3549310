//! Dynamic property surface exposed to page scripts.

use serde_json::Value;

/// Named, dynamically typed properties a page script can read, write, and delete.
///
/// Mirrors the reflective operations a host performs on an injected object so wrappers can
/// intercept them one at a time.
pub trait PropertySurface {
    /// Reads a property; `None` when it does not exist.
    fn get_property(&self, name: &str) -> Option<Value>;

    /// Writes a property and reports whether the write took effect.
    fn set_property(&self, name: &str, value: Value) -> bool;

    /// Deletes a property and reports success the way a host `delete` would.
    fn delete_property(&self, name: &str) -> bool;

    /// Lists the enumerable property names.
    fn property_names(&self) -> Vec<String>;

    /// Returns whether the property exists.
    fn has_property(&self, name: &str) -> bool {
        self.get_property(name).is_some()
    }
}
