use crate::errors::CoreError;

/// Durable string key/value storage for preferences (SOLID: Dependency Inversion).
///
/// Implementations must be synchronous and durable: once `set` or `remove`
/// returns `Ok`, the change survives a process restart. The browser build
/// maps this onto `localStorage`; native builds use [`super::file::FileBackend`].
pub trait PreferenceBackend {
    /// Read a stored value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Delete a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}
