use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Display;

pub const KEY_DEFAULT_COLLAPSE_SIDEBAR: &str = "default_collapse_sidebar";
pub const KEY_ENABLE_DATA_EXPORT: &str = "enable_data_export";
pub const KEY_ENABLE_DRAWING: &str = "enable_drawing";
pub const KEY_ENABLE_TASK: &str = "enable_task";
pub const KEY_CHAT_LINK: &str = "chat_link";
pub const KEY_CHAT_LINK_SECONDARY: &str = "chat_link2";
pub const KEY_CHATS: &str = "chats";
pub const KEY_USER: &str = "user";

/// Persisted key/value store shared by the console.
///
/// Implementations use interior mutability so the controller and the host
/// page can hold the same store without exclusive borrows, matching how a
/// browser `localStorage` handle behaves.
pub trait PreferenceStore {
    type Error: Display;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for std::rc::Rc<S> {
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }
}

/// Reads a key, treating backend failures as an absent value.
pub fn read_preference<S: PreferenceStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, error = %error, "preference read failed");
            None
        }
    }
}

/// Reads a key and drops blank values, the way the console treats an
/// empty string as "not set".
pub fn read_non_empty<S: PreferenceStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    read_preference(store, key).filter(|value| !value.trim().is_empty())
}

/// Flags are only on when the stored string is exactly `"true"`.
pub fn read_flag<S: PreferenceStore + ?Sized>(store: &S, key: &str) -> bool {
    read_preference(store, key).as_deref() == Some("true")
}

pub fn write_preference<S: PreferenceStore + ?Sized>(store: &S, key: &str, value: &str) {
    if let Err(error) = store.set(key, value) {
        tracing::warn!(key, error = %error, "preference write failed");
    }
}

pub fn remove_preference<S: PreferenceStore + ?Sized>(store: &S, key: &str) {
    if let Err(error) = store.remove(key) {
        tracing::warn!(key, error = %error, "preference remove failed");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("preference store is read-only")]
    ReadOnly,
}

/// In-memory store for tests and hosts without persistence.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RefCell<BTreeMap<String, String>>,
    read_only: bool,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: RefCell::new(entries),
            read_only: false,
        }
    }

    /// Rejects writes; reads still succeed.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    type Error = MemoryStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        if self.read_only {
            return Err(MemoryStoreError::ReadOnly);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        if self.read_only {
            return Err(MemoryStoreError::ReadOnly);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
