use std::fmt;
use std::sync::{Arc, RwLock};

/// Shared, replaceable API key.
///
/// The client reads it on every request so a key picked after startup (or
/// after the old one was rejected) takes effect on the next call.
#[derive(Clone, Default)]
pub struct ApiKey {
    inner: Arc<RwLock<Option<String>>>,
}

impl ApiKey {
    pub fn new(key: Option<String>) -> Self {
        let key = key.filter(|k| !k.trim().is_empty());
        Self {
            inner: Arc::new(RwLock::new(key)),
        }
    }

    pub fn get(&self) -> Option<String> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, key: impl Into<String>) {
        let key = key.into();
        let value = if key.trim().is_empty() { None } else { Some(key) };
        match self.inner.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_set() { "<redacted>" } else { "<unset>" };
        f.debug_tuple("ApiKey").field(&state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_key() {
        let key = ApiKey::new(None);
        let other = key.clone();
        assert!(!other.is_set());

        key.set("secret");
        assert_eq!(other.get().as_deref(), Some("secret"));
    }

    #[test]
    fn test_blank_keys_count_as_unset() {
        assert!(!ApiKey::new(Some("  ".into())).is_set());

        let key = ApiKey::new(Some("k".into()));
        key.set("");
        assert!(!key.is_set());
    }

    #[test]
    fn test_debug_never_prints_the_key() {
        let key = ApiKey::new(Some("hunter2".into()));
        assert!(!format!("{key:?}").contains("hunter2"));
    }
}
