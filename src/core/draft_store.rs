use crate::domain::ports::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 建立 Gig 的草稿 key，與其他 wizard 區隔
pub const GIG_DRAFT_KEY: &str = "create-gig-data";
/// 註冊角色（session 範圍）
pub const SIGN_UP_ROLE_KEY: &str = "signUpRole";

/// JSON persistence over a key-value store. Read and write failures are
/// logged and otherwise swallowed: a failed load yields the initial value and
/// a failed save leaves the caller's in-memory state untouched.
#[derive(Debug, Clone)]
pub struct DraftStore<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str, initial: T) -> T {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return initial,
            Err(e) => {
                tracing::warn!("⚠️ Failed to read draft '{}': {}", key, e);
                return initial;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("⚠️ Discarding unreadable draft '{}': {}", key, e);
                initial
            }
        }
    }

    /// `true` when present and readable.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.storage.get(key), Ok(Some(_)))
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("⚠️ Failed to serialize draft '{}': {}", key, e);
                return false;
            }
        };

        match self.storage.set(key, &raw) {
            Ok(()) => {
                tracing::debug!("💾 Saved draft '{}' ({} bytes)", key, raw.len());
                true
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to persist draft '{}': {}", key, e);
                false
            }
        }
    }

    pub fn clear(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::warn!("⚠️ Failed to clear draft '{}': {}", key, e);
        } else {
            tracing::debug!("🧹 Cleared draft '{}'", key);
        }
    }
}
