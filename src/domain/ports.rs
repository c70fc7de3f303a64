use crate::domain::model::{GigDraft, PlaceSuggestion, RegisterRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};

/// 同步的鍵值儲存（對應瀏覽器的 localStorage / sessionStorage）
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

#[async_trait]
pub trait GigApi: Send + Sync {
    /// `GET /gigs/{id}/review/`
    async fn fetch_gig_review(&self, id: &str) -> Result<GigDraft>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/register/`
    async fn register(&self, request: &RegisterRequest) -> Result<()>;
}

#[async_trait]
pub trait PlacesApi: Send + Sync {
    async fn autocomplete(&self, input: &str, session_token: &str) -> Result<Vec<PlaceSuggestion>>;
}
