use crate::core::draft_store::{DraftStore, GIG_DRAFT_KEY};
use crate::core::validators::{validate_gig, FieldErrors};
use crate::domain::model::GigDraft;
use crate::domain::ports::{Clock, GigApi, KeyValueStore};
use crate::domain::steps::{GigField, Route};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOrigin {
    /// Existing gig fetched from the backend.
    Remote(String),
    /// 尚未送出的本地草稿
    Draft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GigReview {
    pub gig: GigDraft,
    pub origin: ReviewOrigin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    Review(GigReview),
    Redirect {
        route: Route,
        issues: FieldErrors<GigField>,
    },
}

impl Reconciliation {
    pub fn redirect_route(&self) -> Option<Route> {
        match self {
            Reconciliation::Redirect { route, .. } => Some(*route),
            Reconciliation::Review(_) => None,
        }
    }
}

/// Decides what the review screen shows, or where the user must go first.
pub struct ReviewReconciler<'a, S: KeyValueStore, A: GigApi, C: Clock> {
    store: &'a DraftStore<S>,
    api: &'a A,
    clock: &'a C,
    key: String,
}

impl<'a, S: KeyValueStore, A: GigApi, C: Clock> ReviewReconciler<'a, S, A, C> {
    pub fn new(store: &'a DraftStore<S>, api: &'a A, clock: &'a C) -> Self {
        Self {
            store,
            api,
            clock,
            key: GIG_DRAFT_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub async fn reconcile(&self, remote_id: Option<&str>) -> Result<Reconciliation> {
        if let Some(id) = remote_id.map(str::trim).filter(|id| !id.is_empty()) {
            tracing::debug!("🌐 Fetching gig {} for review", id);
            // 後端只會回傳完整的 gig，不做導向檢查
            let gig = self.api.fetch_gig_review(id).await?;
            return Ok(Reconciliation::Review(GigReview {
                gig,
                origin: ReviewOrigin::Remote(id.to_string()),
            }));
        }

        if !self.store.contains(&self.key) {
            tracing::info!("No draft in progress, sending user to {}", Route::GigEntry);
            return Ok(Reconciliation::Redirect {
                route: Route::GigEntry,
                issues: FieldErrors::new(),
            });
        }

        let draft = self.store.load(&self.key, GigDraft::default());
        match validate_gig(&draft, self.clock.now()) {
            Ok(()) => Ok(Reconciliation::Review(GigReview {
                gig: draft,
                origin: ReviewOrigin::Draft,
            })),
            Err(issues) => {
                let route = issues
                    .first()
                    .map(|(field, _)| field.owning_route())
                    .unwrap_or(Route::GigEntry);
                tracing::info!(
                    "↩️ Draft failed review ({} issue(s)), redirecting to {}",
                    issues.len(),
                    route
                );
                Ok(Reconciliation::Redirect { route, issues })
            }
        }
    }
}
