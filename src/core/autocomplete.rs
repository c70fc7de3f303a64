use crate::domain::model::PlaceSuggestion;
use crate::domain::ports::PlacesApi;
use crate::utils::error::Result;
use uuid::Uuid;

/// A query issued by [`SuggestionFeed::query`]. Only the latest ticket's
/// response is ever applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
    input: String,
    session_token: String,
}

impl QueryTicket {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub async fn fetch<P: PlacesApi + ?Sized>(&self, api: &P) -> Result<Vec<PlaceSuggestion>> {
        api.autocomplete(&self.input, &self.session_token).await
    }
}

/// 地點自動完成的建議清單狀態
#[derive(Debug, Clone)]
pub struct SuggestionFeed {
    session_token: Option<String>,
    issued: u64,
    suggestions: Vec<PlaceSuggestion>,
    loading: bool,
}

impl Default for SuggestionFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionFeed {
    pub fn new() -> Self {
        Self {
            session_token: None,
            issued: 0,
            suggestions: Vec::new(),
            loading: false,
        }
    }

    pub fn suggestions(&self) -> &[PlaceSuggestion] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts a lookup for `input`. Empty input clears the list and
    /// returns None; any in-flight ticket becomes stale either way.
    pub fn query(&mut self, input: &str) -> Option<QueryTicket> {
        self.issued += 1;

        if input.is_empty() {
            self.suggestions.clear();
            self.loading = false;
            return None;
        }

        let session_token = self
            .session_token
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        self.loading = true;

        Some(QueryTicket {
            generation: self.issued,
            input: input.to_string(),
            session_token,
        })
    }

    /// Applies a response. Returns false when the ticket was superseded.
    pub fn resolve(&mut self, ticket: &QueryTicket, result: Result<Vec<PlaceSuggestion>>) -> bool {
        if ticket.generation != self.issued {
            tracing::debug!("Dropping stale suggestions for '{}'", ticket.input);
            return false;
        }

        self.loading = false;
        match result {
            Ok(suggestions) => {
                tracing::debug!("📍 {} suggestion(s) for '{}'", suggestions.len(), ticket.input);
                self.suggestions = suggestions;
            }
            Err(e) => {
                tracing::warn!("⚠️ Place autocomplete failed: {}", e);
                self.suggestions.clear();
            }
        }
        true
    }

    /// 選定地點後結束本次計費 session
    pub fn reset_session(&mut self) {
        self.issued += 1;
        self.session_token = None;
        self.suggestions.clear();
        self.loading = false;
    }

    /// Runs one query end to end against `api`.
    pub async fn refresh<P: PlacesApi + ?Sized>(&mut self, api: &P, input: &str) -> &[PlaceSuggestion] {
        if let Some(ticket) = self.query(input) {
            let result = ticket.fetch(api).await;
            self.resolve(&ticket, result);
        }
        &self.suggestions
    }
}
