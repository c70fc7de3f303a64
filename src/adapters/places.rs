use crate::adapters::http::{check_status, transport_error};
use crate::domain::model::PlaceSuggestion;
use crate::domain::ports::PlacesApi;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PLACES_ENDPOINT: &str = "https://places.googleapis.com/v1/places:autocomplete";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AutocompleteRequest<'a> {
    input: &'a str,
    session_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AutocompleteResponse {
    #[serde(default)]
    suggestions: Vec<SuggestionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionEntry {
    place_prediction: Option<PlacePrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacePrediction {
    place_id: String,
    text: FormattedText,
}

#[derive(Debug, Deserialize)]
struct FormattedText {
    text: String,
}

/// Places autocomplete over HTTP.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(api_key: impl Into<String>, endpoint: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_PLACES_ENDPOINT.to_string()),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PlacesApi for PlacesClient {
    async fn autocomplete(&self, input: &str, session_token: &str) -> Result<Vec<PlaceSuggestion>> {
        tracing::debug!("Fetching place suggestions for: {}", input);
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Goog-Api-Key", &self.api_key)
            .json(&AutocompleteRequest {
                input,
                session_token,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let body: AutocompleteResponse = check_status(response).await?.json().await?;

        // 只保留地點預測，略過純文字查詢建議
        Ok(body
            .suggestions
            .into_iter()
            .filter_map(|entry| entry.place_prediction)
            .map(|prediction| PlaceSuggestion {
                place_id: prediction.place_id,
                text: prediction.text.text,
            })
            .collect())
    }
}
