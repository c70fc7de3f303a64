use crate::domain::model::{GigDraft, RegisterRequest};
use crate::domain::ports::{AuthApi, GigApi};
use crate::utils::error::{Result, WizardError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// REST client for the gig marketplace backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // 確保相對路徑 join 時不會吃掉最後一段
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(transport_error)?;
        tracing::debug!("API response status: {}", response.status());
        check_status(response).await
    }
}

/// Connectivity failures become `NetworkError`; the rest stay `ApiError`.
pub(crate) fn transport_error(e: reqwest::Error) -> WizardError {
    if e.is_connect() || e.is_timeout() {
        WizardError::NetworkError {
            message: e.to_string(),
        }
    } else {
        WizardError::ApiError(e)
    }
}

/// Non-2xx responses become `HttpStatusError` carrying the decoded body.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    Err(WizardError::HttpStatusError {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let url = self.endpoint("auth/register/")?;
        tracing::debug!("Making API request to: {}", url);
        self.send(self.client.post(url).json(request)).await?;
        Ok(())
    }
}

#[async_trait]
impl GigApi for ApiClient {
    async fn fetch_gig_review(&self, id: &str) -> Result<GigDraft> {
        let url = self.endpoint(&format!("gigs/{}/review/", id))?;
        tracing::debug!("Making API request to: {}", url);
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }
}
