//! Async HTTP client wrapping reqwest.
//!
//! Single attempt per request: no retry, no backoff, and no timeout beyond
//! what the transport does by default.

use crate::error::ScrapeResult;
use reqwest::header::USER_AGENT;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for listing and product pages.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a client. `user_agent` is only sent by [`HttpClient::get_as_browser`].
    pub fn new(user_agent: impl Into<String>) -> ScrapeResult<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }

    /// Plain GET with reqwest's default headers.
    pub async fn get(&self, url: &str) -> ScrapeResult<HttpResponse> {
        self.send(self.client.get(url), url).await
    }

    /// GET with the browser-identifying `User-Agent` header.
    pub async fn get_as_browser(&self, url: &str) -> ScrapeResult<HttpResponse> {
        let request = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str());
        self.send(request, url).await
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> ScrapeResult<HttpResponse> {
        let r = request.send().await?;
        let status = r.status().as_u16();
        let body = r.text().await?;

        tracing::debug!(url, status, bytes = body.len(), "fetched");

        Ok(HttpResponse { status, body })
    }
}
