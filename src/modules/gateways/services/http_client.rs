use crate::config::HttpClientConfig;
use crate::core::{AppError, Result};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{
    policies::ExponentialBackoff, Retryable, RetryableStrategy, RetryTransientMiddleware,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

/// How a request to a provider authenticates
#[derive(Debug, Clone, Copy)]
pub enum Credentials<'a> {
    None,
    Bearer(&'a str),
    Basic { username: &'a str, password: &'a str },
    /// Provider-specific header such as `X-Token`
    Header { name: &'a str, value: &'a str },
    /// Pre-built `Authorization` header value
    Authorization(&'a str),
}

/// Retry only requests that never reached the provider
///
/// Any HTTP status is final and so is a timeout: the provider may already
/// have executed the POST.
struct ConnectFailureOnly;

impl RetryableStrategy for ConnectFailureOnly {
    fn handle(
        &self,
        res: &std::result::Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(reqwest_middleware::Error::Reqwest(e)) if e.is_connect() => {
                Some(Retryable::Transient)
            }
            Err(_) => Some(Retryable::Fatal),
        }
    }
}

/// Shared outbound HTTP client for all provider adapters
///
/// Bounded timeout, retries on connect failures.
#[derive(Clone)]
pub struct ProviderClient {
    client: ClientWithMiddleware,
}

impl ProviderClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                ConnectFailureOnly,
            ))
            .build();

        Ok(Self { client })
    }

    pub async fn get(&self, url: &str, credentials: Credentials<'_>) -> Result<ProviderResponse> {
        self.send("GET", url, authorize(self.client.get(url), credentials))
            .await
    }

    pub async fn post_json<B>(
        &self,
        url: &str,
        body: &B,
        credentials: Credentials<'_>,
    ) -> Result<ProviderResponse>
    where
        B: Serialize + ?Sized,
    {
        let builder = authorize(self.client.post(url), credentials).json(body);
        self.send("POST", url, builder).await
    }

    pub async fn post_form<F>(
        &self,
        url: &str,
        form: &F,
        credentials: Credentials<'_>,
    ) -> Result<ProviderResponse>
    where
        F: Serialize + ?Sized,
    {
        let builder = authorize(self.client.post(url), credentials).form(form);
        self.send("POST", url, builder).await
    }

    async fn send(&self, method: &str, url: &str, builder: RequestBuilder) -> Result<ProviderResponse> {
        let response = builder
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!(method, url, status = status.as_u16(), "Provider responded");

        Ok(ProviderResponse { status, body })
    }
}

fn authorize(builder: RequestBuilder, credentials: Credentials<'_>) -> RequestBuilder {
    match credentials {
        Credentials::None => builder,
        Credentials::Bearer(token) => builder.bearer_auth(token),
        Credentials::Basic { username, password } => builder.basic_auth(username, Some(password)),
        Credentials::Header { name, value } => builder.header(name, value),
        Credentials::Authorization(value) => builder.header(reqwest::header::AUTHORIZATION, value),
    }
}

/// Status and body of a provider response
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Fail with a descriptive error unless the status is 2xx
    pub fn ensure_success(self, provider: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AppError::provider(format!(
                "{} API error - HTTP {} ({})",
                provider,
                self.status.as_u16(),
                self.body
            )))
        }
    }

    pub fn json<T: DeserializeOwned>(&self, provider: &str) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| AppError::provider(format!("Failed to parse {} response: {}", provider, e)))
    }
}

/// Append path segments to a provider base URL, percent-encoding each one
pub fn endpoint_url(base: &str, segments: &[&str]) -> Result<String> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::configuration(format!("Invalid provider URL {}: {}", base, e)))?;

    url.path_segments_mut()
        .map_err(|_| AppError::configuration(format!("Provider URL {} cannot be a base", base)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url.to_string())
}
