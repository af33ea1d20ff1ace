//! reqwest implementation of the server collaborator

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::SnsClient;
use crate::config::{AccountConfig, HttpConfig};
use crate::data::{Account, Response};
use crate::error::{AppError, RequestError};

/// Mastodon/Pleroma REST client for a single signed-in account
#[derive(Clone)]
pub struct HttpClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl HttpClient {
    /// Build a client from the account and HTTP configuration
    ///
    /// # Errors
    /// Returns `AppError::Config` if the proxy URL is rejected or the
    /// underlying client cannot be constructed
    pub fn new(account: &AccountConfig, http: &HttpConfig) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(Duration::from_secs(http.timeout_seconds));

        if let Some(proxy_url) = &http.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| AppError::Config(format!("invalid proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let http_client = builder
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            http_client,
            base_url: account.base_url.trim().trim_end_matches('/').to_string(),
            access_token: account.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn follow_request_url(&self, id: &str, action: &str) -> String {
        self.url(&format!(
            "/api/v1/follow_requests/{}/{}",
            urlencoding::encode(id),
            action
        ))
    }

    /// Send a request and reject non-2xx answers
    async fn send(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<(u16, String, HashMap<String, String>, Vec<u8>), RequestError> {
        use crate::metrics::{CLIENT_REQUEST_DURATION_SECONDS, CLIENT_REQUESTS_TOTAL};

        let started = Instant::now();
        let result = request.bearer_auth(&self.access_token).send().await;
        CLIENT_REQUEST_DURATION_SECONDS
            .with_label_values(&[endpoint])
            .observe(started.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                CLIENT_REQUESTS_TOTAL
                    .with_label_values(&[endpoint, "error"])
                    .inc();
                tracing::debug!(endpoint, %error, "Request did not complete");
                return Err(RequestError::Transport(error));
            }
        };

        let status = response.status();
        CLIENT_REQUESTS_TOTAL
            .with_label_values(&[endpoint, status.as_str()])
            .inc();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();

        if !status.is_success() {
            tracing::debug!(endpoint, status = status.as_u16(), "Server rejected request");
            return Err(RequestError::Status {
                status: status.as_u16(),
                status_text,
            });
        }

        let headers = collect_headers(response.headers());
        let body = response.bytes().await?.to_vec();

        Ok((status.as_u16(), status_text, headers, body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
    ) -> Result<Response<T>, RequestError> {
        let (status, status_text, headers, body) =
            self.send(endpoint, self.http_client.get(url)).await?;
        let data =
            serde_json::from_slice(&body).map_err(|e| RequestError::Decode(e.to_string()))?;

        Ok(Response {
            data,
            status,
            status_text,
            headers,
        })
    }

    async fn post_empty(
        &self,
        endpoint: &'static str,
        url: String,
    ) -> Result<Response<()>, RequestError> {
        let (status, status_text, headers, _body) =
            self.send(endpoint, self.http_client.post(url)).await?;

        Ok(Response {
            data: (),
            status,
            status_text,
            headers,
        })
    }
}

/// Flatten response headers, joining repeated ones (e.g. `Link`) with ", "
fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut collected: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        collected
            .entry(name.as_str().to_string())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}

#[async_trait]
impl SnsClient for HttpClient {
    async fn get_follow_requests(&self) -> Result<Response<Vec<Account>>, RequestError> {
        self.get_json("follow_requests", self.url("/api/v1/follow_requests"))
            .await
    }

    async fn accept_follow_request(&self, id: &str) -> Result<Response<()>, RequestError> {
        self.post_empty(
            "follow_requests_authorize",
            self.follow_request_url(id, "authorize"),
        )
        .await
    }

    async fn reject_follow_request(&self, id: &str) -> Result<Response<()>, RequestError> {
        self.post_empty(
            "follow_requests_reject",
            self.follow_request_url(id, "reject"),
        )
        .await
    }
}
