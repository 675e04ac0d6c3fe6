//! reqwest-backed transport

use crate::classify::classify_response;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use metro_reserve_core::retry::AttemptOutcome;
use metro_reserve_core::transport::Transport;
use metro_reserve_core::types::{Credential, NetworkConfig, ReservationRequest};
use metro_reserve_core::utils::format_duration;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Browser-emulation headers sent with every attempt, in wire order
const FIXED_HEADERS: &[(&str, &str)] = &[
    ("accept", "application/json, text/plain, */*"),
    ("accept-language", "zh-CN,zh;q=0.9,en;q=0.8"),
    ("content-type", "application/json;charset=UTF-8"),
    (
        "sec-ch-ua",
        r#""Not_A Brand";v="99", "Google Chrome";v="109", "Chromium";v="109""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "macOS"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-site"),
    ("referer", "https://webui.mybti.cn/"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

/// Transport that POSTs the reservation as JSON
///
/// The client and the fixed headers are built once; each attempt only adds
/// the credential and its own timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Create a transport for the configured endpoint
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let endpoint = Url::parse(&network.endpoint)
            .map_err(|e| ClientError::invalid_endpoint(&network.endpoint, e.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = &network.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            headers: fixed_headers()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(
        &self,
        request: &ReservationRequest,
        credential: &Credential,
        timeout: Duration,
    ) -> AttemptOutcome {
        let body = match serde_json::to_vec(request) {
            Ok(body) => body,
            Err(e) => {
                return AttemptOutcome::transport_error(format!("failed to encode request: {}", e))
            }
        };

        let mut authorization = match HeaderValue::from_str(credential.expose()) {
            Ok(value) => value,
            Err(_) => {
                return AttemptOutcome::transport_error("credential is not a valid header value")
            }
        };
        authorization.set_sensitive(true);

        debug!(
            endpoint = %self.endpoint,
            timeout_ms = timeout.as_millis() as u64,
            "sending reservation request"
        );

        let response = match self
            .client
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .header(AUTHORIZATION, authorization)
            .timeout(timeout)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::transport_error(describe(&e, timeout)),
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let mut outcome = AttemptOutcome::transport_error(describe(&e, timeout));
                outcome.status = Some(status);
                return outcome;
            }
        };

        trace!(status, body = %text, "reservation response");
        classify_response(status, &text)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn attempt(
        &self,
        request: &ReservationRequest,
        credential: &Credential,
        timeout: Duration,
    ) -> AttemptOutcome {
        let started = Instant::now();
        let outcome = self.send(request, credential, timeout).await;
        outcome.with_latency(started.elapsed())
    }
}

fn fixed_headers() -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(FIXED_HEADERS.len() + 1);
    for &(name, value) in FIXED_HEADERS {
        let name = HeaderName::from_static(name);
        let value =
            HeaderValue::from_str(value).map_err(|_| ClientError::invalid_header(name.as_str()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn describe(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        return format!("request timed out after {}", format_duration(timeout));
    }

    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
