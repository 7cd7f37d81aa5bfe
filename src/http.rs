//! JSON-over-HTTPS flavour of the platform API.
//!
//! Endpoints:
//! - POST {http_endpoint}/createSigningRequest

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::common::config::ClientConfig;
use crate::grpc::AUTH_HEADER;
use crate::platform::CreateSigningRequestRequest;
use crate::request;
use crate::{PlatformClientError, Result};

/// What came back from the platform. The body is kept as-is.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

pub struct HttpPlatformClient {
    base_url: String,
    api_token: HeaderValue,
    client: reqwest::Client,
}

impl HttpPlatformClient {
    pub fn new(conf: &ClientConfig) -> Result<Self> {
        let api_token = HeaderValue::from_str(&conf.api_token).map_err(|_| {
            PlatformClientError::Authentication(String::from("The API token is not a valid header value."))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(conf.http_timeout_secs))
            .build()?;
        Ok(HttpPlatformClient {
            base_url: conf.http_endpoint.trim_end_matches('/').to_string(),
            api_token,
            client,
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// POSTs the request as JSON with proto field names. Non-2xx statuses become errors.
    pub async fn create_signing_request(&self, request: &CreateSigningRequestRequest) -> Result<HttpResponse> {
        request::validate(request)?;
        let body = serde_json::to_vec(request)?;
        let url = self.url("createSigningRequest");
        debug!("POST {} ({} bytes)", url, body.len());

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTH_HEADER, self.api_token.clone())
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        match status {
            s if s.is_success() => Ok(HttpResponse { status, body }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PlatformClientError::Authentication(
                format!("platform returned status {}: {}", status, body),
            )),
            _ => Err(PlatformClientError::RemoteValidation(format!(
                "platform returned status {}: {}",
                status, body
            ))),
        }
    }
}
