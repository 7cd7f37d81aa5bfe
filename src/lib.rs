pub mod codec;
pub mod common;
pub mod grpc;
pub mod http;
pub mod output;
pub mod platform;
pub mod request;

use thiserror::Error as DeriveError;
use tonic::Code;

pub type Result<T> = std::result::Result<T, PlatformClientError>;

#[derive(DeriveError, Debug)]
pub enum PlatformClientError {
    #[error("Could not reach the platform API. '{0}'")]
    Connection(String),
    #[error("The platform API did not accept the API token. '{0}'")]
    Authentication(String),
    #[error("The platform API rejected the request. '{0}'")]
    RemoteValidation(String),
    #[error("Something went wrong while encoding or decoding a payload. '{0}'")]
    Serialization(String),
    #[error("Could not load the client configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("The signing request is malformed: {0}")]
    InvalidRequest(String),
}

impl From<tonic::transport::Error> for PlatformClientError {
    fn from(e: tonic::transport::Error) -> Self {
        PlatformClientError::Connection(e.to_string())
    }
}

impl From<tonic::Status> for PlatformClientError {
    fn from(status: tonic::Status) -> Self {
        let message = format!("{:?}: {}", status.code(), status.message());
        match status.code() {
            Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled | Code::Unknown => {
                PlatformClientError::Connection(message)
            }
            Code::Unauthenticated | Code::PermissionDenied => {
                PlatformClientError::Authentication(message)
            }
            _ => PlatformClientError::RemoteValidation(message),
        }
    }
}

impl From<serde_json::Error> for PlatformClientError {
    fn from(e: serde_json::Error) -> Self {
        PlatformClientError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for PlatformClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() || e.is_body() {
            PlatformClientError::Serialization(e.to_string())
        } else {
            PlatformClientError::Connection(e.to_string())
        }
    }
}
