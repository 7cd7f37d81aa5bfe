use std::time::Duration;

use log::debug;
use tonic::metadata::AsciiMetadataValue;
use tonic::service::interceptor::InterceptedService;
use tonic::service::Interceptor;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Request, Status};

use crate::common::config::ClientConfig;
use crate::platform::{CreateSigningRequestRequest, CreateSigningRequestResponse, PlatformApiClient};
use crate::request;
use crate::{PlatformClientError, Result};

pub const AUTH_HEADER: &str = "x-mtoken";

/// Attaches the API token to every outgoing call.
#[derive(Clone, Debug)]
pub struct TokenInterceptor {
    token: AsciiMetadataValue,
}

impl TokenInterceptor {
    pub fn new(token: &str) -> Result<Self> {
        let token = AsciiMetadataValue::try_from(token).map_err(|_| {
            PlatformClientError::Authentication(String::from("The API token is not a valid metadata value."))
        })?;
        Ok(TokenInterceptor { token })
    }
}

impl Interceptor for TokenInterceptor {
    fn call(&mut self, mut request: Request<()>) -> std::result::Result<Request<()>, Status> {
        request.metadata_mut().insert(AUTH_HEADER, self.token.clone());
        Ok(request)
    }
}

pub struct GrpcPlatformClient {
    inner: PlatformApiClient<InterceptedService<Channel, TokenInterceptor>>,
}

impl GrpcPlatformClient {
    /// Opens a channel to the configured endpoint. `https` endpoints use TLS with the system roots.
    pub async fn connect(conf: &ClientConfig) -> Result<Self> {
        let interceptor = TokenInterceptor::new(&conf.api_token)?;

        let mut endpoint = Endpoint::from_shared(conf.grpc_endpoint.clone())?;
        if endpoint.uri().scheme_str() == Some("https") {
            endpoint = endpoint.tls_config(ClientTlsConfig::new().with_native_roots())?;
        }
        if let Some(secs) = conf.grpc_timeout_secs {
            endpoint = endpoint.timeout(Duration::from_secs(secs));
        }

        debug!("Connecting to gRPC endpoint `{}`.", conf.grpc_endpoint);
        let channel = endpoint.connect().await?;

        Ok(GrpcPlatformClient {
            inner: PlatformApiClient::with_interceptor(channel, interceptor),
        })
    }

    pub async fn create_signing_request(
        &mut self,
        request: CreateSigningRequestRequest,
    ) -> Result<CreateSigningRequestResponse> {
        request::validate(&request)?;
        debug!("Sending signing request over gRPC: {:?}", request);
        let response = self.inner.create_signing_request(Request::new(request)).await?;
        Ok(response.into_inner())
    }
}
