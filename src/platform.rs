//! Generated types and client for the `mpcvault.platform.v1` API.

pub mod v1 {
    tonic::include_proto!("mpcvault.platform.v1");
}

pub use v1::create_signing_request_request::Type as SigningRequestType;
pub use v1::platform_api_client::PlatformApiClient;
pub use v1::{
    CreateSigningRequestRequest, CreateSigningRequestResponse, EvmGas, EvmSendCustom,
    EvmSendErc20,
};
