use clap::Command;
use futures::future;
use log::{error, info};

use signing_request_client::common::cli;
use signing_request_client::common::config::{self, ClientConfig};
use signing_request_client::grpc::GrpcPlatformClient;
use signing_request_client::http::{HttpPlatformClient, HttpResponse};
use signing_request_client::{output, request, Result};

async fn send_http(conf: &ClientConfig) -> Result<HttpResponse> {
    let client = HttpPlatformClient::new(conf)?;
    client.create_signing_request(&request::send_erc20_request()).await
}

async fn send_grpc(conf: &ClientConfig) -> Result<String> {
    let mut client = GrpcPlatformClient::connect(conf).await?;
    let resp = client.create_signing_request(request::send_erc20_request()).await?;
    output::render(&resp)
}

async fn http_demo(conf: ClientConfig) {
    match send_http(&conf).await {
        Ok(resp) => {
            info!("HTTP signing request answered with status {}.", resp.status);
            println!("{}", output::render_http(&resp));
        }
        Err(e) => {
            error!("HTTP signing request failed.");
            println!("HTTP RESULT: {}", e);
        }
    }
}

async fn grpc_demo(conf: ClientConfig) {
    match send_grpc(&conf).await {
        Ok(text) => {
            info!("gRPC signing request answered.");
            println!("GRPC RESULT: {}", text);
        }
        Err(e) => {
            error!("gRPC signing request failed.");
            println!("GRPC RESULT: {}", e);
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    cli::init_logger()?;
    let matches = Command::new("Send ERC-20 Signing Request")
        .arg(cli::config_arg())
        .get_matches();

    let conf_path = cli::config_path(&matches);
    info!("Parsing configuration file `{}`.", conf_path);
    let conf = config::parse_client(&conf_path)?;

    let (http, grpc) = future::join(
        tokio::spawn(http_demo(conf.clone())),
        tokio::spawn(grpc_demo(conf)),
    )
    .await;
    http?;
    grpc?;

    Ok(())
}
