use clap::Command;
use log::{error, info};

use signing_request_client::common::cli;
use signing_request_client::common::config;
use signing_request_client::grpc::GrpcPlatformClient;
use signing_request_client::{output, request};

async fn run(conf_path: &str) -> signing_request_client::Result<()> {
    let (conf, signer) = config::parse_client_signer(conf_path)?;
    info!("Requesting signature from vault `{}` via the callback client signer.", signer.vault_uuid);

    let mut client = GrpcPlatformClient::connect(&conf).await?;
    let req = request::with_client_signer(request::send_erc20_request(), &signer);
    let resp = client.create_signing_request(req).await?;

    println!("{}", output::render(&resp)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::init_logger()?;
    let matches = Command::new("Client Signer Signing Request")
        .arg(cli::config_arg())
        .get_matches();

    if let Err(e) = run(&cli::config_path(&matches)).await {
        error!("err: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
