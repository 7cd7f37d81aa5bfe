use clap::{Arg, Command};
use hex::FromHex;
use log::{error, info};

use signing_request_client::common::cli;
use signing_request_client::common::config::{self, ClientConfig};
use signing_request_client::grpc::GrpcPlatformClient;
use signing_request_client::http::{HttpPlatformClient, HttpResponse};
use signing_request_client::platform::CreateSigningRequestRequest;
use signing_request_client::{output, request, Result};

async fn send_grpc(conf: &ClientConfig, req: CreateSigningRequestRequest) -> Result<String> {
    let mut client = GrpcPlatformClient::connect(conf).await?;
    let resp = client.create_signing_request(req).await?;
    output::render(&resp)
}

async fn send_http(conf: &ClientConfig, req: &CreateSigningRequestRequest) -> Result<HttpResponse> {
    let client = HttpPlatformClient::new(conf)?;
    client.create_signing_request(req).await
}

async fn grpc_call(conf: &ClientConfig, req: CreateSigningRequestRequest) {
    match send_grpc(conf, req).await {
        Ok(text) => println!("[gRPC] response: {}", text),
        Err(e) => {
            error!("[gRPC] failed.");
            println!("[gRPC] error: {}", e);
        }
    }
}

async fn http_call(conf: &ClientConfig, req: &CreateSigningRequestRequest) {
    match send_http(conf, req).await {
        Ok(resp) => println!("[HTTP] response: {}", output::render_http(&resp)),
        Err(e) => {
            error!("[HTTP] failed.");
            println!("[HTTP] error: {}", e);
        }
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    cli::init_logger()?;
    let matches = Command::new("Deploy Contract Signing Request")
        .arg(cli::config_arg())
        .arg(Arg::new("bytecode")
             .short('b')
             .long("bytecode")
             .value_name("HEX")
             .required(true)
             .help("Contract creation bytecode, hex encoded")
        )
        .arg(Arg::new("from")
             .long("from")
             .value_name("ADDRESS")
             .default_value("0xc0abaa254729296a45a3885639AC7E10F9d54979")
             .help("Deployer wallet address in the vault")
        )
        .arg(Arg::new("gas-limit")
             .long("gas-limit")
             .value_name("GAS")
             .default_value("10000000")
             .help("Gas limit for the deployment")
        ).get_matches();

    let conf_path = cli::config_path(&matches);
    info!("Parsing configuration file `{}`.", conf_path);
    let conf = config::parse_client(&conf_path)?;

    let bytecode = matches.get_one::<String>("bytecode").map(String::as_str).unwrap_or_default();
    let bytecode = Vec::<u8>::from_hex(bytecode.strip_prefix("0x").unwrap_or(bytecode))?;
    let from = matches.get_one::<String>("from").map(String::as_str).unwrap_or_default();
    let gas_limit = matches.get_one::<String>("gas-limit").map(String::as_str).unwrap_or_default();
    let req = request::deploy_contract_request(from, bytecode, gas_limit);

    println!("========== do grpc request==========");
    grpc_call(&conf, req.clone()).await;

    println!("\n========== do http request==========");
    http_call(&conf, &req).await;

    Ok(())
}
