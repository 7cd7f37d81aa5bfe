//! Construction and local validation of `CreateSigningRequestRequest` payloads.

use itertools::Itertools;

use crate::common::config::ClientSignerConfig;
use crate::platform::{CreateSigningRequestRequest, EvmGas, EvmSendCustom, EvmSendErc20, SigningRequestType};
use crate::{PlatformClientError, Result};

/// Polygon PoS.
pub const POLYGON_CHAIN_ID: u64 = 137;
pub const DEMO_ADDRESS: &str = "0x71C7656EC7ab88b098defB751B7401B5f6d8976F";
/// USDC on Polygon.
pub const USDC_CONTRACT_ADDRESS: &str = "0x2791bca1f2de4661ed88a30c99a7a9449aa84174";

/// 1 USDC sent from the demo address back to itself. Gas and nonce are left to the platform.
pub fn send_erc20_request() -> CreateSigningRequestRequest {
    CreateSigningRequestRequest {
        r#type: Some(SigningRequestType::EvmSendErc20(EvmSendErc20 {
            chain_id: POLYGON_CHAIN_ID,
            from: String::from(DEMO_ADDRESS),
            to: String::from(DEMO_ADDRESS),
            token_contract_address: String::from(USDC_CONTRACT_ADDRESS),
            amount: String::from("1000000"),
            gas_fee: None,
            nonce: None,
        })),
        notes: Some(String::from("sending 1 USDC for testing")),
        vault_uuid: None,
        callback_client_signer_public_key: None,
    }
}

/// Routes the request to a vault whose approvals go through a callback client signer.
pub fn with_client_signer(
    mut request: CreateSigningRequestRequest,
    signer: &ClientSignerConfig,
) -> CreateSigningRequestRequest {
    request.vault_uuid = Some(signer.vault_uuid.clone());
    request.callback_client_signer_public_key = Some(signer.callback_public_key.as_str().to_owned());
    request
}

/// Contract creation: empty `to`, zero value, bytecode as input.
pub fn deploy_contract_request(from: &str, bytecode: Vec<u8>, gas_limit: &str) -> CreateSigningRequestRequest {
    CreateSigningRequestRequest {
        r#type: Some(SigningRequestType::EvmSendCustom(EvmSendCustom {
            chain_id: POLYGON_CHAIN_ID,
            from: from.to_owned(),
            to: String::new(),
            value: String::from("0"),
            input: bytecode,
            gas_fee: Some(EvmGas {
                max_fee: None,
                max_priority_fee: None,
                gas_limit: Some(gas_limit.to_owned()),
            }),
            nonce: Some(String::from("0")),
        })),
        notes: Some(String::from("deploying contract")),
        vault_uuid: None,
        callback_client_signer_public_key: None,
    }
}

fn is_integer_string(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_evm_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(digits) => digits.len() == 40 && hex::decode(digits).is_ok(),
        None => false,
    }
}

fn check_gas(gas: &Option<EvmGas>, problems: &mut Vec<String>) {
    let gas = match gas {
        Some(gas) => gas,
        None => return,
    };
    let fields = [
        ("gas_fee.max_fee", &gas.max_fee),
        ("gas_fee.max_priority_fee", &gas.max_priority_fee),
        ("gas_fee.gas_limit", &gas.gas_limit),
    ];
    for (name, value) in fields {
        if let Some(v) = value {
            if !is_integer_string(v) {
                problems.push(format!("`{}` must be a non-negative integer, got `{}`", name, v));
            }
        }
    }
}

fn check_nonce(nonce: &Option<String>, problems: &mut Vec<String>) {
    if let Some(n) = nonce {
        if !is_integer_string(n) {
            problems.push(format!("`nonce` must be a non-negative integer, got `{}`", n));
        }
    }
}

/// Checks the payload before it is sent. Every problem found is reported at once.
pub fn validate(request: &CreateSigningRequestRequest) -> Result<()> {
    let mut problems = Vec::new();
    match &request.r#type {
        None => problems.push(String::from("no signing request type is set")),
        Some(SigningRequestType::EvmSendErc20(send)) => {
            if send.chain_id == 0 {
                problems.push(String::from("`chain_id` must be set"));
            }
            for (name, address) in [
                ("from", &send.from),
                ("to", &send.to),
                ("token_contract_address", &send.token_contract_address),
            ] {
                if !is_evm_address(address) {
                    problems.push(format!("`{}` is not an EVM address: `{}`", name, address));
                }
            }
            if !is_integer_string(&send.amount) {
                problems.push(format!("`amount` must be a non-negative integer, got `{}`", send.amount));
            }
            check_gas(&send.gas_fee, &mut problems);
            check_nonce(&send.nonce, &mut problems);
        }
        Some(SigningRequestType::EvmSendCustom(send)) => {
            if send.chain_id == 0 {
                problems.push(String::from("`chain_id` must be set"));
            }
            if !is_evm_address(&send.from) {
                problems.push(format!("`from` is not an EVM address: `{}`", send.from));
            }
            if !send.to.is_empty() && !is_evm_address(&send.to) {
                problems.push(format!("`to` is not an EVM address: `{}`", send.to));
            }
            if send.to.is_empty() && send.input.is_empty() {
                problems.push(String::from("contract creation needs bytecode in `input`"));
            }
            if !is_integer_string(&send.value) {
                problems.push(format!("`value` must be a non-negative integer, got `{}`", send.value));
            }
            check_gas(&send.gas_fee, &mut problems);
            check_nonce(&send.nonce, &mut problems);
        }
    }
    if request.vault_uuid.is_some() != request.callback_client_signer_public_key.is_some() {
        problems.push(String::from("`vault_uuid` and `callback_client_signer_public_key` go together"));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PlatformClientError::InvalidRequest(problems.iter().join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::tests::sample_ssh_key;

    fn signer() -> ClientSignerConfig {
        ClientSignerConfig {
            vault_uuid: String::from("9b0c1a4e-54a2-4a64-9d4f-6a1d2f3c7e11"),
            callback_public_key: sample_ssh_key(),
        }
    }

    #[test]
    fn standard_send_erc20() {
        let req = send_erc20_request();
        let send = match &req.r#type {
            Some(SigningRequestType::EvmSendErc20(send)) => send,
            other => panic!("unexpected request type {:?}", other),
        };
        assert_eq!(send.chain_id, 137);
        assert_eq!(send.amount, "1000000");
        assert!(send.gas_fee.is_none());
        assert!(!req.notes.as_deref().unwrap_or_default().is_empty());
        assert!(req.vault_uuid.is_none());
        assert!(req.callback_client_signer_public_key.is_none());
        validate(&req).unwrap();
    }

    #[test]
    fn client_signer_send_erc20() {
        let req = with_client_signer(send_erc20_request(), &signer());
        assert!(!req.vault_uuid.as_deref().unwrap_or_default().is_empty());
        assert!(req
            .callback_client_signer_public_key
            .as_deref()
            .unwrap_or_default()
            .starts_with("ssh-ed25519 "));
        match &req.r#type {
            Some(SigningRequestType::EvmSendErc20(send)) => assert!(send.nonce.is_none()),
            other => panic!("unexpected request type {:?}", other),
        }
        validate(&req).unwrap();
    }

    #[test]
    fn deploy_contract() {
        let req = deploy_contract_request(DEMO_ADDRESS, vec![0x60, 0x80], "10000000");
        match &req.r#type {
            Some(SigningRequestType::EvmSendCustom(send)) => {
                assert!(send.to.is_empty());
                assert_eq!(send.value, "0");
                assert_eq!(send.gas_fee.as_ref().and_then(|g| g.gas_limit.as_deref()), Some("10000000"));
            }
            other => panic!("unexpected request type {:?}", other),
        }
        validate(&req).unwrap();
    }

    #[test]
    fn rejects_bad_amount_and_address() {
        let mut req = send_erc20_request();
        if let Some(SigningRequestType::EvmSendErc20(send)) = &mut req.r#type {
            send.amount = String::from("-5");
            send.to = String::from("0x1234");
        }
        let err = validate(&req).unwrap_err().to_string();
        assert!(err.contains("`amount`"));
        assert!(err.contains("`to`"));
        assert!(!err.contains("`from`"));
    }

    #[test]
    fn rejects_decimal_amount() {
        let mut req = send_erc20_request();
        if let Some(SigningRequestType::EvmSendErc20(send)) = &mut req.r#type {
            send.amount = String::from("1.5");
        }
        assert!(matches!(validate(&req), Err(PlatformClientError::InvalidRequest(_))));
    }

    #[test]
    fn rejects_missing_type() {
        let req = CreateSigningRequestRequest::default();
        assert!(matches!(validate(&req), Err(PlatformClientError::InvalidRequest(_))));
    }

    #[test]
    fn rejects_half_configured_client_signer() {
        let mut req = send_erc20_request();
        req.vault_uuid = Some(String::from("vault"));
        assert!(validate(&req).is_err());
    }

    #[test]
    fn rejects_deploy_without_bytecode() {
        let req = deploy_contract_request(DEMO_ADDRESS, vec![], "21000");
        assert!(validate(&req).is_err());
    }
}
