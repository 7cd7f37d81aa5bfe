use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use config::{Config, ConfigError, Environment, File, FileFormat};
use ed25519_zebra::VerificationKey;
use serde::Deserialize;
use std::convert::TryFrom;

use crate::Result;

pub const DEFAULT_GRPC_ENDPOINT: &str = "https://api.mpcvault.com:443";
pub const DEFAULT_HTTP_ENDPOINT: &str = "https://api.mpcvault.com/v1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const SSH_ED25519: &str = "ssh-ed25519";

#[derive(Deserialize, Clone, Debug)]
pub struct ClientConfig {
    pub api_token: String,
    pub grpc_endpoint: String,
    pub http_endpoint: String,
    pub http_timeout_secs: u64,
    pub grpc_timeout_secs: Option<u64>,
    pub client_signer: Option<ClientSignerConfig>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ClientSignerConfig {
    pub vault_uuid: String,
    pub callback_public_key: SshEd25519Key,
}

/// An OpenSSH formatted ed25519 public key, `ssh-ed25519 <base64 blob> [comment]`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct SshEd25519Key(String);

impl SshEd25519Key {
    pub fn new(key: impl Into<String>) -> Self {
        SshEd25519Key(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw 32 key bytes carried in the blob, if the key is well formed.
    pub fn key_bytes(&self) -> Option<[u8; 32]> {
        let mut parts = self.0.split_whitespace();
        if parts.next()? != SSH_ED25519 {
            return None;
        }
        let blob = STANDARD.decode(parts.next()?).ok()?;
        let (algorithm, rest) = read_ssh_string(&blob)?;
        if algorithm != SSH_ED25519.as_bytes() {
            return None;
        }
        let (key, rest) = read_ssh_string(rest)?;
        if !rest.is_empty() {
            return None;
        }
        <[u8; 32]>::try_from(key).ok()
    }
}

fn read_ssh_string(buf: &[u8]) -> Option<(&[u8], &[u8])> {
    if buf.len() < 4 {
        return None;
    }
    let (len, rest) = buf.split_at(4);
    let len = u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize;
    if rest.len() < len {
        return None;
    }
    Some(rest.split_at(len))
}

fn validate_ssh_ed25519_pubkey(pubkey: &SshEd25519Key) -> bool {
    match pubkey.key_bytes() {
        Some(bytes) => VerificationKey::try_from(&bytes[..]).is_ok(),
        None => false,
    }
}

fn validate_endpoints(conf: &ClientConfig) -> bool {
    tonic::transport::Endpoint::from_shared(conf.grpc_endpoint.clone()).is_ok()
        && reqwest::Url::parse(&conf.http_endpoint)
            .map(|url| url.scheme() == "http" || url.scheme() == "https")
            .unwrap_or(false)
}

fn validate_client(conf: &ClientConfig) -> std::result::Result<(), ConfigError> {
    if conf.api_token.trim().is_empty() {
        return Err(ConfigError::Message(String::from("No API token configured.")));
    }
    if !validate_endpoints(conf) {
        return Err(ConfigError::Message(String::from("At least one of the configured endpoints is not a valid URL.")));
    }
    Ok(())
}

fn validate_client_signer(signer: &ClientSignerConfig) -> std::result::Result<(), ConfigError> {
    if signer.vault_uuid.trim().is_empty() {
        return Err(ConfigError::Message(String::from("The client signer needs a vault uuid.")));
    }
    if !validate_ssh_ed25519_pubkey(&signer.callback_public_key) {
        return Err(ConfigError::Message(String::from("The callback client signer public key is not a valid ssh-ed25519 key.")));
    }
    Ok(())
}

fn load(path: &str, env: Environment) -> Result<ClientConfig> {
    let conf = Config::builder()
        .set_default("api_token", "")?
        .set_default("grpc_endpoint", DEFAULT_GRPC_ENDPOINT)?
        .set_default("http_endpoint", DEFAULT_HTTP_ENDPOINT)?
        .set_default("http_timeout_secs", DEFAULT_HTTP_TIMEOUT_SECS)?
        .add_source(File::new(path, FileFormat::Json).required(false))
        .add_source(env)
        .build()?;
    let conf = conf.try_deserialize::<ClientConfig>()?;
    validate_client(&conf)?;
    Ok(conf)
}

fn environment() -> Environment {
    Environment::with_prefix("MPCVAULT").prefix_separator("_").separator("__")
}

fn load_client_signer(path: &str, env: Environment) -> Result<(ClientConfig, ClientSignerConfig)> {
    let conf = load(path, env)?;
    let signer = conf.client_signer.clone().ok_or_else(|| {
        ConfigError::Message(String::from("The configuration has no `client_signer` section."))
    })?;
    validate_client_signer(&signer)?;
    Ok((conf, signer))
}

/// Reads the JSON file at `path` (if present), then applies `MPCVAULT_*` overrides.
/// The `client_signer` section is not looked at here.
pub fn parse_client(path: &str) -> Result<ClientConfig> {
    load(path, environment())
}

/// Like [`parse_client`], but the client signer section is mandatory and validated.
pub fn parse_client_signer(path: &str) -> Result<(ClientConfig, ClientSignerConfig)> {
    load_client_signer(path, environment())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use config::Map;
    use ed25519_zebra::SigningKey;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ssh_string(buf: &mut Vec<u8>, data: &[u8]) {
        buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        buf.extend_from_slice(data);
    }

    pub(crate) fn sample_ssh_key() -> SshEd25519Key {
        let sk = SigningKey::from([7u8; 32]);
        let vk: [u8; 32] = VerificationKey::from(&sk).into();
        let mut blob = Vec::new();
        ssh_string(&mut blob, SSH_ED25519.as_bytes());
        ssh_string(&mut blob, &vk);
        SshEd25519Key::new(format!("{} {} signer@test", SSH_ED25519, STANDARD.encode(blob)))
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn defaults_apply_without_a_file() {
        let conf = load("does-not-exist.json", env(&[("MPCVAULT_API_TOKEN", "token")])).unwrap();
        assert_eq!(conf.api_token, "token");
        assert_eq!(conf.grpc_endpoint, DEFAULT_GRPC_ENDPOINT);
        assert_eq!(conf.http_endpoint, DEFAULT_HTTP_ENDPOINT);
        assert_eq!(conf.http_timeout_secs, 30);
        assert!(conf.grpc_timeout_secs.is_none());
        assert!(conf.client_signer.is_none());
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = load("does-not-exist.json", env(&[])).unwrap_err();
        assert!(err.to_string().contains("No API token"));
    }

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn signer_section(key: &str) -> String {
        format!(
            r#"{{
                "api_token": "from-file",
                "http_endpoint": "http://127.0.0.1:8080/v1",
                "client_signer": {{ "vault_uuid": "vault-1", "callback_public_key": "{}" }}
            }}"#,
            key
        )
    }

    #[test]
    fn file_is_read_and_env_wins() {
        let file = config_file(&signer_section(sample_ssh_key().as_str()));

        let (conf, signer) = load_client_signer(
            file.path().to_str().unwrap(),
            env(&[("MPCVAULT_API_TOKEN", "from-env"), ("MPCVAULT_HTTP_TIMEOUT_SECS", "5")]),
        )
        .unwrap();

        assert_eq!(conf.api_token, "from-env");
        assert_eq!(conf.http_endpoint, "http://127.0.0.1:8080/v1");
        assert_eq!(conf.http_timeout_secs, 5);
        assert_eq!(signer.vault_uuid, "vault-1");
        assert_eq!(signer.callback_public_key, sample_ssh_key());
    }

    #[test]
    fn placeholder_signer_key_only_fails_the_client_signer_flow() {
        let file = config_file(&signer_section("ssh-ed25519 AAAA... signer"));
        let path = file.path().to_str().unwrap();

        let conf = load(path, env(&[])).unwrap();
        assert_eq!(conf.api_token, "from-file");

        let err = load_client_signer(path, env(&[])).unwrap_err();
        assert!(err.to_string().contains("not a valid ssh-ed25519 key"));
    }

    #[test]
    fn client_signer_section_is_required_for_the_client_signer_flow() {
        let err = load_client_signer("does-not-exist.json", env(&[("MPCVAULT_API_TOKEN", "t")])).unwrap_err();
        assert!(err.to_string().contains("no `client_signer` section"));
    }

    #[test]
    fn ssh_key_is_decoded() {
        let key = sample_ssh_key();
        assert!(validate_ssh_ed25519_pubkey(&key));
        let expected: [u8; 32] = VerificationKey::from(&SigningKey::from([7u8; 32])).into();
        assert_eq!(key.key_bytes(), Some(expected));
    }

    #[test]
    fn malformed_ssh_keys_are_rejected() {
        let valid = sample_ssh_key();
        let blob = valid.as_str().split_whitespace().nth(1).unwrap();
        for key in [
            String::from("[callback client signer public key]"),
            format!("ssh-rsa {}", blob),
            String::from("ssh-ed25519 not-base64!"),
            format!("ssh-ed25519 {}", STANDARD.encode([0u8; 8])),
        ] {
            assert!(!validate_ssh_ed25519_pubkey(&SshEd25519Key::new(key)));
        }
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let err = load(
            "does-not-exist.json",
            env(&[("MPCVAULT_API_TOKEN", "t"), ("MPCVAULT_HTTP_ENDPOINT", "ftp://example.com")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("endpoints"));
    }
}
