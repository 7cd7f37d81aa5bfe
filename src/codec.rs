//! Serde helpers for the JSON form of the platform messages.

/// `bytes` fields travel as `0x`-prefixed hex strings.
pub mod hex_bytes {
    use hex::FromHex;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").unwrap_or(&s);
        Vec::from_hex(digits).map_err(de::Error::custom)
    }
}

/// Protojson form of `CreateSigningRequestRequest`: the oneof is a single key named after the
/// variant, unset optionals are omitted. Decoding rejects more than one variant key.
mod signing_request {
    use std::fmt;

    use serde::de::{self, IgnoredAny, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::platform::{CreateSigningRequestRequest, SigningRequestType};

    const EVM_SEND_ERC20: &str = "evm_send_erc20";
    const EVM_SEND_CUSTOM: &str = "evm_send_custom";
    const NOTES: &str = "notes";
    const VAULT_UUID: &str = "vault_uuid";
    const CALLBACK_KEY: &str = "callback_client_signer_public_key";

    impl Serialize for CreateSigningRequestRequest {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut map = serializer.serialize_map(None)?;
            match &self.r#type {
                Some(SigningRequestType::EvmSendErc20(send)) => map.serialize_entry(EVM_SEND_ERC20, send)?,
                Some(SigningRequestType::EvmSendCustom(send)) => map.serialize_entry(EVM_SEND_CUSTOM, send)?,
                None => {}
            }
            for (key, value) in [
                (NOTES, &self.notes),
                (VAULT_UUID, &self.vault_uuid),
                (CALLBACK_KEY, &self.callback_client_signer_public_key),
            ] {
                if let Some(value) = value {
                    map.serialize_entry(key, value)?;
                }
            }
            map.end()
        }
    }

    struct RequestVisitor;

    fn set_type<E: de::Error>(
        request: &mut CreateSigningRequestRequest,
        value: SigningRequestType,
    ) -> Result<(), E> {
        if request.r#type.is_some() {
            return Err(E::custom("more than one signing request type is set"));
        }
        request.r#type = Some(value);
        Ok(())
    }

    impl<'de> Visitor<'de> for RequestVisitor {
        type Value = CreateSigningRequestRequest;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a CreateSigningRequestRequest object")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut request = CreateSigningRequestRequest::default();
            while let Some(key) = map.next_key::<String>()? {
                match key.as_str() {
                    EVM_SEND_ERC20 | "evmSendErc20" => {
                        set_type::<A::Error>(&mut request, SigningRequestType::EvmSendErc20(map.next_value()?))?
                    }
                    EVM_SEND_CUSTOM | "evmSendCustom" => {
                        set_type::<A::Error>(&mut request, SigningRequestType::EvmSendCustom(map.next_value()?))?
                    }
                    NOTES => request.notes = map.next_value()?,
                    VAULT_UUID | "vaultUuid" => request.vault_uuid = map.next_value()?,
                    CALLBACK_KEY | "callbackClientSignerPublicKey" => {
                        request.callback_client_signer_public_key = map.next_value()?
                    }
                    _ => {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
            }
            Ok(request)
        }
    }

    impl<'de> Deserialize<'de> for CreateSigningRequestRequest {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(RequestVisitor)
        }
    }
}
