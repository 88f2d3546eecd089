//! Serde helper for action byte data: written as base64, read from either a
//! base64 string or a plain array of byte values.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&BASE64.encode(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ByteInput {
        Encoded(String),
        Raw(Vec<u8>),
    }

    match ByteInput::deserialize(deserializer)? {
        ByteInput::Encoded(raw) => BASE64.decode(raw).map_err(D::Error::custom),
        ByteInput::Raw(bytes) => Ok(bytes),
    }
}
