//! (De)serialization utils.
//!
//! Group elements are written as upper-case hex in human-readable formats (JSON) and as
//! big-endian bytes in binary formats (bincode). Decoding goes through the checked
//! constructors, so an out-of-range element is a deserialization error.
use crate::{
    arithmetics::{ElementModP, ElementModQ},
    error::Result,
};
use serde::{
    de::{DeserializeOwned, Error as DeError, Unexpected, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

fn serialize_element<S>(hex: String, bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if serializer.is_human_readable() {
        return serializer.serialize_str(&hex);
    }
    return serializer.serialize_bytes(bytes);
}

/// Raw material of an element: either hex text or bytes, depending on the format
enum Encoded {
    Hex(String),
    Bytes(Vec<u8>),
}

fn deserialize_element<'de, D>(deserializer: D) -> std::result::Result<Encoded, D::Error>
where
    D: Deserializer<'de>,
{
    struct HexVisitor;

    impl Visitor<'_> for HexVisitor {
        type Value = Encoded;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            return formatter.write_str("hex-encoded group element");
        }

        fn visit_str<E: DeError>(self, value: &str) -> std::result::Result<Self::Value, E> {
            if value.is_empty() || !value.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(E::invalid_value(Unexpected::Str(value), &self));
            }
            return Ok(Encoded::Hex(value.to_string()));
        }
    }

    struct BytesVisitor;

    impl Visitor<'_> for BytesVisitor {
        type Value = Encoded;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            return formatter.write_str("big-endian group element");
        }

        fn visit_bytes<E: DeError>(self, value: &[u8]) -> std::result::Result<Self::Value, E> {
            return Ok(Encoded::Bytes(value.to_vec()));
        }

        fn visit_byte_buf<E: DeError>(self, value: Vec<u8>) -> std::result::Result<Self::Value, E> {
            return Ok(Encoded::Bytes(value));
        }
    }

    if deserializer.is_human_readable() {
        return deserializer.deserialize_str(HexVisitor);
    }
    return deserializer.deserialize_bytes(BytesVisitor);
}

impl Serialize for ElementModP {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        return serialize_element(self.to_hex(), &self.to_bytes(), serializer);
    }
}

impl<'de> Deserialize<'de> for ElementModP {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let element = match deserialize_element(deserializer)? {
            Encoded::Hex(hex) => Self::from_hex(&hex),
            Encoded::Bytes(bytes) => Self::from_bytes(&bytes),
        };
        return element.map_err(D::Error::custom);
    }
}

impl Serialize for ElementModQ {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        return serialize_element(self.to_hex(), &self.to_bytes(), serializer);
    }
}

impl<'de> Deserialize<'de> for ElementModQ {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let element = match deserialize_element(deserializer)? {
            Encoded::Hex(hex) => Self::from_hex(&hex),
            Encoded::Bytes(bytes) => Self::from_bytes(&bytes),
        };
        return element.map_err(D::Error::custom);
    }
}

/// Serialize to compact JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    return Ok(serde_json::to_string(value)?);
}

pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    return Ok(serde_json::from_str(json)?);
}

/// Serialize to the compact binary form (bincode, standard configuration)
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    return Ok(bincode::serde::encode_to_vec(
        value,
        bincode::config::standard(),
    )?);
}

/// Deserialize from the compact binary form; trailing bytes are rejected
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let (value, read) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    if read != bytes.len() {
        return Err(crate::Error::Serialization(format!(
            "{} trailing bytes",
            bytes.len() - read
        )));
    }
    return Ok(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arithmetics::g_pow_p, constants::LARGE_PRIME, P_BYTES};
    use crypto_bigint::Encoding;

    #[test]
    fn test_elements_in_json() {
        let x = ElementModQ::from_u64(0xBEEF);
        assert_eq!(to_json(&x).unwrap(), "\"BEEF\"");
        assert_eq!(from_json::<ElementModQ>("\"beef\"").unwrap(), x);
        assert!(from_json::<ElementModQ>("\"xyz\"").is_err());

        let gx = g_pow_p(&x);
        assert_eq!(from_json::<ElementModP>(&to_json(&gx).unwrap()).unwrap(), gx);

        let p_hex = format!("\"{}\"", hex::encode_upper(LARGE_PRIME.to_be_bytes()));
        assert!(from_json::<ElementModP>(&p_hex).is_err());
    }

    #[test]
    fn test_elements_in_binary() {
        let gx = g_pow_p(&ElementModQ::from_u64(3));
        let bytes = to_bytes(&gx).unwrap();
        assert!(bytes.len() > P_BYTES);
        assert_eq!(from_bytes::<ElementModP>(&bytes).unwrap(), gx);

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(from_bytes::<ElementModP>(&trailing).is_err());
    }
}
