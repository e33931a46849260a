//! Record encodings.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// How records are serialized into partition values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Encoding {
    /// `serde_json`; human-readable values.
    #[default]
    Json,
    /// `rmp-serde` with named fields.
    MessagePack,
}

impl Encoding {
    /// Serialize a value.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<u8>> {
        match self {
            Encoding::Json => Ok(serde_json::to_vec(value)?),
            Encoding::MessagePack => Ok(rmp_serde::to_vec_named(value)?),
        }
    }

    /// Deserialize a value.
    ///
    /// Errors are returned as plain messages; the caller knows which entry
    /// failed and builds the [`crate::StoreError::Decode`] from that.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> std::result::Result<T, String> {
        match self {
            Encoding::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Encoding::MessagePack => rmp_serde::from_slice(bytes).map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Order {
        id: String,
        qty: u32,
    }

    #[test]
    fn test_json_is_plain_json() {
        let bytes = Encoding::Json
            .encode(&Order { id: "o1".into(), qty: 3 })
            .unwrap();
        assert_eq!(bytes, br#"{"id":"o1","qty":3}"#);
    }

    #[test]
    fn test_messagepack_roundtrip() {
        let order = Order { id: "o2".into(), qty: 7 };
        let bytes = Encoding::MessagePack.encode(&order).unwrap();
        let decoded: Order = Encoding::MessagePack.decode(&bytes).unwrap();
        assert_eq!(decoded, order);
    }

    #[test]
    fn test_decode_garbage() {
        let result: std::result::Result<Order, _> = Encoding::Json.decode(b"{not json");
        assert!(result.is_err());
    }
}
