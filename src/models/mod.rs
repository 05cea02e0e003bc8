pub mod history;
pub mod pair;
pub mod principal;
pub mod state;

/// Serde helper: raw on-chain amounts travel as decimal strings so
/// arbitrary precision survives JSON transport.
pub(crate) mod bigint_str {
    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse::<BigInt>()
            .map_err(|e| de::Error::custom(format!("bad integer amount {text:?}: {e}")))
    }
}
