//! Shared types for the airdrop form

use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Token details read from the ERC20 contract
///
/// Each field is read independently and stays `None` until its read returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    /// `decimals()`
    #[serde(default)]
    pub decimals: Option<u8>,
    /// `name()`
    #[serde(default)]
    pub name: Option<String>,
    /// `balanceOf(owner)` in smallest units
    #[serde(
        default,
        serialize_with = "serialize_units_opt",
        deserialize_with = "deserialize_units_opt"
    )]
    pub balance: Option<BigUint>,
}

/// Wallet state at submit time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitContext {
    /// Connected account, owner of the tokens
    pub owner: String,
    /// Chain the wallet is connected to
    pub chain_id: u64,
}

/// Serialize smallest units as a decimal string
pub fn serialize_units<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_str_radix(10))
}

fn serialize_units_opt<S>(value: &Option<BigUint>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(value) => serialize_units(value, serializer),
        None => serializer.serialize_none(),
    }
}

/// Deserialize smallest units from either a number or a decimal string
pub fn deserialize_units<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    struct UnitsVisitor;

    impl<'de> de::Visitor<'de> for UnitsVisitor {
        type Value = BigUint;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative integer as number or string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<BigUint, E>
        where
            E: de::Error,
        {
            Ok(BigUint::from(value))
        }

        fn visit_u128<E>(self, value: u128) -> Result<BigUint, E>
        where
            E: de::Error,
        {
            Ok(BigUint::from(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<BigUint, E>
        where
            E: de::Error,
        {
            u64::try_from(value)
                .map(BigUint::from)
                .map_err(|_| E::custom("negative values not allowed"))
        }

        fn visit_str<E>(self, value: &str) -> Result<BigUint, E>
        where
            E: de::Error,
        {
            BigUint::parse_bytes(value.trim().as_bytes(), 10)
                .ok_or_else(|| E::custom(format!("'{}' is not a non-negative integer", value)))
        }
    }

    deserializer.deserialize_any(UnitsVisitor)
}

fn deserialize_units_opt<'de, D>(deserializer: D) -> Result<Option<BigUint>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_units")] BigUint);

    Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(v)| v))
}
