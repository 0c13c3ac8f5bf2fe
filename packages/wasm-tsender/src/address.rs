//! EVM address decoding
//!
//! Addresses are `0x`-prefixed, 20-byte hex strings. Mixed-case checksums
//! are accepted as-is; the wallet verifies them when signing.

use crate::error::AirdropError;

/// Length of an EVM address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Decode a `0x`-prefixed hex address into its 20 bytes
pub fn decode_address(address: &str) -> Result<[u8; ADDRESS_LEN], AirdropError> {
    let hex = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| AirdropError::InvalidAddress(format!("'{}' must start with 0x", address)))?;

    if hex.len() != ADDRESS_LEN * 2 {
        return Err(AirdropError::InvalidAddress(format!(
            "'{}' must be {} hex characters, got {}",
            address,
            ADDRESS_LEN * 2,
            hex.len()
        )));
    }

    let mut bytes = [0u8; ADDRESS_LEN];
    hex::decode_to_slice(hex, &mut bytes)
        .map_err(|e| AirdropError::InvalidAddress(format!("'{}': {}", address, e)))?;
    Ok(bytes)
}

/// Validate an EVM address
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_address() {
        let bytes = decode_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        assert_eq!(
            hex::encode(bytes),
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("0x5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert!(!validate_address("5FbDB2315678afecb367f032d93F642f64180aa3")); // no prefix
        assert!(!validate_address("0x5FbDB2315678afecb367f032d93F642f64180a")); // short
        assert!(!validate_address("0xZZbDB2315678afecb367f032d93F642f64180aa3"));
        assert!(!validate_address(""));
    }
}
