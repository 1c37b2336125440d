//! TRON address conversion.
//!
//! A TRON address is a 20-byte account id prefixed with `0x41`, shown to users
//! as base58check (`T...`). Contract ABI words carry only the 20-byte id.

use crate::AbiError;
use alloy_primitives::{hex, Address};

/// Version byte of mainnet and testnet TRON addresses.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Parse a base58check (`T...`) or hex (`41...`) TRON address.
pub fn decode_address(input: &str) -> Result<Address, AbiError> {
    let invalid = || AbiError::InvalidAddress(input.to_string());

    let bytes = if input.starts_with('T') {
        bs58::decode(input)
            .with_check(None)
            .into_vec()
            .map_err(|_| invalid())?
    } else {
        hex::decode(input).map_err(|_| invalid())?
    };

    match bytes.split_first() {
        Some((&ADDRESS_PREFIX, account)) if account.len() == 20 => Ok(Address::from_slice(account)),
        _ => Err(invalid()),
    }
}

/// Render a 20-byte account id as a base58check TRON address.
pub fn encode_address(address: Address) -> String {
    let mut bytes = Vec::with_capacity(21);
    bytes.push(ADDRESS_PREFIX);
    bytes.extend_from_slice(address.as_slice());
    bs58::encode(bytes).with_check().into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const USDT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

    #[test]
    fn test_decode_base58() {
        let decoded = decode_address(USDT).unwrap();
        assert_eq!(decoded, address!("a614f803b6fd780986a42c78ec9c7f77e6ded13c"));
    }

    #[test]
    fn test_decode_hex() {
        let decoded = decode_address("41a614f803b6fd780986a42c78ec9c7f77e6ded13c").unwrap();
        assert_eq!(encode_address(decoded), USDT);
    }

    #[test]
    fn test_reject_bad_checksum() {
        // last character altered
        let result = decode_address("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6u");
        assert!(matches!(result, Err(AbiError::InvalidAddress(_))));
    }

    #[test]
    fn test_reject_wrong_prefix() {
        let result = decode_address("a614f803b6fd780986a42c78ec9c7f77e6ded13c");
        assert!(result.is_err());
        assert!(decode_address("").is_err());
    }
}
