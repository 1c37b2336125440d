//! Contract call argument and return values.

use crate::ParamType;
use alloy_primitives::U256;
use std::fmt;

/// A primitive value passed to or returned from a contract call.
///
/// Addresses stay in their chain-native string form; the provider decides
/// how to encode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Address(String),
    Uint(U256),
    Bool(bool),
}

impl Value {
    pub const fn kind(&self) -> ParamType {
        match self {
            Self::Address(_) => ParamType::Address,
            Self::Uint(_) => ParamType::Uint256,
            Self::Bool(_) => ParamType::Bool,
        }
    }

    pub const fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => f.write_str(address),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

