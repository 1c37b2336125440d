//! Runtime contract interface descriptions.
//!
//! Wallet providers take the interface as data rather than as generated
//! code, so the TRC20 methods are also described here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive ABI types the client needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Address,
    Uint256,
    Bool,
}

impl ParamType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Uint256 => "uint256",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed method input or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamType,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Whether a method reads or changes contract state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    View,
    Nonpayable,
}

impl Mutability {
    /// View calls are free and need no fee limit.
    pub const fn is_view(&self) -> bool {
        matches!(self, Self::View)
    }
}

/// One callable contract method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub mutability: Mutability,
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<Param>,
        outputs: Vec<Param>,
        mutability: Mutability,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
            mutability,
        }
    }

    /// Canonical signature, e.g. `approve(address,uint256)`.
    pub fn signature(&self) -> String {
        let inputs: Vec<&str> = self.inputs.iter().map(|p| p.kind.as_str()).collect();
        format!("{}({})", self.name, inputs.join(","))
    }

    pub const fn requires_fee_limit(&self) -> bool {
        !self.mutability.is_view()
    }
}

/// Ordered list of the methods a contract exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescription {
    methods: Vec<MethodDescriptor>,
}

impl InterfaceDescription {
    pub const fn new(methods: Vec<MethodDescriptor>) -> Self {
        Self { methods }
    }

    /// The subset of TRC20 the client calls.
    pub fn trc20() -> Self {
        use ParamType::{Address, Bool, Uint256};

        Self::new(vec![
            MethodDescriptor::new(
                "allowance",
                vec![Param::new("owner", Address), Param::new("spender", Address)],
                vec![Param::new("remaining", Uint256)],
                Mutability::View,
            ),
            MethodDescriptor::new(
                "approve",
                vec![Param::new("spender", Address), Param::new("value", Uint256)],
                vec![Param::new("", Bool)],
                Mutability::Nonpayable,
            ),
            MethodDescriptor::new(
                "balanceOf",
                vec![Param::new("who", Address)],
                vec![Param::new("", Uint256)],
                Mutability::View,
            ),
        ])
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ITRC20;
    use alloy_sol_types::SolCall;

    #[test]
    fn test_signatures_match_sol_bindings() {
        let interface = InterfaceDescription::trc20();

        let approve = interface.method("approve").unwrap();
        assert_eq!(approve.signature(), ITRC20::approveCall::SIGNATURE);

        let allowance = interface.method("allowance").unwrap();
        assert_eq!(allowance.signature(), ITRC20::allowanceCall::SIGNATURE);

        let balance_of = interface.method("balanceOf").unwrap();
        assert_eq!(balance_of.signature(), ITRC20::balanceOfCall::SIGNATURE);
    }

    #[test]
    fn test_fee_limit_follows_mutability() {
        let interface = InterfaceDescription::trc20();
        assert!(interface.method("approve").unwrap().requires_fee_limit());
        assert!(!interface.method("allowance").unwrap().requires_fee_limit());
        assert!(interface.method("transfer").is_none());
    }
}
