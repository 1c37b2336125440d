//! Static ABI encoding through `alloy_sol_types`.
//!
//! Every type in [`ParamType`] is static, so a parameter list is a sequence
//! of single-word tokens.

use crate::{
    address::{decode_address, encode_address},
    Param, ParamType, Value,
};
use alloy_sol_types::{
    abi::{self, token::DynSeqToken, token::WordToken},
    sol_data, SolType,
};
use thiserror::Error;

const WORD: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Expected {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("Argument {index} must be {expected}, got {actual}")]
    ArgumentType {
        index: usize,
        expected: ParamType,
        actual: ParamType,
    },

    #[error("Output too short: need {expected} bytes, got {actual}")]
    ShortOutput { expected: usize, actual: usize },

    #[error("Invalid {kind} output: {reason}")]
    Decode { kind: ParamType, reason: String },
}

/// Check arguments against a method's declared inputs.
pub fn check_args(params: &[Param], args: &[Value]) -> Result<(), AbiError> {
    if params.len() != args.len() {
        return Err(AbiError::ArgumentCount {
            expected: params.len(),
            actual: args.len(),
        });
    }

    for (index, (param, arg)) in params.iter().zip(args).enumerate() {
        if param.kind != arg.kind() {
            return Err(AbiError::ArgumentType {
                index,
                expected: param.kind,
                actual: arg.kind(),
            });
        }
    }

    Ok(())
}

fn token(value: &Value) -> Result<WordToken, AbiError> {
    Ok(match value {
        Value::Address(address) => WordToken::from(decode_address(address)?.into_word()),
        Value::Uint(value) => WordToken::from(*value),
        Value::Bool(value) => WordToken::from(*value),
    })
}

/// Encode call arguments (without selector).
pub fn encode_params(args: &[Value]) -> Result<Vec<u8>, AbiError> {
    let tokens = args.iter().map(token).collect::<Result<Vec<_>, _>>()?;
    Ok(abi::encode_sequence(&DynSeqToken(tokens)))
}

fn decode_value(kind: ParamType, word: &[u8]) -> Result<Value, AbiError> {
    let invalid = |err: alloy_sol_types::Error| AbiError::Decode {
        kind,
        reason: err.to_string(),
    };
    match kind {
        ParamType::Address => sol_data::Address::abi_decode_validate(word)
            .map(|address| Value::Address(encode_address(address)))
            .map_err(invalid),
        ParamType::Uint256 => sol_data::Uint::<256>::abi_decode_validate(word)
            .map(Value::Uint)
            .map_err(invalid),
        ParamType::Bool => sol_data::Bool::abi_decode_validate(word)
            .map(Value::Bool)
            .map_err(invalid),
    }
}

/// Decode return data according to a method's declared outputs.
pub fn decode_outputs(params: &[Param], data: &[u8]) -> Result<Vec<Value>, AbiError> {
    let expected = params.len() * WORD;
    if data.len() < expected {
        return Err(AbiError::ShortOutput {
            expected,
            actual: data.len(),
        });
    }

    params
        .iter()
        .zip(data.chunks_exact(WORD))
        .map(|(param, word)| decode_value(param.kind, word))
        .collect()
}
