//! Contract bindings for the TRC20 token the client talks to.
//!
//! This crate consolidates:
//! - The TRC20 interface, both as a `sol!` definition and as the runtime
//!   [`InterfaceDescription`] handed to wallet providers
//! - Argument values and static ABI word encoding
//! - TRON base58check address conversion

pub mod abi;
pub mod address;
pub mod interface;
pub mod token;
pub mod value;

pub use abi::AbiError;
pub use interface::{InterfaceDescription, MethodDescriptor, Mutability, Param, ParamType};
pub use value::Value;
