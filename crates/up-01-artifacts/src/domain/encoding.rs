//! # Call Encoding
//!
//! SCALE encoding for the argument kinds the proxy contracts use.
//! Call data is the 4-byte selector followed by each argument in order.

use crate::domain::metadata::CallSpec;
use crate::errors::ArtifactError;
use parity_scale_codec::{Decode, DecodeAll, Encode, Input};
use shared_types::{AccountId, Bytes, CodeHash};

/// A typed argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgValue {
    /// `bool`, one byte.
    Bool(bool),
    /// `i32`, little-endian.
    I32(i32),
    /// `u32`, little-endian.
    U32(u32),
    /// `u128` / `Balance`, little-endian.
    U128(u128),
    /// 32-byte account.
    AccountId(AccountId),
    /// 32-byte code hash.
    Hash(CodeHash),
}

impl ArgValue {
    /// Name used in mismatch errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::U32(_) => "u32",
            Self::U128(_) => "u128",
            Self::AccountId(_) => "AccountId",
            Self::Hash(_) => "Hash",
        }
    }

    /// Whether this value can be passed where `declared` is expected.
    ///
    /// `AccountId` and `Hash` share the same 32-byte encoding and are
    /// interchangeable. Unknown declared types accept any value.
    #[must_use]
    pub fn fits(&self, declared: &str) -> bool {
        match declared {
            "bool" => matches!(self, Self::Bool(_)),
            "i32" => matches!(self, Self::I32(_)),
            "u32" => matches!(self, Self::U32(_)),
            "u128" | "Balance" => matches!(self, Self::U128(_)),
            "AccountId" | "Hash" => matches!(self, Self::AccountId(_) | Self::Hash(_)),
            _ => true,
        }
    }

    /// Append the SCALE encoding of this value.
    pub fn encode_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bool(v) => v.encode_to(out),
            Self::I32(v) => v.encode_to(out),
            Self::U32(v) => v.encode_to(out),
            Self::U128(v) => v.encode_to(out),
            Self::AccountId(id) => id.encode_to(out),
            Self::Hash(hash) => hash.encode_to(out),
        }
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<AccountId> for ArgValue {
    fn from(id: AccountId) -> Self {
        Self::AccountId(id)
    }
}

impl From<CodeHash> for ArgValue {
    fn from(hash: CodeHash) -> Self {
        Self::Hash(hash)
    }
}

/// Encode `selector ++ args` after checking arity and types against `spec`.
pub fn encode_call(spec: &CallSpec, args: &[ArgValue]) -> Result<Bytes, ArtifactError> {
    if spec.args.len() != args.len() {
        return Err(ArtifactError::ArityMismatch {
            label: spec.label.clone(),
            expected: spec.args.len(),
            actual: args.len(),
        });
    }

    let mut out = Vec::with_capacity(4 + args.len() * 32);
    out.extend_from_slice(&spec.selector.0);

    for (declared, value) in spec.args.iter().zip(args) {
        if !value.fits(declared.ty.name()) {
            return Err(ArtifactError::TypeMismatch {
                label: spec.label.clone(),
                arg: declared.label.clone(),
                expected: declared.ty.name().to_string(),
                actual: value.type_name(),
            });
        }
        value.encode_to(&mut out);
    }

    Ok(Bytes::from(out))
}

/// Error half of a `Result`-wrapped message output, kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ErrorOutput(Vec<u8>);

impl Decode for ErrorOutput {
    fn decode<I: Input>(input: &mut I) -> Result<Self, parity_scale_codec::Error> {
        let mut data = vec![0u8; input.remaining_len()?.unwrap_or(0)];
        input.read(&mut data)?;
        Ok(Self(data))
    }
}

/// Decode message output as `T`.
///
/// The bare encoding is tried first. Otherwise the output must be a
/// `Result<T, E>`: `Ok` yields the value and `Err` is reported as
/// [`ArtifactError::ContractError`] with the undecoded error bytes.
pub fn decode_output<T: Decode>(data: &[u8], expected: &'static str) -> Result<T, ArtifactError> {
    if let Ok(value) = T::decode_all(&mut &*data) {
        return Ok(value);
    }
    match Result::<T, ErrorOutput>::decode_all(&mut &*data) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(ErrorOutput(error))) => Err(ArtifactError::ContractError { expected, error }),
        Err(_) => Err(ArtifactError::OutputDecode {
            expected,
            actual: data.len(),
        }),
    }
}

/// Decode an `i32` return value, e.g. the proxy's `average`.
pub fn decode_i32(data: &[u8]) -> Result<i32, ArtifactError> {
    decode_output(data, "i32")
}
