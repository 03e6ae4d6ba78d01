//! Caller identity type with `0x` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::LearnopolyError;

/// An account identity: the opaque address of whoever invokes a ledger operation.
///
/// Rendered as `0x` followed by 40 lowercase hex digits. The ledger never
/// verifies an identity, it only compares them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity([u8; 20]);

impl Identity {
    /// The standard prefix for textual identities.
    pub const PREFIX: &'static str = "0x";

    /// Length of the raw identity in bytes.
    pub const LEN: usize = 20;

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse an identity from its textual form (`0x` + 40 hex digits, either case).
    pub fn parse(s: &str) -> Result<Self, LearnopolyError> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| LearnopolyError::InvalidIdentity(format!("{s}: missing 0x prefix")))?;
        if digits.len() != Self::LEN * 2 {
            return Err(LearnopolyError::InvalidIdentity(format!(
                "{s}: expected {} hex digits, got {}",
                Self::LEN * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| LearnopolyError::InvalidIdentity(format!("{s}: {e}")))?;
        Ok(Self(bytes))
    }

    /// Build an identity from a raw byte slice (as read back from storage).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LearnopolyError> {
        let arr: [u8; 20] = bytes.try_into().map_err(|_| {
            LearnopolyError::InvalidIdentity(format!("expected 20 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({}..)", hex::encode(&self.0[..4]))
    }
}

impl FromStr for Identity {
    type Err = LearnopolyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = LearnopolyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        id.to_string()
    }
}
