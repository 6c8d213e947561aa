use std::fmt;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Session identifier issued by `login_sid.lua`.
///
/// Sixteen zeros is the gateway's "not authenticated" marker; a session
/// holding it is never valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// The "not authenticated" sentinel.
    pub const INVALID: &'static str = "0000000000000000";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A session id carrying the sentinel value.
    pub fn invalid() -> Self {
        Self(Self::INVALID.to_owned())
    }

    /// `true` unless the id is empty or the zero sentinel.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0 != Self::INVALID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One `<Name>`/`<Access>` pair from the login response's `<Rights>` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRight {
    pub name: String,
    pub access: u8,
}

/// Compute the challenge response for `login_sid.lua`.
///
/// `challenge-md5hex(utf16le(challenge-password))`. The gateway hashes the
/// UTF-16LE form of Latin-1 text, so code points above U+00FF cannot be
/// represented and are rejected rather than silently mangled.
pub fn login_response(challenge: &str, password: &str) -> Result<String, Error> {
    if password.chars().any(|c| u32::from(c) > 0xFF) {
        return Err(Error::CredentialEncoding);
    }

    let plain = format!("{challenge}-{password}");
    let bytes: Vec<u8> = plain.encode_utf16().flat_map(u16::to_le_bytes).collect();
    let digest = Md5::digest(&bytes);

    Ok(format!("{challenge}-{}", hex::encode(digest)))
}
