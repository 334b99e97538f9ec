//! Content digests used for change detection.

use crate::error::{Result, YurtleError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A BLAKE3 digest of a file's raw bytes, or the distinguished "unknown"
/// value.
///
/// Digests are only ever compared for equality against each other to decide
/// whether a file changed since it was last read or written. An unknown
/// digest (a file that could not be hashed, or a record created by a
/// mutation before the file was ever written) never matches anything,
/// including another unknown digest.
///
/// # Examples
///
/// ```
/// use yurtle_core::ContentDigest;
///
/// let a = ContentDigest::of(b"---\n<urn:a> <urn:p> \"x\" .\n---\n");
/// let b = ContentDigest::of(b"---\n<urn:a> <urn:p> \"x\" .\n---\n");
/// assert!(a.matches(&b));
/// assert!(!ContentDigest::unknown().matches(&ContentDigest::unknown()));
/// assert_eq!(a.as_hex().len(), 64);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentDigest(Option<[u8; 32]>);

impl ContentDigest {
    /// The length of a known digest as a hex string.
    pub const HEX_LEN: usize = 64;

    /// Computes the digest of raw bytes.
    pub fn of(data: &[u8]) -> Self {
        Self(Some(*blake3::hash(data).as_bytes()))
    }

    /// Returns the unknown digest.
    pub const fn unknown() -> Self {
        Self(None)
    }

    /// Returns true if this digest was computed from real bytes.
    pub fn is_known(&self) -> bool {
        self.0.is_some()
    }

    /// Equality oracle for change detection. Unknown matches nothing.
    pub fn matches(&self, other: &ContentDigest) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Returns this digest as a lowercase hex string, or the empty string
    /// when unknown.
    pub fn as_hex(&self) -> String {
        self.0.map(hex::encode).unwrap_or_default()
    }

    /// Parses a digest from its hex form. The empty string parses as
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns `YurtleError::InvalidHex` for non-hex input or a wrong length.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::unknown());
        }
        if s.len() != Self::HEX_LEN {
            return Err(YurtleError::InvalidHex(format!(
                "expected {} hex chars, got {}",
                Self::HEX_LEN,
                s.len()
            )));
        }

        let bytes = hex::decode(s).map_err(|e| YurtleError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| YurtleError::InvalidHex("invalid length".to_string()))?;

        Ok(Self(Some(arr)))
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str(&self.as_hex()),
            None => f.write_str("<unknown>"),
        }
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => write!(f, "ContentDigest({}...)", &self.as_hex()[..12]),
            None => f.write_str("ContentDigest(unknown)"),
        }
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentDigest::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
