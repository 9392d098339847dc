//! ABHA identifier handling.
//!
//! ABHA identifiers are stored and compared in a single *canonical* form:
//! two digits, then three four-digit groups, separated by hyphens
//! (`91-1234-5678-9012`). Keeping one form only means downstream hashing,
//! equality and export never have to normalise.

use crate::{TypesError, TypesResult};
use std::{fmt, str::FromStr};

/// A validated ABHA identifier in canonical `XX-XXXX-XXXX-XXXX` form.
///
/// Once constructed, the contained identifier is guaranteed to match the
/// fixed format. Use [`AbhaId::parse`] for externally supplied values and
/// [`AbhaId::is_canonical`] for a cheap pre-check without construction.
///
/// # Construction
/// - [`AbhaId::parse`] validates an externally supplied identifier.
///
/// # Display format
/// Always the canonical hyphenated form the value was validated against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AbhaId(String);

impl AbhaId {
    /// Validates and parses an identifier that must already be canonical.
    ///
    /// This does **not** normalise other representations (spaces instead of
    /// hyphens, missing separators). Callers that accept looser input must
    /// normalise before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidInput`] if `input` is not in canonical
    /// form.
    pub fn parse(input: &str) -> TypesResult<Self> {
        if Self::is_canonical(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(TypesError::InvalidInput(format!(
            "ABHA identifier must match XX-XXXX-XXXX-XXXX, got '{input}'"
        )))
    }

    /// Returns true if `input` is in canonical ABHA form.
    ///
    /// Purely syntactic check:
    /// - exactly 17 bytes long
    /// - hyphens at offsets 2, 7 and 12
    /// - ASCII digits everywhere else
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 17
            && input.bytes().enumerate().all(|(i, b)| match i {
                2 | 7 | 12 => b == b'-',
                _ => b.is_ascii_digit(),
            })
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbhaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AbhaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for AbhaId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AbhaId::parse(s)
    }
}

impl serde::Serialize for AbhaId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for AbhaId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AbhaId::parse(&s).map_err(serde::de::Error::custom)
    }
}
