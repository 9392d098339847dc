//! Versioned consent notice identifiers.
//!
//! Notice identifiers follow the grammar `N-<year>-<type>-v<major>.<minor>`,
//! for example `N-2026-XYZ-v1.1`:
//! - a literal `N`
//! - a four digit year
//! - a type code of 2 to 8 uppercase ASCII letters or digits
//! - a sub-versioned revision, `v` then `<major>.<minor>`
//!
//! Anything that does not match the grammar exactly is invalid. There is no
//! lenient mode: legacy un-versioned identifiers must be rejected, not
//! coerced.

use crate::{TypesError, TypesResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const TYPE_CODE_MIN: usize = 2;
const TYPE_CODE_MAX: usize = 8;

/// A parsed, grammar-valid notice identifier.
///
/// The components are kept separately so callers can reason about the year
/// or revision without re-parsing, and [`fmt::Display`] reproduces the
/// exact wire spelling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NoticeId {
    year: u16,
    type_code: String,
    major: u32,
    minor: u32,
}

impl NoticeId {
    /// Parses an identifier against the notice grammar.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidInput`] unless `input` matches
    /// `N-<YYYY>-<TYPE>-v<major>.<minor>` exactly.
    pub fn parse(input: &str) -> TypesResult<Self> {
        let invalid = || {
            TypesError::InvalidInput(format!(
                "notice identifier must match N-<YYYY>-<TYPE>-v<major>.<minor>, got '{input}'"
            ))
        };

        let rest = input.strip_prefix("N-").ok_or_else(invalid)?;

        let (year_str, rest) = rest.split_once('-').ok_or_else(invalid)?;
        if year_str.len() != 4 || !year_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: u16 = year_str.parse().map_err(|_| invalid())?;

        let (type_code, version) = rest.split_once('-').ok_or_else(invalid)?;
        if !(TYPE_CODE_MIN..=TYPE_CODE_MAX).contains(&type_code.len())
            || !type_code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let version = version.strip_prefix('v').ok_or_else(invalid)?;
        let (major_str, minor_str) = version.split_once('.').ok_or_else(invalid)?;
        if major_str.is_empty()
            || minor_str.is_empty()
            || !major_str.bytes().all(|b| b.is_ascii_digit())
            || !minor_str.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        Ok(Self {
            year,
            type_code: type_code.to_owned(),
            major: major_str.parse().map_err(|_| invalid())?,
            minor: minor_str.parse().map_err(|_| invalid())?,
        })
    }

    /// Returns true if `input` satisfies the notice grammar.
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// The notice year component.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// The notice type code component.
    pub fn type_code(&self) -> &str {
        &self.type_code
    }

    /// The major revision number.
    pub fn major(&self) -> u32 {
        self.major
    }

    /// The minor revision number.
    pub fn minor(&self) -> u32 {
        self.minor
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N-{:04}-{}-v{}.{}",
            self.year, self.type_code, self.major, self.minor
        )
    }
}

impl FromStr for NoticeId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoticeId::parse(s)
    }
}

impl Serialize for NoticeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NoticeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NoticeId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A grammar-valid notice identifier together with its issuance date.
///
/// This is the shape a record's notice fields take once validation has
/// succeeded; the issuance date stays optional because a notice can be
/// referenced before its date column ever arrived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeReference {
    /// The validated notice identifier.
    pub id: NoticeId,
    /// The notice issuance date, when one was supplied.
    pub issued_on: Option<NaiveDate>,
}

impl NoticeReference {
    /// Creates a reference from an already validated identifier.
    pub fn new(id: NoticeId, issued_on: Option<NaiveDate>) -> Self {
        Self { id, issued_on }
    }

    /// Returns true if the notice was issued strictly before `threshold`.
    ///
    /// A reference without an issuance date is never considered expired;
    /// age cannot be established for it.
    pub fn issued_before(&self, threshold: NaiveDate) -> bool {
        match self.issued_on {
            Some(date) => date < threshold,
            None => false,
        }
    }
}
