//! Consent and disposition enumerations.
//!
//! Every status that drives classification is a closed enum with an explicit
//! wire spelling. String comparison never leaks into the rule logic: a
//! typo'd consent value becomes [`ConsentStatus::Unknown`] at intake and is
//! handled as such, instead of silently falling through a string match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Consent state carried by a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConsentStatus {
    /// Consent is in force.
    Active,
    /// The Data Principal has withdrawn consent; the record must be purged.
    Revoked,
    /// Consent lapsed on its own terms.
    Expired,
    /// No recognisable consent value was supplied.
    Unknown,
}

impl ConsentStatus {
    /// Wire spelling of this status.
    pub fn to_wire(self) -> &'static str {
        match self {
            ConsentStatus::Active => "ACTIVE",
            ConsentStatus::Revoked => "REVOKED",
            ConsentStatus::Expired => "EXPIRED",
            ConsentStatus::Unknown => "UNKNOWN",
        }
    }

    /// Total, lenient parse from raw intake text.
    ///
    /// Matching ignores case and surrounding whitespace. `GRANTED` is a
    /// field-observed alias for `ACTIVE`. Anything unrecognised maps to
    /// [`ConsentStatus::Unknown`]; intake never fails on a consent cell.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" | "GRANTED" => ConsentStatus::Active,
            "REVOKED" => ConsentStatus::Revoked,
            "EXPIRED" => ConsentStatus::Expired,
            _ => ConsentStatus::Unknown,
        }
    }
}

impl fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl Serialize for ConsentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_wire())
    }
}

impl<'de> Deserialize<'de> for ConsentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ConsentStatus::from_wire(&s))
    }
}

/// Final classification of a record after rule evaluation.
///
/// `Purged` is absorbing: once a record has been purged, every later
/// evaluation of the same record must re-derive `Purged`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// The record passed all compliance rules and may flow downstream.
    Processed,
    /// Required identity data is missing; held for operator follow-up.
    Quarantined,
    /// Identity fields have been irreversibly erased.
    Purged,
}

impl Disposition {
    /// Wire spelling of this disposition.
    pub fn to_wire(self) -> &'static str {
        match self {
            Disposition::Processed => "PROCESSED",
            Disposition::Quarantined => "QUARANTINED",
            Disposition::Purged => "PURGED",
        }
    }

    /// Strict parse from the wire spelling.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "PROCESSED" => Some(Disposition::Processed),
            "QUARANTINED" => Some(Disposition::Quarantined),
            "PURGED" => Some(Disposition::Purged),
            _ => None,
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl Serialize for Disposition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Disposition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Disposition::from_wire(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown disposition '{s}'")))
    }
}

/// Why a record was purged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PurgeReason {
    /// Consent was revoked by the Data Principal.
    ConsentRevoked,
    /// The notice is older than the statutory retention window.
    NoticeExpired,
    /// The notice identifier is absent or fails the grammar.
    NoticeInvalid,
    /// The declared processing purpose is not in the authorised set.
    UnauthorizedPurpose,
    /// The record already carries purge sentinels from an earlier pass.
    AlreadyPurged,
}

impl PurgeReason {
    /// Wire spelling of this reason code.
    pub fn to_wire(self) -> &'static str {
        match self {
            PurgeReason::ConsentRevoked => "CONSENT_REVOKED",
            PurgeReason::NoticeExpired => "NOTICE_EXPIRED",
            PurgeReason::NoticeInvalid => "NOTICE_INVALID",
            PurgeReason::UnauthorizedPurpose => "UNAUTHORIZED_PURPOSE",
            PurgeReason::AlreadyPurged => "ALREADY_PURGED",
        }
    }
}

impl fmt::Display for PurgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

/// Why a record was quarantined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuarantineReason {
    /// No ABHA identifier could be mapped or recovered.
    MissingAbha,
    /// An ABHA value is present but does not match the fixed format.
    MalformedAbha,
}

impl QuarantineReason {
    /// Wire spelling of this reason code.
    pub fn to_wire(self) -> &'static str {
        match self {
            QuarantineReason::MissingAbha => "MISSING_ABHA",
            QuarantineReason::MalformedAbha => "MALFORMED_ABHA",
        }
    }
}

impl fmt::Display for QuarantineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consent_intake_is_lenient_and_total() {
        assert_eq!(ConsentStatus::from_wire("ACTIVE"), ConsentStatus::Active);
        assert_eq!(ConsentStatus::from_wire("active"), ConsentStatus::Active);
        assert_eq!(ConsentStatus::from_wire(" GRANTED "), ConsentStatus::Active);
        assert_eq!(ConsentStatus::from_wire("REVOKED"), ConsentStatus::Revoked);
        assert_eq!(ConsentStatus::from_wire("Expired"), ConsentStatus::Expired);
        assert_eq!(ConsentStatus::from_wire("REVOKEDD"), ConsentStatus::Unknown);
        assert_eq!(ConsentStatus::from_wire(""), ConsentStatus::Unknown);
        assert_eq!(ConsentStatus::from_wire("yes"), ConsentStatus::Unknown);
    }

    #[test]
    fn disposition_wire_round_trip() {
        for d in [
            Disposition::Processed,
            Disposition::Quarantined,
            Disposition::Purged,
        ] {
            assert_eq!(Disposition::from_wire(d.to_wire()), Some(d));
        }
        assert_eq!(Disposition::from_wire("processed"), None);
        assert_eq!(Disposition::from_wire("DELETED"), None);
    }

    #[test]
    fn reason_codes_have_stable_spellings() {
        assert_eq!(PurgeReason::ConsentRevoked.to_wire(), "CONSENT_REVOKED");
        assert_eq!(PurgeReason::NoticeExpired.to_wire(), "NOTICE_EXPIRED");
        assert_eq!(PurgeReason::NoticeInvalid.to_wire(), "NOTICE_INVALID");
        assert_eq!(
            PurgeReason::UnauthorizedPurpose.to_wire(),
            "UNAUTHORIZED_PURPOSE"
        );
        assert_eq!(PurgeReason::AlreadyPurged.to_wire(), "ALREADY_PURGED");
        assert_eq!(QuarantineReason::MissingAbha.to_wire(), "MISSING_ABHA");
        assert_eq!(QuarantineReason::MalformedAbha.to_wire(), "MALFORMED_ABHA");
    }

    #[test]
    fn consent_serde_round_trip() {
        let json = serde_json::to_string(&ConsentStatus::Revoked).unwrap();
        assert_eq!(json, "\"REVOKED\"");
        let back: ConsentStatus = serde_json::from_str("\"granted\"").unwrap();
        assert_eq!(back, ConsentStatus::Active);
    }

    #[test]
    fn disposition_serde_is_strict() {
        let json = serde_json::to_string(&Disposition::Quarantined).unwrap();
        assert_eq!(json, "\"QUARANTINED\"");
        let bad: Result<Disposition, _> = serde_json::from_str("\"quarantined\"");
        assert!(bad.is_err());
    }
}
