//! Audit entry value objects.
//!
//! An entry records that an action happened to a subject, without carrying
//! anything that identifies the subject. The only link back is a truncated
//! one-way hash; the pre-image lives in the (deliberately not retained)
//! pre-purge record and nowhere else.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Number of leading hex characters of the digest kept in a trace token.
const TRACE_HEX_LEN: usize = 8;

/// Fixed token used when no identity value existed to hash.
const MASKED_TOKEN: &str = "****";

/// One-way trace token standing in for a subject identity.
///
/// Built from the first 8 hex characters of the SHA-256 digest of the
/// identity value, suffixed with `****` (12 characters total). When the
/// record never had an identity value, the bare masked token `****` is used
/// instead. Equal identities produce equal tokens, so an operator holding
/// the master index can verify a trace without the log ever storing the
/// identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubjectReference(String);

impl SubjectReference {
    /// Derives the trace token for an identity value.
    ///
    /// Empty or whitespace-only input yields the masked token; hashing
    /// nothing would otherwise mint a stable token for "no identity".
    pub fn from_identity(identity: &str) -> Self {
        let trimmed = identity.trim();
        if trimmed.is_empty() {
            return Self::masked();
        }
        let digest = Sha256::digest(trimmed.as_bytes());
        let hexdigest = hex::encode(digest);
        Self(format!("{}{MASKED_TOKEN}", &hexdigest[..TRACE_HEX_LEN]))
    }

    /// The fixed token for records with no identity value at all.
    pub fn masked() -> Self {
        Self(MASKED_TOKEN.to_owned())
    }

    /// Restores a token previously minted by this type.
    ///
    /// Used when re-importing exported ledgers; tokens are opaque once
    /// minted and are never re-derived.
    pub(crate) fn restore(token: String) -> Self {
        Self(token)
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SubjectReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SubjectReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Tokens are opaque once minted; deserialisation restores, it does
        // not re-derive.
        let s = String::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

/// Action tag attached to an audit entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuditAction {
    /// PII erased because the Data Principal revoked consent.
    ConsentRevokedOverride,
    /// PII erased by a compliance rule (expired or invalid notice,
    /// unauthorised purpose).
    CompliancePurgeSuccess,
}

impl AuditAction {
    /// Wire spelling of this action.
    pub fn to_wire(self) -> &'static str {
        match self {
            AuditAction::ConsentRevokedOverride => "CONSENT_REVOKED_OVERRIDE",
            AuditAction::CompliancePurgeSuccess => "COMPLIANCE_PURGE_SUCCESS",
        }
    }

    /// Strict parse from the wire spelling.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "CONSENT_REVOKED_OVERRIDE" => Some(AuditAction::ConsentRevokedOverride),
            "COMPLIANCE_PURGE_SUCCESS" => Some(AuditAction::CompliancePurgeSuccess),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl Serialize for AuditAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_wire())
    }
}

impl<'de> Deserialize<'de> for AuditAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AuditAction::from_wire(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown audit action '{s}'")))
    }
}

/// One immutable line of audit lineage.
///
/// Entries are created once per disposition-affecting event and never
/// mutated. No field contains, or is reversible to, a raw identity value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique token for this entry.
    pub request_id: Uuid,
    /// When the action was taken.
    pub timestamp: DateTime<Utc>,
    /// What was done.
    pub action: AuditAction,
    /// One-way trace token for the affected subject.
    pub subject_reference: SubjectReference,
    /// Date until which this entry must be retained.
    pub statutory_retention_until: NaiveDate,
}

impl AuditEntry {
    /// Builds an entry for an action taken at `now`.
    ///
    /// A fresh v4 request identifier is generated and the retention horizon
    /// is stamped `retention_days` ahead of `now`.
    pub fn record(
        action: AuditAction,
        subject_reference: SubjectReference,
        now: DateTime<Utc>,
        retention_days: i64,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timestamp: now,
            action,
            subject_reference,
            statutory_retention_until: (now + Duration::days(retention_days)).date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_token_has_fixed_length() {
        let token = SubjectReference::from_identity("91-1234-5678-9012");
        assert_eq!(token.as_str().len(), TRACE_HEX_LEN + MASKED_TOKEN.len());
        assert!(token.as_str().ends_with("****"));
    }

    #[test]
    fn trace_token_is_deterministic_and_discriminating() {
        let a = SubjectReference::from_identity("91-1234-5678-9012");
        let b = SubjectReference::from_identity("91-1234-5678-9012");
        let c = SubjectReference::from_identity("91-1234-5678-9013");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn trace_token_never_contains_the_identity() {
        let identity = "91-1234-5678-9012";
        let token = SubjectReference::from_identity(identity);
        assert!(!token.as_str().contains(identity));
        assert!(!token.as_str().contains("1234"));

        let name_token = SubjectReference::from_identity("Vikram M.");
        assert!(!name_token.as_str().contains("Vikram"));
    }

    #[test]
    fn empty_identity_yields_masked_token() {
        assert_eq!(SubjectReference::from_identity(""), SubjectReference::masked());
        assert_eq!(
            SubjectReference::from_identity("   "),
            SubjectReference::masked()
        );
        assert_eq!(SubjectReference::masked().as_str(), "****");
    }

    #[test]
    fn entry_stamps_retention_horizon() {
        let now: DateTime<Utc> = "2026-08-07T10:00:00Z".parse().unwrap();
        let entry = AuditEntry::record(
            AuditAction::CompliancePurgeSuccess,
            SubjectReference::from_identity("91-1234-5678-9012"),
            now,
            365,
        );
        assert_eq!(entry.timestamp, now);
        assert_eq!(
            entry.statutory_retention_until,
            NaiveDate::from_ymd_opt(2027, 8, 7).unwrap()
        );
    }

    #[test]
    fn entries_get_unique_request_ids() {
        let now = Utc::now();
        let subject = SubjectReference::masked();
        let a = AuditEntry::record(AuditAction::ConsentRevokedOverride, subject.clone(), now, 365);
        let b = AuditEntry::record(AuditAction::ConsentRevokedOverride, subject, now, 365);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn action_wire_round_trip() {
        for action in [
            AuditAction::ConsentRevokedOverride,
            AuditAction::CompliancePurgeSuccess,
        ] {
            assert_eq!(AuditAction::from_wire(action.to_wire()), Some(action));
        }
        assert_eq!(AuditAction::from_wire("PURGE"), None);
    }

    #[test]
    fn entry_serialises_without_raw_identity() {
        let now: DateTime<Utc> = "2026-08-07T10:00:00Z".parse().unwrap();
        let entry = AuditEntry::record(
            AuditAction::ConsentRevokedOverride,
            SubjectReference::from_identity("91-1234-5678-9012"),
            now,
            365,
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("91-1234-5678-9012"));
        assert!(json.contains("CONSENT_REVOKED_OVERRIDE"));
        assert!(json.contains("2027-08-07"));
    }
}
