//! YAML ledger wire format for exported audit trails.
//!
//! The in-memory trail is handed to external retention tooling as a single
//! YAML document. The wire model is strict: unknown keys and malformed
//! field values are rejected on parse, so a tampered or hand-edited ledger
//! cannot slip back in unnoticed.

use crate::{AuditAction, AuditEntry, AuditError, AuditResult, SubjectReference};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema identifier stamped on every exported ledger document.
const LEDGER_SCHEMA: &str = "hrc-audit/v1";

/// Audit ledger export and import operations.
///
/// This is a zero-sized type used for namespacing ledger operations.
pub struct AuditLedger;

impl AuditLedger {
    /// Renders entries as a YAML ledger document.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidLedger`] if serialisation fails.
    pub fn render(entries: &[AuditEntry]) -> AuditResult<String> {
        let wire = LedgerWire {
            schema: LEDGER_SCHEMA.to_owned(),
            entries: entries.iter().map(entry_to_wire).collect(),
        };
        serde_yaml::to_string(&wire)
            .map_err(|e| AuditError::InvalidLedger(format!("failed to serialise ledger: {e}")))
    }

    /// Parses a YAML ledger document back into entries.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidLedger`] if:
    /// - the YAML does not match the wire schema (including unknown keys),
    /// - the schema identifier is not `hrc-audit/v1`,
    /// - any field fails strict parsing (request id, timestamp, action,
    ///   retention date).
    pub fn parse(yaml_text: &str) -> AuditResult<Vec<AuditEntry>> {
        let wire: LedgerWire = serde_yaml::from_str(yaml_text)
            .map_err(|e| AuditError::InvalidLedger(format!("ledger schema mismatch: {e}")))?;

        if wire.schema != LEDGER_SCHEMA {
            return Err(AuditError::InvalidLedger(format!(
                "expected schema '{LEDGER_SCHEMA}', got '{}'",
                wire.schema
            )));
        }

        wire.entries.into_iter().map(wire_to_entry).collect()
    }
}

/// Wire representation of an exported ledger document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LedgerWire {
    schema: String,
    entries: Vec<EntryWire>,
}

/// Wire representation of a single audit entry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryWire {
    #[serde(rename = "requestId")]
    request_id: String,

    timestamp: String,

    action: String,

    #[serde(rename = "subjectReference")]
    subject_reference: String,

    #[serde(rename = "statutoryRetentionUntil")]
    statutory_retention_until: String,
}

fn entry_to_wire(entry: &AuditEntry) -> EntryWire {
    EntryWire {
        request_id: entry.request_id.to_string(),
        timestamp: entry.timestamp.to_rfc3339(),
        action: entry.action.to_wire().to_owned(),
        subject_reference: entry.subject_reference.as_str().to_owned(),
        statutory_retention_until: entry.statutory_retention_until.to_string(),
    }
}

fn wire_to_entry(wire: EntryWire) -> AuditResult<AuditEntry> {
    let request_id = Uuid::parse_str(&wire.request_id)
        .map_err(|e| AuditError::InvalidLedger(format!("invalid request id: {e}")))?;

    let timestamp = wire
        .timestamp
        .parse::<DateTime<Utc>>()
        .map_err(|e| AuditError::InvalidLedger(format!("invalid timestamp: {e}")))?;

    let action = AuditAction::from_wire(&wire.action)
        .ok_or_else(|| AuditError::InvalidLedger(format!("unknown action '{}'", wire.action)))?;

    let statutory_retention_until = wire
        .statutory_retention_until
        .parse::<NaiveDate>()
        .map_err(|e| AuditError::InvalidLedger(format!("invalid retention date: {e}")))?;

    // Subject tokens are opaque on re-import, never re-derived.
    let subject_reference = SubjectReference::restore(wire.subject_reference);

    Ok(AuditEntry {
        request_id,
        timestamp,
        action,
        subject_reference,
        statutory_retention_until,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<AuditEntry> {
        let now: DateTime<Utc> = "2026-08-07T09:30:00Z".parse().unwrap();
        vec![
            AuditEntry::record(
                AuditAction::ConsentRevokedOverride,
                SubjectReference::from_identity("91-1234-5678-9012"),
                now,
                365,
            ),
            AuditEntry::record(
                AuditAction::CompliancePurgeSuccess,
                SubjectReference::masked(),
                now,
                365,
            ),
        ]
    }

    #[test]
    fn render_parse_round_trip() {
        let entries = sample_entries();
        let yaml = AuditLedger::render(&entries).expect("render ledger");
        let reparsed = AuditLedger::parse(&yaml).expect("parse ledger");
        assert_eq!(reparsed, entries);
    }

    #[test]
    fn rendered_ledger_is_pii_free() {
        let yaml = AuditLedger::render(&sample_entries()).unwrap();
        assert!(!yaml.contains("91-1234-5678-9012"));
        assert!(yaml.contains("hrc-audit/v1"));
        assert!(yaml.contains("CONSENT_REVOKED_OVERRIDE"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let yaml = "schema: hrc-audit/v1\nentries: []\nextra: nope\n";
        let err = AuditLedger::parse(yaml).expect_err("unknown key must fail");
        assert!(matches!(err, AuditError::InvalidLedger(_)));
    }

    #[test]
    fn rejects_wrong_schema() {
        let yaml = "schema: someone-else/v9\nentries: []\n";
        let err = AuditLedger::parse(yaml).expect_err("wrong schema must fail");
        assert!(matches!(err, AuditError::InvalidLedger(_)));
    }

    #[test]
    fn rejects_unknown_action() {
        let yaml = "\
schema: hrc-audit/v1
entries:
  - requestId: 550e8400-e29b-41d4-a716-446655440000
    timestamp: 2026-08-07T09:30:00+00:00
    action: HARD_DELETE
    subjectReference: 'deadbeef****'
    statutoryRetentionUntil: 2027-08-07
";
        let err = AuditLedger::parse(yaml).expect_err("unknown action must fail");
        assert!(matches!(err, AuditError::InvalidLedger(_)));
    }

    #[test]
    fn parses_empty_ledger() {
        let yaml = AuditLedger::render(&[]).unwrap();
        assert!(AuditLedger::parse(&yaml).unwrap().is_empty());
    }
}
