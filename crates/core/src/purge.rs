//! Purge execution and pseudonymization.
//!
//! Purging makes a record's identity fields permanently unrecoverable while
//! leaving a verifiable, non-identifying trace in the audit log. The trace
//! token is derived from the pre-purge identifier and stored only in the
//! audit entry, never on the record.
//!
//! Ordering inside [`apply_purge`] carries the atomicity guarantee: the
//! audit entry is appended first, and the in-memory overwrite that follows
//! cannot fail, so a confirmed append always corresponds to a purge that
//! completed. If the append fails, the record is left untouched and the
//! error escalates; the caller must not finalise the record.

use crate::config::CoreConfig;
use crate::record::CanonicalRecord;
use crate::{ComplianceError, ComplianceResult};
use chrono::{DateTime, Utc};
use hrc_audit::{AuditAction, AuditEntry, AuditSink, SubjectReference};
use hrc_types::PurgeReason;

/// Erases the record's PII-bearing fields and appends the audit line.
///
/// Returns the appended entry, or `None` when the record already carried
/// purge markers: purging twice is a no-op, never a second audit action and
/// never a path back to the original values.
///
/// # Errors
///
/// Returns [`ComplianceError::AuditAppend`] if the sink rejects the entry.
/// The record is not modified in that case.
pub fn apply_purge(
    record: &mut CanonicalRecord,
    reason: PurgeReason,
    config: &CoreConfig,
    audit: &dyn AuditSink,
    now: DateTime<Utc>,
) -> ComplianceResult<Option<AuditEntry>> {
    if record.is_purged() {
        return Ok(None);
    }

    let subject = match record.abha_id().as_text() {
        Some(identity) => SubjectReference::from_identity(identity),
        None => SubjectReference::masked(),
    };

    let action = match reason {
        PurgeReason::ConsentRevoked => AuditAction::ConsentRevokedOverride,
        _ => AuditAction::CompliancePurgeSuccess,
    };

    let entry = AuditEntry::record(action, subject.clone(), now, config.retention_days());
    audit
        .append(entry.clone())
        .map_err(|source| ComplianceError::AuditAppend {
            subject: subject.to_string(),
            source,
        })?;

    record.erase_pii_fields();

    tracing::info!(
        action = action.to_wire(),
        reason = reason.to_wire(),
        subject = subject.as_str(),
        "record purged"
    );

    Ok(Some(entry))
}

/// Replaces direct identifiers with stable pseudonymous tokens, in place.
///
/// The patient name becomes `Pt_<token>` and the ABHA identifier
/// `ABHA_<token>`, where the token is the same truncated one-way hash used
/// for audit subject references. Equal inputs yield equal tokens, so
/// cohorts survive pseudonymization while identification does not.
///
/// Absent and purged fields are left untouched; this never writes to an
/// audit log and never changes a disposition.
pub fn pseudonymize(record: &mut CanonicalRecord) {
    if let Some(name) = record.patient_name().as_text() {
        let token = format!("Pt_{}", SubjectReference::from_identity(name));
        record.set_patient_name_token(token);
    }

    if let Some(identity) = record.abha_id().as_text() {
        let token = format!("ABHA_{}", SubjectReference::from_identity(identity));
        record.set_abha_token(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PURGE_SENTINEL;
    use crate::mapper::canonicalize;
    use crate::record::RawRecord;
    use hrc_audit::{AuditError, MemoryAuditLog};

    fn fixed_now() -> DateTime<Utc> {
        "2026-08-07T12:00:00Z".parse().unwrap()
    }

    fn revoked_record() -> CanonicalRecord {
        canonicalize(&RawRecord::from_pairs([
            ("ABHA_ID", "91-1234-5678-9012"),
            ("Patient_Name", "Vikram M."),
            ("Clinical_Payload", "diagnosis: viral fever"),
            ("Consent_Status", "REVOKED"),
        ]))
    }

    /// Sink that refuses every append.
    struct FailingSink;

    impl AuditSink for FailingSink {
        fn append(&self, _entry: AuditEntry) -> Result<(), AuditError> {
            Err(AuditError::Append("ledger store unavailable".into()))
        }
    }

    #[test]
    fn purge_overwrites_pii_and_appends_one_entry() {
        let mut record = revoked_record();
        let log = MemoryAuditLog::new();

        let entry = apply_purge(
            &mut record,
            PurgeReason::ConsentRevoked,
            &CoreConfig::default(),
            &log,
            fixed_now(),
        )
        .expect("purge succeeds")
        .expect("first purge appends an entry");

        let export = record.export();
        assert_eq!(export.patient_name.as_deref(), Some(PURGE_SENTINEL));
        assert_eq!(export.abha_id.as_deref(), Some(PURGE_SENTINEL));
        assert_eq!(export.clinical_payload.as_deref(), Some(PURGE_SENTINEL));

        assert_eq!(log.len(), 1);
        assert_eq!(entry.action, AuditAction::ConsentRevokedOverride);
        assert_eq!(
            entry.subject_reference,
            SubjectReference::from_identity("91-1234-5678-9012")
        );
    }

    #[test]
    fn audit_entry_is_not_reversible_to_the_identity() {
        let mut record = revoked_record();
        let log = MemoryAuditLog::new();
        apply_purge(
            &mut record,
            PurgeReason::ConsentRevoked,
            &CoreConfig::default(),
            &log,
            fixed_now(),
        )
        .unwrap();

        for entry in log.snapshot() {
            let serialised = serde_json::to_string(&entry).unwrap();
            assert!(!serialised.contains("91-1234-5678-9012"));
            assert!(!serialised.contains("Vikram"));
            assert!(!serialised.contains("viral fever"));
        }
    }

    #[test]
    fn purge_is_idempotent() {
        let mut record = revoked_record();
        let log = MemoryAuditLog::new();
        let config = CoreConfig::default();

        let first = apply_purge(
            &mut record,
            PurgeReason::ConsentRevoked,
            &config,
            &log,
            fixed_now(),
        )
        .unwrap();
        assert!(first.is_some());

        let second = apply_purge(
            &mut record,
            PurgeReason::ConsentRevoked,
            &config,
            &log,
            fixed_now(),
        )
        .unwrap();
        assert!(second.is_none());
        assert_eq!(log.len(), 1);
        assert_eq!(record.export().abha_id.as_deref(), Some(PURGE_SENTINEL));
    }

    #[test]
    fn non_revocation_purges_use_the_compliance_action_tag() {
        let mut record = revoked_record();
        let log = MemoryAuditLog::new();
        let entry = apply_purge(
            &mut record,
            PurgeReason::NoticeExpired,
            &CoreConfig::default(),
            &log,
            fixed_now(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(entry.action, AuditAction::CompliancePurgeSuccess);
    }

    #[test]
    fn purge_without_identity_masks_the_subject() {
        let mut record = canonicalize(&RawRecord::from_pairs([
            ("Patient_Name", "Vikram M."),
            ("Consent_Status", "REVOKED"),
        ]));
        let log = MemoryAuditLog::new();
        let entry = apply_purge(
            &mut record,
            PurgeReason::ConsentRevoked,
            &CoreConfig::default(),
            &log,
            fixed_now(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(entry.subject_reference, SubjectReference::masked());
    }

    #[test]
    fn failed_append_leaves_the_record_untouched() {
        let mut record = revoked_record();
        let before = record.clone();

        let result = apply_purge(
            &mut record,
            PurgeReason::ConsentRevoked,
            &CoreConfig::default(),
            &FailingSink,
            fixed_now(),
        );

        match result {
            Err(ComplianceError::AuditAppend { subject, .. }) => {
                assert!(!subject.contains("91-1234-5678-9012"));
            }
            other => panic!("expected AuditAppend error, got {other:?}"),
        }
        assert_eq!(record, before);
        assert!(!record.is_purged());
        assert_eq!(record.disposition(), None);
    }

    #[test]
    fn entry_retention_matches_configured_window() {
        let mut record = revoked_record();
        let log = MemoryAuditLog::new();
        let config = CoreConfig::new(30, vec![]).unwrap();
        let entry = apply_purge(
            &mut record,
            PurgeReason::ConsentRevoked,
            &config,
            &log,
            fixed_now(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            entry.statutory_retention_until,
            chrono::NaiveDate::from_ymd_opt(2026, 9, 6).unwrap()
        );
    }

    #[test]
    fn pseudonymize_replaces_identifiers_with_stable_tokens() {
        let mut record = canonicalize(&RawRecord::from_pairs([
            ("ABHA_ID", "91-1234-5678-9012"),
            ("Patient_Name", "Asha Rao"),
            ("Consent_Status", "ACTIVE"),
        ]));
        pseudonymize(&mut record);

        let name = record.patient_name().as_text().unwrap().to_owned();
        let id = record.abha_id().as_text().unwrap().to_owned();
        assert!(name.starts_with("Pt_"));
        assert!(id.starts_with("ABHA_"));
        assert!(!name.contains("Asha"));
        assert!(!id.contains("91-1234-5678-9012"));

        // Stable across records carrying the same identity.
        let mut again = canonicalize(&RawRecord::from_pairs([
            ("ABHA_ID", "91-1234-5678-9012"),
            ("Patient_Name", "Asha Rao"),
        ]));
        pseudonymize(&mut again);
        assert_eq!(again.patient_name().as_text(), Some(name.as_str()));
        assert_eq!(again.abha_id().as_text(), Some(id.as_str()));
    }

    #[test]
    fn pseudonymize_skips_absent_and_purged_fields() {
        let mut record = revoked_record();
        let log = MemoryAuditLog::new();
        apply_purge(
            &mut record,
            PurgeReason::ConsentRevoked,
            &CoreConfig::default(),
            &log,
            fixed_now(),
        )
        .unwrap();

        let before = record.clone();
        pseudonymize(&mut record);
        assert_eq!(record, before);

        let mut empty = canonicalize(&RawRecord::new());
        pseudonymize(&mut empty);
        assert!(empty.patient_name().is_absent());
        assert!(empty.abha_id().is_absent());
    }
}
