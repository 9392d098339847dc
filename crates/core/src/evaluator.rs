//! Compliance rule evaluation.
//!
//! A canonical record is classified against a reference `now` timestamp by
//! a strict, first-match-wins rule order:
//!
//! 0. a record already carrying purge markers re-derives PURGED
//! 1. revoked consent purges
//! 2. a notice older than the retention window purges as expired; failing
//!    that, a notice identifier that is absent or breaks the grammar purges
//!    as invalid
//! 3. a declared purpose outside the authorised set purges
//! 4. a missing or malformed ABHA identifier quarantines
//! 5. everything else is processed
//!
//! [`evaluate`] is pure: same record, same `now`, same outcome, no side
//! effects. [`finalize`] is the one atomic step that turns a purge decision
//! into an executed purge with its audit line, and it stamps the record's
//! disposition only after that has succeeded. A record is therefore never
//! reported PURGED without its purge having actually run.

use crate::config::CoreConfig;
use crate::purge;
use crate::record::CanonicalRecord;
use crate::ComplianceResult;
use chrono::{DateTime, Utc};
use hrc_audit::AuditSink;
use hrc_types::{
    AbhaId, ConsentStatus, Disposition, NoticeId, NoticeReference, PurgeReason, QuarantineReason,
};

/// Result of classifying one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The record passed every rule. Carries the validated notice
    /// reference for downstream consumers.
    Processed { notice: NoticeReference },
    /// Required identity data is missing or malformed.
    Quarantined(QuarantineReason),
    /// The record must be (or already was) purged.
    Purged(PurgeReason),
}

impl Outcome {
    /// The disposition this outcome maps to.
    pub fn disposition(&self) -> Disposition {
        match self {
            Outcome::Processed { .. } => Disposition::Processed,
            Outcome::Quarantined(_) => Disposition::Quarantined,
            Outcome::Purged(_) => Disposition::Purged,
        }
    }

    /// The purge reason, when the outcome is a purge.
    pub fn purge_reason(&self) -> Option<PurgeReason> {
        match self {
            Outcome::Purged(reason) => Some(*reason),
            _ => None,
        }
    }

    /// The quarantine reason, when the outcome is a quarantine.
    pub fn quarantine_reason(&self) -> Option<QuarantineReason> {
        match self {
            Outcome::Quarantined(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Classifies a record. Pure; takes no action on the record.
pub fn evaluate(record: &CanonicalRecord, config: &CoreConfig, now: DateTime<Utc>) -> Outcome {
    if record.is_purged() {
        return Outcome::Purged(PurgeReason::AlreadyPurged);
    }

    if record.consent_status() == ConsentStatus::Revoked {
        return Outcome::Purged(PurgeReason::ConsentRevoked);
    }

    if let Some(issued_on) = record.notice_date() {
        if issued_on < config.retention_threshold(now) {
            return Outcome::Purged(PurgeReason::NoticeExpired);
        }
    }

    let notice_id = match record.notice_id().as_text().map(NoticeId::parse) {
        Some(Ok(id)) => id,
        // Absent and ungrammatical identifiers are the same offence: the
        // notice cannot be verified.
        Some(Err(_)) | None => return Outcome::Purged(PurgeReason::NoticeInvalid),
    };

    if let Some(purpose) = record.data_purpose().as_text() {
        if !config.is_authorized_purpose(purpose) {
            return Outcome::Purged(PurgeReason::UnauthorizedPurpose);
        }
    }

    match record.abha_id().as_text() {
        None => return Outcome::Quarantined(QuarantineReason::MissingAbha),
        Some(id) if !AbhaId::is_canonical(id) => {
            return Outcome::Quarantined(QuarantineReason::MalformedAbha);
        }
        Some(_) => {}
    }

    Outcome::Processed {
        notice: NoticeReference::new(notice_id, record.notice_date()),
    }
}

/// Classifies a record and executes the consequences, atomically.
///
/// A purge outcome triggers [`purge::apply_purge`] synchronously; the
/// disposition is stamped on the record only after the purge and its audit
/// append have succeeded. On an audit failure the record is left without a
/// disposition and the error is escalated to the caller.
pub fn finalize(
    record: &mut CanonicalRecord,
    config: &CoreConfig,
    audit: &dyn AuditSink,
    now: DateTime<Utc>,
) -> ComplianceResult<Outcome> {
    let outcome = evaluate(record, config, now);

    if let Outcome::Purged(reason) = outcome {
        purge::apply_purge(record, reason, config, audit, now)?;
    }

    record.record_disposition(outcome.disposition());
    Ok(outcome)
}
