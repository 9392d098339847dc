//! Batch processing facade.
//!
//! [`ComplianceService`] strings the stages together for one record at a
//! time: canonicalize, recover, finalize. Records are independent of each
//! other; the only shared resource is the audit sink, which serialises its
//! own appends. The service takes `&self` throughout, so callers that want
//! parallel throughput can shard a batch across threads over one shared
//! service instance.
//!
//! One record's failure never aborts a batch. Audit-append failures are
//! captured per record in the batch report and the remaining rows keep
//! flowing.

use crate::config::CoreConfig;
use crate::evaluator::{finalize, Outcome};
use crate::mapper::canonicalize;
use crate::record::{CanonicalRecord, RawRecord};
use crate::recovery::recover;
use crate::redact::redact_pii;
use crate::ComplianceResult;
use chrono::{DateTime, Utc};
use hrc_audit::AuditSink;
use hrc_types::Disposition;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A fully processed record with its classification.
#[derive(Clone, Debug)]
pub struct ProcessedRecord {
    /// The canonical record, post recovery and (where applicable) purge.
    pub record: CanonicalRecord,
    /// The classification outcome.
    pub outcome: Outcome,
}

/// Disposition and reason tallies for one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Rows submitted.
    pub total: usize,
    /// Rows classified PROCESSED.
    pub processed: usize,
    /// Rows classified QUARANTINED.
    pub quarantined: usize,
    /// Rows classified PURGED.
    pub purged: usize,
    /// Rows whose processing failed (audit append could not be confirmed).
    pub failed: usize,
    /// Purge counts by reason code.
    pub purge_reasons: BTreeMap<String, usize>,
    /// Quarantine counts by reason code.
    pub quarantine_reasons: BTreeMap<String, usize>,
}

/// Per-record results plus the batch summary.
#[derive(Debug)]
pub struct BatchReport {
    /// One result per submitted row, in submission order.
    pub results: Vec<ComplianceResult<ProcessedRecord>>,
    /// Aggregate tallies over `results`.
    pub summary: BatchSummary,
}

/// Record-at-a-time compliance processing over a shared audit sink.
pub struct ComplianceService {
    config: CoreConfig,
    audit: Arc<dyn AuditSink>,
}

impl ComplianceService {
    /// Creates a service from startup-resolved configuration and a sink.
    pub fn new(config: CoreConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self { config, audit }
    }

    /// The configuration this service evaluates against.
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Runs one row through the full pipeline against an explicit `now`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ComplianceError::AuditAppend`] if the row required
    /// a purge whose audit entry could not be appended. The record is not
    /// finalised in that case.
    pub fn process_record(
        &self,
        raw: &RawRecord,
        now: DateTime<Utc>,
    ) -> ComplianceResult<ProcessedRecord> {
        let mut record = canonicalize(raw);
        recover(&mut record, raw);
        let outcome = finalize(&mut record, &self.config, self.audit.as_ref(), now)?;
        Ok(ProcessedRecord { record, outcome })
    }

    /// [`Self::process_record`] against the current wall clock.
    pub fn process_record_now(&self, raw: &RawRecord) -> ComplianceResult<ProcessedRecord> {
        self.process_record(raw, Utc::now())
    }

    /// Runs a batch of rows, isolating failures per record.
    pub fn process_batch(&self, rows: &[RawRecord], now: DateTime<Utc>) -> BatchReport {
        let mut results = Vec::with_capacity(rows.len());
        let mut summary = BatchSummary {
            total: rows.len(),
            ..BatchSummary::default()
        };

        for raw in rows {
            let result = self.process_record(raw, now);
            match &result {
                Ok(processed) => match &processed.outcome {
                    Outcome::Processed { .. } => summary.processed += 1,
                    Outcome::Quarantined(reason) => {
                        summary.quarantined += 1;
                        *summary
                            .quarantine_reasons
                            .entry(reason.to_wire().to_owned())
                            .or_insert(0) += 1;
                    }
                    Outcome::Purged(reason) => {
                        summary.purged += 1;
                        *summary
                            .purge_reasons
                            .entry(reason.to_wire().to_owned())
                            .or_insert(0) += 1;
                    }
                },
                Err(error) => {
                    summary.failed += 1;
                    tracing::error!(
                        error = %redact_pii(&error.to_string()),
                        "record processing failed; continuing batch"
                    );
                }
            }
            results.push(result);
        }

        tracing::info!(
            total = summary.total,
            processed = summary.processed,
            purged = summary.purged,
            quarantined = summary.quarantined,
            failed = summary.failed,
            "batch complete"
        );

        BatchReport { results, summary }
    }

    /// [`Self::process_batch`] against the current wall clock.
    pub fn process_batch_now(&self, rows: &[RawRecord]) -> BatchReport {
        self.process_batch(rows, Utc::now())
    }
}

impl BatchReport {
    /// Dispositions per row, `None` where processing failed.
    pub fn dispositions(&self) -> Vec<Option<Disposition>> {
        self.results
            .iter()
            .map(|r| r.as_ref().ok().map(|p| p.outcome.disposition()))
            .collect()
    }
}
