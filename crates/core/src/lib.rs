//! # HRC Core
//!
//! Classification core for ingested clinical records.
//!
//! Each raw row flows strictly forward through four stages:
//! - canonical field mapping over a case-insensitive synonym table
//!   ([`canonicalize`])
//! - fallback recovery of absent identity fields via an ordered recognizer
//!   list ([`recover`])
//! - compliance rule evaluation into PROCESSED, QUARANTINED or PURGED
//!   ([`evaluate`] / [`finalize`])
//! - purge execution with PII-free audit lineage ([`apply_purge`])
//!
//! [`ComplianceService`] packages the stages for batch use. Records are
//! independent and evaluation is deterministic for a fixed reference
//! timestamp; the shared audit sink is the only cross-record resource.
//!
//! **No ingress or transport concerns**: file format parsing, persistence
//! and network surfaces belong to the embedding layer. This crate consumes
//! pre-parsed rows and returns classified records.

pub mod constants;

mod config;
mod error;
mod evaluator;
mod mapper;
mod pipeline;
mod purge;
mod record;
mod recovery;
mod redact;

pub use config::CoreConfig;
pub use error::{ComplianceError, ComplianceResult};
pub use evaluator::{evaluate, finalize, Outcome};
pub use mapper::canonicalize;
pub use pipeline::{BatchReport, BatchSummary, ComplianceService, ProcessedRecord};
pub use purge::{apply_purge, pseudonymize};
pub use record::{CanonicalExport, CanonicalKey, CanonicalRecord, FieldValue, RawCell, RawRecord};
pub use recovery::{
    recover, FuzzyHeaderMatch, PatternHeuristic, Recognizer, StructuredFieldMatch,
};
pub use redact::redact_pii;

// Re-export the domain and audit vocabulary so embedding layers depend on
// one crate.
pub use hrc_audit::{
    AuditAction, AuditEntry, AuditLedger, AuditSink, MemoryAuditLog, SubjectReference,
};
pub use hrc_types::{
    AbhaId, ConsentStatus, Disposition, NoticeId, NoticeReference, PurgeReason, QuarantineReason,
};
