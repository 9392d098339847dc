//! Append-only, PII-free audit lineage for the HRC compliance core.
//!
//! Every disposition-affecting action (in practice, every purge) leaves
//! exactly one [`AuditEntry`] behind. Entries are designed so the audit
//! trail can be handed to an external regulator without any de-identification
//! pass:
//! - the subject is referenced only through a one-way SHA-256 trace token
//!   ([`SubjectReference`]), never a raw identifier or name
//! - entries are immutable value objects; the log is append-only
//! - each entry carries its own statutory retention horizon
//!
//! Persistence is someone else's concern. This crate offers the
//! [`AuditSink`] seam, an in-memory single-writer implementation
//! ([`MemoryAuditLog`]) and a strict YAML ledger wire format
//! ([`AuditLedger`]) for export.

mod entry;
mod ledger;
mod log;

pub use entry::{AuditAction, AuditEntry, SubjectReference};
pub use ledger::AuditLedger;
pub use log::{AuditSink, MemoryAuditLog};

/// Errors returned by the audit crate.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The sink could not durably append an entry.
    #[error("failed to append audit entry: {0}")]
    Append(String),

    /// An exported ledger document did not match the wire schema.
    #[error("invalid audit ledger: {0}")]
    InvalidLedger(String),
}

/// Type alias for Results that can fail with an [`AuditError`].
pub type AuditResult<T> = Result<T, AuditError>;
