use hrc_audit::AuditError;

/// Errors surfaced by the compliance core.
///
/// Field-level problems (missing identity, malformed notice, unparseable
/// cells) are never errors here; they become disposition outcomes. The only
/// failure the pipeline escalates is an audit append that could not be
/// confirmed, because erasure without lineage is unprovable erasure.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("audit append failed for subject {subject}: {source}")]
    AuditAppend {
        /// One-way trace token of the affected subject, safe to log.
        subject: String,
        #[source]
        source: AuditError,
    },

    #[error("failed to serialize canonical record: {0}")]
    Serialization(serde_json::Error),
}

pub type ComplianceResult<T> = std::result::Result<T, ComplianceError>;
