//! Append-only audit sinks.
//!
//! The processing pipeline only ever *appends*; reading the trail back is
//! an export concern. [`AuditSink`] is the seam the pipeline writes
//! through, so embedding layers can swap in a durable (database, WORM
//! store) implementation without touching classification code.

use crate::{AuditEntry, AuditError, AuditResult};
use std::sync::Mutex;

/// Destination for audit entries.
///
/// Implementations must be append-only and must serialise concurrent
/// appends: entries from different records may interleave in order, but a
/// single entry is always written whole. An `Ok` return means the entry is
/// durably accepted; callers treat `Err` as fatal for the record being
/// processed, because a purge must never outrun its audit line.
pub trait AuditSink: Send + Sync {
    /// Appends one entry to the trail.
    fn append(&self, entry: AuditEntry) -> AuditResult<()>;
}

/// In-memory, single-writer audit log.
///
/// Appends are serialised through a mutex, so the log can be shared across
/// worker threads evaluating records concurrently. Entries are never
/// mutated or removed; rotation and retention expiry belong to an external
/// process operating on exported ledgers.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a point-in-time copy of the trail.
    ///
    /// The copy is detached: holding it does not block writers, and later
    /// appends do not show up in it.
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Returns true if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&self, entry: AuditEntry) -> AuditResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AuditError::Append("audit log lock poisoned".into()))?;
        entries.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuditAction, SubjectReference};
    use chrono::Utc;
    use std::sync::Arc;

    fn entry(action: AuditAction) -> AuditEntry {
        AuditEntry::record(action, SubjectReference::masked(), Utc::now(), 365)
    }

    #[test]
    fn appends_preserve_order() {
        let log = MemoryAuditLog::new();
        let first = entry(AuditAction::ConsentRevokedOverride);
        let second = entry(AuditAction::CompliancePurgeSuccess);
        log.append(first.clone()).unwrap();
        log.append(second.clone()).unwrap();

        let trail = log.snapshot();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0], first);
        assert_eq!(trail[1], second);
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let log = MemoryAuditLog::new();
        log.append(entry(AuditAction::CompliancePurgeSuccess)).unwrap();
        let snapshot = log.snapshot();
        log.append(entry(AuditAction::CompliancePurgeSuccess)).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn concurrent_appends_all_land_with_unique_request_ids() {
        let log = Arc::new(MemoryAuditLog::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let log = Arc::clone(&log);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    log.append(entry(AuditAction::CompliancePurgeSuccess)).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let trail = log.snapshot();
        assert_eq!(trail.len(), 400);
        let mut ids: Vec<_> = trail.iter().map(|e| e.request_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 400);
    }
}
