//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid
//! reading process-wide environment variables during record processing,
//! which can lead to inconsistent behaviour in multi-threaded runtimes and
//! test harnesses.

use crate::constants::{DEFAULT_AUTHORIZED_PURPOSES, DEFAULT_RETENTION_DAYS};
use crate::{ComplianceError, ComplianceResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    retention_days: i64,
    authorized_purposes: Vec<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::InvalidInput`] if `retention_days` is not
    /// strictly positive.
    pub fn new(retention_days: i64, authorized_purposes: Vec<String>) -> ComplianceResult<Self> {
        if retention_days <= 0 {
            return Err(ComplianceError::InvalidInput(
                "retention_days must be strictly positive".into(),
            ));
        }

        Ok(Self {
            retention_days,
            authorized_purposes,
        })
    }

    /// The statutory retention window, in days.
    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    /// The date before which a notice counts as expired, relative to `now`.
    pub fn retention_threshold(&self, now: DateTime<Utc>) -> NaiveDate {
        (now - Duration::days(self.retention_days)).date_naive()
    }

    /// Returns true if `purpose` is in the authorised set.
    ///
    /// Matching trims surrounding whitespace but is otherwise exact; purpose
    /// labels are a controlled vocabulary, not free text.
    pub fn is_authorized_purpose(&self, purpose: &str) -> bool {
        let purpose = purpose.trim();
        self.authorized_purposes.iter().any(|p| p == purpose)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            retention_days: DEFAULT_RETENTION_DAYS,
            authorized_purposes: DEFAULT_AUTHORIZED_PURPOSES
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_one_year_window() {
        let config = CoreConfig::default();
        assert_eq!(config.retention_days(), 365);

        let now: DateTime<Utc> = "2026-08-07T12:00:00Z".parse().unwrap();
        assert_eq!(
            config.retention_threshold(now),
            NaiveDate::from_ymd_opt(2025, 8, 7).unwrap()
        );
    }

    #[test]
    fn rejects_non_positive_retention() {
        assert!(CoreConfig::new(0, vec![]).is_err());
        assert!(CoreConfig::new(-10, vec![]).is_err());
        assert!(CoreConfig::new(30, vec![]).is_ok());
    }

    #[test]
    fn authorized_purpose_matching_trims_but_stays_exact() {
        let config = CoreConfig::default();
        assert!(config.is_authorized_purpose("Consultation"));
        assert!(config.is_authorized_purpose("  Treatment "));
        assert!(config.is_authorized_purpose("Emergency Care"));
        assert!(!config.is_authorized_purpose("consultation"));
        assert!(!config.is_authorized_purpose("Marketing"));
        assert!(!config.is_authorized_purpose(""));
    }
}
