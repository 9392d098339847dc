//! Constants used throughout the compliance core.
//!
//! This module contains canonical key names and fixed marker values to
//! ensure consistency across the codebase and make maintenance easier.

/// Canonical column name for the ABHA identifier.
pub const KEY_ABHA_ID: &str = "ABHA_ID";

/// Canonical column name for the patient name.
pub const KEY_PATIENT_NAME: &str = "Patient_Name";

/// Canonical column name for the consent status.
pub const KEY_CONSENT_STATUS: &str = "Consent_Status";

/// Canonical column name for the notice identifier.
pub const KEY_NOTICE_ID: &str = "Notice_ID";

/// Canonical column name for the notice issuance date.
pub const KEY_NOTICE_DATE: &str = "Notice_Date";

/// Canonical column name for the clinical payload.
pub const KEY_CLINICAL_PAYLOAD: &str = "Clinical_Payload";

/// Canonical column name for the declared processing purpose.
pub const KEY_DATA_PURPOSE: &str = "Data_Purpose";

/// Column name used for the disposition in exports.
pub const KEY_DISPOSITION: &str = "Disposition";

/// Sentinel written over PII-bearing fields on purge.
pub const PURGE_SENTINEL: &str = "[DATA PURGED]";

/// Default statutory retention window, in days.
pub const DEFAULT_RETENTION_DAYS: i64 = 365;

/// Default set of purposes a record may declare without being purged.
pub const DEFAULT_AUTHORIZED_PURPOSES: &[&str] =
    &["Consultation", "Treatment", "Audit", "Emergency Care"];

/// Expected notice date spelling (ISO 8601 calendar date).
pub const NOTICE_DATE_FORMAT: &str = "%Y-%m-%d";
