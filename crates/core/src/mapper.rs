//! Canonical field mapping.
//!
//! Source rows arrive with whatever headers the exporting hospital system
//! invented. The mapper translates known header variants to the canonical
//! schema through a case-insensitive synonym table and ignores everything
//! it does not recognise. It never fails: a required column that cannot be
//! matched simply canonicalises to an explicit absent field, which the
//! recovery stage then gets a chance at.

use crate::constants::NOTICE_DATE_FORMAT;
use crate::record::{CanonicalKey, CanonicalRecord, FieldValue, RawRecord};
use crate::redact::redact_pii;
use chrono::{DateTime, NaiveDate};
use hrc_types::ConsentStatus;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Known header spellings per canonical key.
///
/// Matching is case-insensitive; each canonical column name is also its own
/// synonym. The table is additive only: a header matching no entry is
/// dropped, never promoted to a new canonical key.
const HEADER_SYNONYMS: &[(&str, CanonicalKey)] = &[
    ("ABHA_ID", CanonicalKey::AbhaId),
    ("ID_ABHA", CanonicalKey::AbhaId),
    ("Health_ID", CanonicalKey::AbhaId),
    ("ABHA", CanonicalKey::AbhaId),
    ("ABHA_No", CanonicalKey::AbhaId),
    ("ABHA Number", CanonicalKey::AbhaId),
    ("Patient_Name", CanonicalKey::PatientName),
    ("Full_Name", CanonicalKey::PatientName),
    ("Patient", CanonicalKey::PatientName),
    ("Pt_Name", CanonicalKey::PatientName),
    ("Notice_ID", CanonicalKey::NoticeId),
    ("Consent_ID", CanonicalKey::NoticeId),
    ("Doc_ID", CanonicalKey::NoticeId),
    ("Reference_No", CanonicalKey::NoticeId),
    ("Consent_Status", CanonicalKey::ConsentStatus),
    ("Consent", CanonicalKey::ConsentStatus),
    ("Status", CanonicalKey::ConsentStatus),
    ("Notice_Date", CanonicalKey::NoticeDate),
    ("Date", CanonicalKey::NoticeDate),
    ("Consent_Date", CanonicalKey::NoticeDate),
    ("Clinical_Payload", CanonicalKey::ClinicalPayload),
    ("Data", CanonicalKey::ClinicalPayload),
    ("Report", CanonicalKey::ClinicalPayload),
    ("Diagnosis", CanonicalKey::ClinicalPayload),
    ("Summary", CanonicalKey::ClinicalPayload),
    ("Data_Purpose", CanonicalKey::DataPurpose),
    ("Purpose", CanonicalKey::DataPurpose),
];

static SYNONYM_LOOKUP: LazyLock<HashMap<String, CanonicalKey>> = LazyLock::new(|| {
    HEADER_SYNONYMS
        .iter()
        .map(|(header, key)| (header.to_ascii_lowercase(), *key))
        .collect()
});

/// Maps a raw row onto the canonical schema.
///
/// Every canonical key ends up populated or explicitly absent. For each
/// key, the first cell whose header matches a synonym wins; later duplicate
/// headers are ignored. Empty and null cells count as absent even when
/// their header matched.
pub fn canonicalize(raw: &RawRecord) -> CanonicalRecord {
    let mut mapped: HashMap<CanonicalKey, &str> = HashMap::new();

    for cell in raw.cells() {
        let Some(&key) = SYNONYM_LOOKUP.get(&cell.header().to_ascii_lowercase()) else {
            continue;
        };
        if mapped.contains_key(&key) {
            continue;
        }
        if let Some(value) = cell.value() {
            mapped.insert(key, value);
        }
    }

    let field = |key: CanonicalKey| FieldValue::from_raw(mapped.get(&key).copied());

    let consent_status = mapped
        .get(&CanonicalKey::ConsentStatus)
        .map(|value| ConsentStatus::from_wire(value))
        .unwrap_or(ConsentStatus::Unknown);

    let notice_date = mapped
        .get(&CanonicalKey::NoticeDate)
        .and_then(|value| parse_notice_date(value));

    CanonicalRecord::new(
        field(CanonicalKey::AbhaId),
        field(CanonicalKey::PatientName),
        consent_status,
        field(CanonicalKey::NoticeId),
        notice_date,
        field(CanonicalKey::ClinicalPayload),
        field(CanonicalKey::DataPurpose),
    )
}

/// Best-effort parse of a notice date cell.
///
/// Accepts the ISO calendar date the canonical contract specifies, plus
/// RFC 3339 timestamps from systems that export full datetimes. Anything
/// else degrades to "no date", not to an error.
fn parse_notice_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, NOTICE_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(ts) = value.parse::<DateTime<chrono::Utc>>() {
        return Some(ts.date_naive());
    }

    tracing::warn!("unparseable notice date cell: {}", redact_pii(value));
    None
}
