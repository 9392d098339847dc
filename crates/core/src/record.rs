//! Raw and canonical record models.
//!
//! Responsibilities:
//! - Define the ephemeral [`RawRecord`] row shape handed over by the
//!   ingress layer
//! - Define the closed canonical schema ([`CanonicalRecord`]) in which
//!   every key is always present, with absence as an explicit state
//! - Provide the export wire struct consumed by downstream bundling
//!
//! Notes:
//! - Canonical records are mutated only by initial population, by field
//!   recovery, and by the purge path. Everything else reads.
//! - A purged field holds no data at all; the sentinel text exists only at
//!   the export boundary.

use crate::constants::{
    KEY_ABHA_ID, KEY_CLINICAL_PAYLOAD, KEY_CONSENT_STATUS, KEY_DATA_PURPOSE, KEY_DISPOSITION,
    KEY_NOTICE_DATE, KEY_NOTICE_ID, KEY_PATIENT_NAME, PURGE_SENTINEL,
};
use crate::{ComplianceError, ComplianceResult};
use chrono::NaiveDate;
use hrc_types::{ConsentStatus, Disposition};
use serde::Serialize;

/// The closed set of canonical columns.
///
/// This enum is deliberately *closed*: the mapper never invents new
/// canonical keys, and every consumer can match on the full set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalKey {
    AbhaId,
    PatientName,
    ConsentStatus,
    NoticeId,
    NoticeDate,
    ClinicalPayload,
    DataPurpose,
}

impl CanonicalKey {
    /// All canonical keys, in schema order.
    pub const ALL: [CanonicalKey; 7] = [
        CanonicalKey::AbhaId,
        CanonicalKey::PatientName,
        CanonicalKey::ConsentStatus,
        CanonicalKey::NoticeId,
        CanonicalKey::NoticeDate,
        CanonicalKey::ClinicalPayload,
        CanonicalKey::DataPurpose,
    ];

    /// The canonical column name for this key.
    pub fn column_name(self) -> &'static str {
        match self {
            CanonicalKey::AbhaId => KEY_ABHA_ID,
            CanonicalKey::PatientName => KEY_PATIENT_NAME,
            CanonicalKey::ConsentStatus => KEY_CONSENT_STATUS,
            CanonicalKey::NoticeId => KEY_NOTICE_ID,
            CanonicalKey::NoticeDate => KEY_NOTICE_DATE,
            CanonicalKey::ClinicalPayload => KEY_CLINICAL_PAYLOAD,
            CanonicalKey::DataPurpose => KEY_DATA_PURPOSE,
        }
    }
}

/// One header/value cell from the source row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCell {
    header: String,
    value: Option<String>,
}

impl RawCell {
    /// The source header, exactly as supplied.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The cell text, if the cell was not null.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// An unvalidated source row: ordered header/value cells.
///
/// The ingress layer owns construction; this core only reads. Cell order is
/// preserved so full-text scans over the row are deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawRecord {
    cells: Vec<RawCell>,
}

impl RawRecord {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell with text content.
    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.push(RawCell {
            header: header.into(),
            value: Some(value.into()),
        });
    }

    /// Appends a null cell (header present, no value).
    pub fn push_null(&mut self, header: impl Into<String>) {
        self.cells.push(RawCell {
            header: header.into(),
            value: None,
        });
    }

    /// Builds a row from header/value pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut row = Self::new();
        for (header, value) in pairs {
            row.push(header, value);
        }
        row
    }

    /// The cells of this row, in source order.
    pub fn cells(&self) -> impl Iterator<Item = &RawCell> {
        self.cells.iter()
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Concatenation of all non-empty cell text, in source order.
    ///
    /// This is the haystack the heuristic recovery tier scans; headers are
    /// not included, matching how upstream systems deliver label text as
    /// ordinary cell content in degraded exports.
    pub fn full_text(&self) -> String {
        let mut text = String::new();
        for cell in &self.cells {
            if let Some(value) = cell.value() {
                if value.is_empty() {
                    continue;
                }
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(value);
            }
        }
        text
    }
}

/// State of one canonical field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// No value could be mapped or recovered. Explicit, never an omission.
    Absent,
    /// A value is present.
    Present(String),
    /// The value was irreversibly erased. Holds no data.
    Purged,
}

impl FieldValue {
    /// Canonicalises one raw cell value.
    ///
    /// Empty and whitespace-only text collapses to [`FieldValue::Absent`].
    /// Text equal to the purge sentinel canonicalises to
    /// [`FieldValue::Purged`], which is what keeps purge absorbing when an
    /// already-purged record is re-ingested from an export.
    pub(crate) fn from_raw(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => FieldValue::Absent,
            Some(text) if text == PURGE_SENTINEL => FieldValue::Purged,
            Some(text) => FieldValue::Present(text.to_owned()),
        }
    }

    /// The field text, if present.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Present(text) => Some(text),
            _ => None,
        }
    }

    /// Returns true for the explicit absence marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Returns true if a value is present.
    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }

    /// Returns true if the field was erased.
    pub fn is_purged(&self) -> bool {
        matches!(self, FieldValue::Purged)
    }

    /// The text this field exports as, sentinel included.
    fn export_text(&self) -> Option<String> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Present(text) => Some(text.clone()),
            FieldValue::Purged => Some(PURGE_SENTINEL.to_owned()),
        }
    }
}

/// A record in the fixed canonical schema.
///
/// Every canonical key is always represented; a source row that never
/// mentioned a column still yields an explicit [`FieldValue::Absent`] for
/// it. The disposition slot starts empty and is stamped exactly once per
/// evaluation pass, after any required purge has completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalRecord {
    abha_id: FieldValue,
    patient_name: FieldValue,
    consent_status: ConsentStatus,
    notice_id: FieldValue,
    notice_date: Option<NaiveDate>,
    clinical_payload: FieldValue,
    data_purpose: FieldValue,
    abha_recovered: bool,
    name_recovered: bool,
    disposition: Option<Disposition>,
}

impl CanonicalRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        abha_id: FieldValue,
        patient_name: FieldValue,
        consent_status: ConsentStatus,
        notice_id: FieldValue,
        notice_date: Option<NaiveDate>,
        clinical_payload: FieldValue,
        data_purpose: FieldValue,
    ) -> Self {
        Self {
            abha_id,
            patient_name,
            consent_status,
            notice_id,
            notice_date,
            clinical_payload,
            data_purpose,
            abha_recovered: false,
            name_recovered: false,
            disposition: None,
        }
    }

    /// The ABHA identifier field.
    pub fn abha_id(&self) -> &FieldValue {
        &self.abha_id
    }

    /// The patient name field.
    pub fn patient_name(&self) -> &FieldValue {
        &self.patient_name
    }

    /// The consent state of this record.
    pub fn consent_status(&self) -> ConsentStatus {
        self.consent_status
    }

    /// The raw notice identifier field (validated only at evaluation).
    pub fn notice_id(&self) -> &FieldValue {
        &self.notice_id
    }

    /// The notice issuance date, when one parsed.
    pub fn notice_date(&self) -> Option<NaiveDate> {
        self.notice_date
    }

    /// The clinical payload field.
    pub fn clinical_payload(&self) -> &FieldValue {
        &self.clinical_payload
    }

    /// The declared processing purpose field.
    pub fn data_purpose(&self) -> &FieldValue {
        &self.data_purpose
    }

    /// Whether the ABHA identifier came from fallback recovery.
    pub fn abha_recovered_via_fallback(&self) -> bool {
        self.abha_recovered
    }

    /// Whether the patient name came from fallback recovery.
    pub fn name_recovered_via_fallback(&self) -> bool {
        self.name_recovered
    }

    /// The disposition stamped on this record, once finalised.
    pub fn disposition(&self) -> Option<Disposition> {
        self.disposition
    }

    /// Returns true if any PII-bearing field carries the purge marker.
    ///
    /// Purge is absorbing: one erased field is proof the record went
    /// through a purge, whatever later edits did to the others.
    pub fn is_purged(&self) -> bool {
        self.abha_id.is_purged()
            || self.patient_name.is_purged()
            || self.clinical_payload.is_purged()
    }

    /// Populates a field rescued by fallback recovery.
    ///
    /// Only identity fields are ever rescued; other keys are ignored. The
    /// provenance flag travels with the record so downstream consumers can
    /// tell heuristic values from mapped ones.
    pub(crate) fn set_recovered(&mut self, key: CanonicalKey, value: String) {
        match key {
            CanonicalKey::AbhaId => {
                self.abha_id = FieldValue::Present(value);
                self.abha_recovered = true;
            }
            CanonicalKey::PatientName => {
                self.patient_name = FieldValue::Present(value);
                self.name_recovered = true;
            }
            _ => {}
        }
    }

    /// Overwrites every PII-bearing field with the purge marker.
    ///
    /// The original values are dropped; nothing on the record can reach
    /// them afterwards.
    pub(crate) fn erase_pii_fields(&mut self) {
        self.abha_id = FieldValue::Purged;
        self.patient_name = FieldValue::Purged;
        self.clinical_payload = FieldValue::Purged;
    }

    /// Replaces the patient name with a pseudonymous token.
    pub(crate) fn set_patient_name_token(&mut self, token: String) {
        self.patient_name = FieldValue::Present(token);
    }

    /// Replaces the ABHA identifier with a pseudonymous token.
    pub(crate) fn set_abha_token(&mut self, token: String) {
        self.abha_id = FieldValue::Present(token);
    }

    /// Stamps the final disposition for this evaluation pass.
    pub(crate) fn record_disposition(&mut self, disposition: Disposition) {
        self.disposition = Some(disposition);
    }

    /// Builds the export view consumed by downstream bundling.
    pub fn export(&self) -> CanonicalExport {
        CanonicalExport {
            abha_id: self.abha_id.export_text(),
            patient_name: self.patient_name.export_text(),
            consent_status: self.consent_status,
            notice_id: self.notice_id.export_text(),
            notice_date: self.notice_date.map(|d| d.to_string()),
            clinical_payload: self.clinical_payload.export_text(),
            data_purpose: self.data_purpose.export_text(),
            disposition: self.disposition,
            abha_recovered_via_fallback: self.abha_recovered,
            patient_name_recovered_via_fallback: self.name_recovered,
        }
    }

    /// Serialises the export view as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ComplianceError::Serialization`] if serialisation fails.
    pub fn export_json(&self) -> ComplianceResult<String> {
        serde_json::to_string_pretty(&self.export()).map_err(ComplianceError::Serialization)
    }
}

/// Wire view of a canonical record for downstream consumers.
///
/// Field names follow the canonical schema contract. Absent fields export
/// as nulls; purged fields export the sentinel text.
#[derive(Clone, Debug, Serialize)]
pub struct CanonicalExport {
    #[serde(rename = "ABHA_ID")]
    pub abha_id: Option<String>,

    #[serde(rename = "Patient_Name")]
    pub patient_name: Option<String>,

    #[serde(rename = "Consent_Status")]
    pub consent_status: ConsentStatus,

    #[serde(rename = "Notice_ID")]
    pub notice_id: Option<String>,

    #[serde(rename = "Notice_Date")]
    pub notice_date: Option<String>,

    #[serde(rename = "Clinical_Payload")]
    pub clinical_payload: Option<String>,

    #[serde(rename = "Data_Purpose")]
    pub data_purpose: Option<String>,

    #[serde(rename = "Disposition")]
    pub disposition: Option<Disposition>,

    pub abha_recovered_via_fallback: bool,

    pub patient_name_recovered_via_fallback: bool,
}

impl CanonicalExport {
    /// Rebuilds a raw row from this export, for re-ingest scenarios.
    ///
    /// Null fields produce no cell at all, mirroring how a downstream
    /// store would serialise the record.
    pub fn to_raw_record(&self) -> RawRecord {
        let mut row = RawRecord::new();
        for (header, value) in [
            (KEY_ABHA_ID, &self.abha_id),
            (KEY_PATIENT_NAME, &self.patient_name),
            (KEY_NOTICE_ID, &self.notice_id),
            (KEY_NOTICE_DATE, &self.notice_date),
            (KEY_CLINICAL_PAYLOAD, &self.clinical_payload),
            (KEY_DATA_PURPOSE, &self.data_purpose),
        ] {
            if let Some(text) = value {
                row.push(header, text.clone());
            }
        }
        row.push(KEY_CONSENT_STATUS, self.consent_status.to_wire());
        if let Some(disposition) = self.disposition {
            row.push(KEY_DISPOSITION, disposition.to_wire());
        }
        row
    }
}
