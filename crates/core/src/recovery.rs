//! Fallback recovery of required identity fields.
//!
//! When the synonym mapper leaves a required identity field absent, the
//! record is not yet lost: degraded exports routinely carry the identifier
//! under a header nobody anticipated, or buried inside free text. This
//! module runs an ordered list of recognizer strategies over the *whole*
//! raw row:
//!
//! 1. [`StructuredFieldMatch`]: header equality after aggressive
//!    normalisation (case, spaces, underscores, hyphens, dots stripped)
//! 2. [`FuzzyHeaderMatch`]: header merely *contains* a field-specific token
//! 3. [`PatternHeuristic`]: pattern scan over the concatenated cell text
//!
//! Strategies run in strict priority order; the first one that yields a
//! shape-valid value wins. A recognizer only ever returns values that pass
//! the field's shape check, so a partial or malformed hit never counts as a
//! rescue. The stage never raises: whatever the input looks like, the
//! outcome is either a rescued value or a field left absent for the rule
//! evaluator to act on.

use crate::record::{CanonicalKey, CanonicalRecord, RawRecord};
use hrc_types::AbhaId;
use regex::Regex;
use std::sync::LazyLock;

/// ABHA identifier in free text: hyphen or whitespace separated groups.
static ABHA_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{2}[-\s]\d{4}[-\s]\d{4}[-\s]\d{4}\b").expect("pattern compiles")
});

/// Labelled patient name in free text, capturing the name portion.
static NAME_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Patient Name|Pt Name|Patient|Name)[:\s_-]*([A-Z][a-z]+(?:\s[A-Z][a-z]+)*)")
        .expect("pattern compiles")
});

/// A single recovery strategy.
///
/// `attempt` returns a shape-valid value for the requested field, or
/// nothing. Implementations must never panic on malformed, binary-looking
/// or encoding-broken input.
pub trait Recognizer: Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Tries to produce a value for `field` from the raw row.
    fn attempt(&self, field: CanonicalKey, raw: &RawRecord) -> Option<String>;
}

/// The strategies, in priority order.
static STRATEGIES: [&'static dyn Recognizer; 3] =
    [&StructuredFieldMatch, &FuzzyHeaderMatch, &PatternHeuristic];

/// The identity fields recovery is allowed to rescue.
const REQUIRED_IDENTITY_FIELDS: [CanonicalKey; 2] =
    [CanonicalKey::AbhaId, CanonicalKey::PatientName];

/// Rescues absent required identity fields in place.
///
/// Fields that are present or purged are left untouched; recovery never
/// resurrects erased data. Each rescued field is flagged
/// `recovered_via_fallback` on the record.
pub fn recover(record: &mut CanonicalRecord, raw: &RawRecord) {
    for field in REQUIRED_IDENTITY_FIELDS {
        let current = match field {
            CanonicalKey::AbhaId => record.abha_id(),
            CanonicalKey::PatientName => record.patient_name(),
            _ => unreachable!("only identity fields are listed"),
        };
        if !current.is_absent() {
            continue;
        }

        for strategy in STRATEGIES {
            if let Some(value) = strategy.attempt(field, raw) {
                tracing::debug!(
                    field = field.column_name(),
                    strategy = strategy.name(),
                    "recovered absent field via fallback"
                );
                record.set_recovered(field, value);
                break;
            }
        }
    }
}

/// Shape check and normalisation shared by all strategies.
///
/// For the ABHA field only the fixed `XX-XXXX-XXXX-XXXX` format counts;
/// whitespace-separated digit groups are normalised to hyphens first, then
/// held to the same standard. For names, any text starting with a letter
/// passes.
fn shape_valid(field: CanonicalKey, candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    match field {
        CanonicalKey::AbhaId => normalize_abha(candidate),
        CanonicalKey::PatientName => {
            if candidate.chars().next().is_some_and(char::is_alphabetic) {
                Some(candidate.to_owned())
            } else {
                None
            }
        }
        _ => None,
    }
}

fn normalize_abha(candidate: &str) -> Option<String> {
    if AbhaId::is_canonical(candidate) {
        return Some(candidate.to_owned());
    }
    let hyphenated = candidate.split_whitespace().collect::<Vec<_>>().join("-");
    AbhaId::is_canonical(&hyphenated).then_some(hyphenated)
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.'))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Tier 1: exact header match modulo separator and case noise.
pub struct StructuredFieldMatch;

impl StructuredFieldMatch {
    fn normalized_synonyms(field: CanonicalKey) -> &'static [&'static str] {
        match field {
            CanonicalKey::AbhaId => {
                &["abhaid", "idabha", "healthid", "abha", "abhano", "abhanumber"]
            }
            CanonicalKey::PatientName => {
                &["patientname", "fullname", "patient", "ptname", "nameofpt"]
            }
            _ => &[],
        }
    }
}

impl Recognizer for StructuredFieldMatch {
    fn name(&self) -> &'static str {
        "structured-field"
    }

    fn attempt(&self, field: CanonicalKey, raw: &RawRecord) -> Option<String> {
        let synonyms = Self::normalized_synonyms(field);
        raw.cells()
            .filter(|cell| synonyms.contains(&normalize_header(cell.header()).as_str()))
            .filter_map(|cell| cell.value())
            .find_map(|value| shape_valid(field, value))
    }
}

/// Tier 2: header contains a field-specific token.
pub struct FuzzyHeaderMatch;

impl FuzzyHeaderMatch {
    fn header_tokens(field: CanonicalKey) -> &'static [&'static str] {
        match field {
            CanonicalKey::AbhaId => &["abha", "health"],
            CanonicalKey::PatientName => &["name", "patient"],
            _ => &[],
        }
    }
}

impl Recognizer for FuzzyHeaderMatch {
    fn name(&self) -> &'static str {
        "fuzzy-header"
    }

    fn attempt(&self, field: CanonicalKey, raw: &RawRecord) -> Option<String> {
        let tokens = Self::header_tokens(field);
        raw.cells()
            .filter(|cell| {
                let header = cell.header().to_ascii_lowercase();
                tokens.iter().any(|token| header.contains(token))
            })
            .filter_map(|cell| cell.value())
            .find_map(|value| shape_valid(field, value))
    }
}

/// Tier 3: pattern scan over the concatenated cell text.
pub struct PatternHeuristic;

impl Recognizer for PatternHeuristic {
    fn name(&self) -> &'static str {
        "pattern-heuristic"
    }

    fn attempt(&self, field: CanonicalKey, raw: &RawRecord) -> Option<String> {
        let text = raw.full_text();
        match field {
            CanonicalKey::AbhaId => ABHA_TEXT_RE
                .find_iter(&text)
                .find_map(|m| shape_valid(field, m.as_str())),
            CanonicalKey::PatientName => NAME_TEXT_RE
                .captures_iter(&text)
                .filter_map(|caps| caps.get(1))
                .find_map(|m| shape_valid(field, m.as_str())),
            _ => None,
        }
    }
}
