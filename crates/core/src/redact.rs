//! PII redaction for log output.
//!
//! Anything the pipeline logs may end up in aggregated production logs, so
//! row content never reaches a `tracing` call unredacted. Redaction is
//! pattern-based over the identifier classes that actually appear in this
//! data: email addresses, ABHA identifiers, Indian mobile numbers and
//! Aadhaar numbers.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("pattern compiles")
});

static ABHA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2}-\d{4}-\d{4}-\d{4}\b").expect("pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\+91|91)?\d{10}\b").expect("pattern compiles"));

static AADHAAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\s\d{4}\s\d{4}\b").expect("pattern compiles"));

/// Redacts known PII patterns from a log message.
///
/// Each match is replaced with a class marker (`[REDACTED_ABHA]` and so
/// on), keeping the message shape readable while removing the identifier.
/// Order matters: the ABHA pattern runs before the phone pattern so a
/// hyphenated identifier is not half-eaten as a phone number.
pub fn redact_pii(message: &str) -> String {
    let redacted = EMAIL_RE.replace_all(message, "[REDACTED_EMAIL]");
    let redacted = ABHA_RE.replace_all(&redacted, "[REDACTED_ABHA]");
    let redacted = AADHAAR_RE.replace_all(&redacted, "[REDACTED_AADHAAR]");
    let redacted = PHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]");
    redacted.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_email_addresses() {
        let out = redact_pii("contact patient at asha.rao@example.org today");
        assert_eq!(out, "contact patient at [REDACTED_EMAIL] today");
    }

    #[test]
    fn redacts_abha_identifiers() {
        let out = redact_pii("purge requested for 91-1234-5678-9012");
        assert_eq!(out, "purge requested for [REDACTED_ABHA]");
        assert!(!out.contains("9012"));
    }

    #[test]
    fn redacts_phone_numbers_with_and_without_prefix() {
        assert_eq!(redact_pii("call 9876543210"), "call [REDACTED_PHONE]");
        assert_eq!(redact_pii("call 919876543210"), "call [REDACTED_PHONE]");

        let plus_prefixed = redact_pii("call +919876543210");
        assert!(plus_prefixed.contains("[REDACTED_PHONE]"));
        assert!(!plus_prefixed.contains("9876543210"));
    }

    #[test]
    fn redacts_aadhaar_numbers() {
        let out = redact_pii("id on file: 1234 5678 9012");
        assert_eq!(out, "id on file: [REDACTED_AADHAAR]");
    }

    #[test]
    fn leaves_clean_text_untouched() {
        let msg = "record quarantined: missing identity field";
        assert_eq!(redact_pii(msg), msg);
    }

    #[test]
    fn redacts_multiple_classes_in_one_message() {
        let out = redact_pii("91-1234-5678-9012 reachable at a@b.io or 9876543210");
        assert!(out.contains("[REDACTED_ABHA]"));
        assert!(out.contains("[REDACTED_EMAIL]"));
        assert!(out.contains("[REDACTED_PHONE]"));
        assert!(!out.contains("9876543210"));
    }
}
