//! Validated domain primitives for the HRC compliance core.
//!
//! Record classification runs on a small set of identity and consent values
//! that arrive as messy free text. This crate wraps each of them in a type
//! that is impossible to construct in an invalid state:
//! - [`AbhaId`]: the national health account identifier, fixed
//!   `XX-XXXX-XXXX-XXXX` format
//! - [`NoticeId`] / [`NoticeReference`]: versioned consent notice
//!   identifiers with a strict grammar
//! - [`ConsentStatus`], [`Disposition`] and the reason enums: closed
//!   variants with explicit wire spellings
//!
//! Parsing is strict: callers get a value that is already canonical, or a
//! [`TypesError`]. Lenient intake (unknown consent spellings and similar)
//! is expressed as total functions that return an explicit `Unknown`
//! variant, never as a silently accepted string.

mod abha;
mod notice;
mod status;

pub use abha::AbhaId;
pub use notice::{NoticeId, NoticeReference};
pub use status::{ConsentStatus, Disposition, PurgeReason, QuarantineReason};

/// Errors that can occur when constructing validated domain types.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for domain type construction.
pub type TypesResult<T> = Result<T, TypesError>;
