//! The crate-root error type, aggregating every module-local error behind
//! one public enum. Mirrors the way `rattler_conda_types`'s
//! `ParseVersionSpecError` wraps the errors its sub-parsers can produce.

use thiserror::Error;

use crate::range::{ParseRangeError, RangeError};
use crate::version::ParseVersionError;

/// Every way a [`crate::VersionValue`] can fail to be constructed, compared,
/// or transported.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// The constructor input contains a character outside the accepted
    /// charset (`[A-Za-z0-9._*:!,-]` plus whitespace, which is stripped).
    #[error("invalid character '{0}' in version expression")]
    InvalidCharacter(char),

    /// A `Version` endpoint failed to parse.
    #[error(transparent)]
    Version(#[from] ParseVersionError),

    /// A single grammar token (`version`, `a:b`, `a.*`) failed to parse.
    #[error(transparent)]
    Range(#[from] ParseRangeError),

    /// A `Range` was constructed directly (not via parsing) with an invalid
    /// shape, e.g. `start > end`.
    #[error(transparent)]
    RangeConstruction(#[from] RangeError),

    /// Deserializing a [`crate::SerializedForm`] found neither a `version`
    /// nor a `versions` key.
    #[error("value has neither a 'version' nor a 'versions' key")]
    UnknownSerializedShape,

    /// A dynamically-typed value (from `TryFrom<&serde_json::Value>`) has no
    /// representative in the `Version < Range < List` lattice — e.g. a JSON
    /// `bool`, `null`, or an object without `version`/`versions`. Since the
    /// Rust encoding of the lattice is a closed, exhaustively-constructed
    /// enum, this is the only path that can ever produce this variant.
    #[error("value cannot be coerced into a version, range, or list")]
    UncoerceableType,
}
