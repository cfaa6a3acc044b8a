//! Error types for chromacms
//!
//! Failures are split by domain: container parsing, tag payload
//! decoding, pipeline building, and pixel execution. Tag-level decode
//! failures are usually downgraded to warnings by the profile parser;
//! everything surfaced through these enums aborts the operation.

use thiserror::Error;

use crate::icc::types::{TagSignature, TypeSignature};

/// Result type for chromacms operations
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error covering all failure domains
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Errors from parsing the ICC container (header and tag directory)
///
/// These abort the whole parse. Per-tag payload problems degrade to
/// [`crate::icc::profile::ParseWarning`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Buffer too small to hold the fixed 128-byte header
    #[error("truncated header: expected at least {expected} bytes, got {actual}")]
    TruncatedHeader { expected: usize, actual: usize },

    /// Profile file signature is not 'acsp'
    #[error("bad magic: 0x{0:08X} (expected 'acsp')")]
    BadMagic(u32),

    /// Declared profile size exceeds the supplied buffer
    #[error("size mismatch: header declares {header_size} bytes, buffer is {actual_size}")]
    SizeMismatch {
        header_size: u32,
        actual_size: usize,
    },

    /// Tag directory declares more entries than the sanity bound
    #[error("too many tags: {count} (limit {limit})")]
    TooManyTags { count: usize, limit: usize },

    /// A directory entry points outside the buffer or into the header
    #[error("tag '{tag}' out of bounds: offset {offset} + size {size} vs profile size {profile_size}")]
    TagOutOfBounds {
        tag: TagSignature,
        offset: u32,
        size: u32,
        profile_size: usize,
    },

    /// Unrecognized data color space signature in the header
    #[error("unknown color space: 0x{0:08X}")]
    UnknownColorSpace(u32),

    /// Unrecognized device class signature in the header
    #[error("unknown profile class: 0x{0:08X}")]
    UnknownProfileClass(u32),

    /// Rendering intent field outside 0..=3
    #[error("unknown rendering intent: {0}")]
    UnknownRenderingIntent(u32),
}

/// Errors from decoding a single tag payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Payload shorter than its type requires
    #[error("{what} truncated: need {expected} bytes, have {actual}")]
    Truncated {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Parametric curve function type code not in 0..=4
    #[error("unknown parametric curve type: {0}")]
    UnknownCurveType(u16),

    /// Tag payload type does not match what the signature declares
    #[error("tag '{tag}' has type '{type_sig}', expected {expected}")]
    TypeMismatch {
        tag: TagSignature,
        type_sig: TypeSignature,
        expected: &'static str,
    },

    /// CLUT with more input dimensions than the engine evaluates
    #[error("CLUT has {0} input channels (supported: 1..=4)")]
    TooManyGridDimensions(usize),

    /// Structurally invalid payload
    #[error("corrupted {what}: {detail}")]
    Corrupted {
        what: &'static str,
        detail: String,
    },
}

/// Errors from composing a transform pipeline between two profiles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// Profile carries neither an intent LUT nor matrix-shaper tags
    #[error("profile has no usable transform data ({side}): missing tag '{tag}'")]
    MissingTransform {
        side: &'static str,
        tag: TagSignature,
    },

    /// Adjacent stages disagree on channel count
    #[error("component count mismatch at stage {stage}: previous stage outputs {expected}, next expects {actual}")]
    ComponentCountMismatch {
        stage: usize,
        expected: usize,
        actual: usize,
    },

    /// Colorant matrix cannot be inverted for the destination side
    #[error("colorant matrix is singular ({side})")]
    SingularMatrix { side: &'static str },

    /// Device color space the builder cannot bridge to the PCS
    #[error("unsupported device color space for {side}: {space}")]
    UnsupportedColorSpace {
        side: &'static str,
        space: &'static str,
    },
}

/// Errors from executing a pipeline over a pixel buffer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExecError {
    /// Declared color channel count disagrees with a pipeline endpoint
    #[error("{side} format declares {actual} color channels, pipeline expects {expected}")]
    FormatMismatch {
        side: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Buffer does not cover pixel_count * samples * bytes_per_sample
    #[error("{side} buffer too small: need {expected} bytes, have {actual}")]
    BufferTooSmall {
        side: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Buffer not aligned for its declared sample width
    #[error("{side} buffer misaligned for {encoding} samples")]
    Misaligned {
        side: &'static str,
        encoding: &'static str,
    },
}
