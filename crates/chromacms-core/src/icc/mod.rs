//! ICC profile container parsing
//!
//! An ICC profile is a 128-byte header, a tag directory, and tag data
//! blocks. This module reads that layout bit-exactly per ICC.1:2022
//! and decodes tag payloads into executable primitives.

pub mod header;
pub mod profile;
pub mod tags;
pub mod types;

pub use header::{ColorSpace, ProfileClass, ProfileHeader, RenderingIntent};
pub use profile::{ParseWarning, Profile};
pub use tags::TagData;
pub use types::{TagSignature, TypeSignature};
