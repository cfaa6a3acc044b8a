//! # chromacms-core
//!
//! A color management engine: parses ICC profiles, composes transform
//! pipelines between profile pairs, and executes them over packed
//! pixel buffers.
//!
//! The flow mirrors how ICC color management is structured:
//!
//! 1. [`Profile::parse`] reads the container and decodes tags (curves,
//!    matrices, LUTs) into executable primitives.
//! 2. [`build_pipeline`] composes a device → PCS → device stage chain
//!    for a profile pair and rendering intent.
//! 3. [`transform`] runs the chain over 8-bit, 16-bit or f32 buffers,
//!    with [`transform_parallel`] fanning out across a thread pool.
//! 4. [`Registry`] caches parsed profiles and built pipelines behind
//!    content-hash keys with LRU eviction.
//!
//! ```
//! use chromacms_core::{synth, Profile, Registry, RenderingIntent};
//! use chromacms_core::{transform, PixelFormat};
//!
//! let registry = Registry::new(8);
//! let src = registry.get_or_parse(&synth::srgb()).unwrap();
//! let dst = registry.get_or_parse(&synth::linear_display_p3()).unwrap();
//! let pipeline = registry
//!     .get_or_build(&src, &dst, RenderingIntent::RelativeColorimetric)
//!     .unwrap();
//!
//! let pixels = [255u8, 0, 0, 0, 255, 0];
//! let mut out = [0u8; 6];
//! transform(
//!     &pipeline,
//!     PixelFormat::RGB_8,
//!     &pixels,
//!     PixelFormat::RGB_8,
//!     &mut out,
//!     2,
//! )
//! .unwrap();
//! ```

pub mod color;
pub mod error;
pub mod icc;
pub mod math;
pub mod pipeline;
pub mod registry;
pub mod synth;
pub mod transform;

pub use error::{BuildError, DecodeError, Error, ExecError, ParseError, Result};
pub use icc::header::{ColorSpace, ProfileClass, ProfileHeader, RenderingIntent};
pub use icc::profile::{ParseWarning, Profile, ProfileId};
pub use pipeline::{build_pipeline, Pipeline, Stage};
pub use registry::Registry;
pub use transform::{transform, transform_parallel, Encoding, PixelFormat};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
