//! Profile and pipeline caches
//!
//! Parsing a profile and composing a pipeline are the expensive steps,
//! so both are cached behind content-hash keys. Values are handed out
//! as `Arc`s: eviction drops the cache's reference only, so in-flight
//! users keep working on the evicted entry.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use lru::LruCache;

use crate::error::{BuildError, ParseError};
use crate::icc::header::RenderingIntent;
use crate::icc::profile::{Profile, ProfileId};
use crate::pipeline::{build_pipeline, Pipeline};

/// Cache key for a composed pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub src: ProfileId,
    pub dst: ProfileId,
    pub intent: RenderingIntent,
}

/// LRU-bounded cache of parsed profiles and built pipelines
pub struct Registry {
    profiles: Mutex<LruCache<ProfileId, Arc<Profile>>>,
    pipelines: Mutex<LruCache<PipelineKey, Arc<Pipeline>>>,
}

impl Registry {
    /// Create a registry holding up to `capacity` entries per cache
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            profiles: Mutex::new(LruCache::new(cap)),
            pipelines: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Parse a profile, or return the cached instance for these bytes
    ///
    /// The key is a hash of the raw bytes, so byte-identical inputs
    /// share one parsed profile regardless of where they came from.
    pub fn get_or_parse(&self, data: &[u8]) -> Result<Arc<Profile>, ParseError> {
        let id = ProfileId::of(data);
        let mut cache = self.profiles.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(profile) = cache.get(&id) {
            return Ok(Arc::clone(profile));
        }

        let profile = Arc::new(Profile::parse(data)?);
        cache.put(id, Arc::clone(&profile));
        Ok(profile)
    }

    /// Look up a cached profile by its content hash
    pub fn profile(&self, id: ProfileId) -> Option<Arc<Profile>> {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(Arc::clone)
    }

    /// Build a pipeline, or return the cached one for this triple
    pub fn get_or_build(
        &self,
        src: &Profile,
        dst: &Profile,
        intent: RenderingIntent,
    ) -> Result<Arc<Pipeline>, BuildError> {
        let key = PipelineKey {
            src: src.id(),
            dst: dst.id(),
            intent,
        };
        let mut cache = self
            .pipelines
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(pipeline) = cache.get(&key) {
            return Ok(Arc::clone(pipeline));
        }

        let pipeline = Arc::new(build_pipeline(src, dst, intent)?);
        cache.put(key, Arc::clone(&pipeline));
        Ok(pipeline)
    }

    /// Number of cached profiles
    pub fn profile_count(&self) -> usize {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of cached pipelines
    pub fn pipeline_count(&self) -> usize {
        self.pipelines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop all cached entries; outstanding `Arc`s stay valid
    pub fn clear(&self) {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.pipelines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth;

    #[test]
    fn test_same_bytes_share_instance() {
        let registry = Registry::new(4);
        let bytes = synth::srgb();
        let a = registry.get_or_parse(&bytes).unwrap();
        let b = registry.get_or_parse(&bytes).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.profile_count(), 1);
    }

    #[test]
    fn test_eviction_reparses() {
        let registry = Registry::new(1);
        let srgb = synth::srgb();
        let p3 = synth::linear_display_p3();

        let first = registry.get_or_parse(&srgb).unwrap();
        registry.get_or_parse(&p3).unwrap();
        assert_eq!(registry.profile_count(), 1);

        // The sRGB entry was evicted; parsing again yields a fresh
        // instance while the old Arc stays usable.
        let second = registry.get_or_parse(&srgb).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn test_pipeline_cached_per_intent() {
        let registry = Registry::new(4);
        let src = registry.get_or_parse(&synth::srgb()).unwrap();
        let dst = registry.get_or_parse(&synth::linear_display_p3()).unwrap();

        let a = registry
            .get_or_build(&src, &dst, RenderingIntent::RelativeColorimetric)
            .unwrap();
        let b = registry
            .get_or_build(&src, &dst, RenderingIntent::RelativeColorimetric)
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let c = registry
            .get_or_build(&src, &dst, RenderingIntent::Perceptual)
            .unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.pipeline_count(), 2);
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let registry = Registry::new(0);
        registry.get_or_parse(&synth::srgb()).unwrap();
        assert_eq!(registry.profile_count(), 1);
    }
}
