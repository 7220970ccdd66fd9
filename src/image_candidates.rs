// src/image_candidates.rs
use crate::fallback_catalog::FallbackCatalog;
use crate::image_url::{
    classify, compose_backend_relative, is_blocked_hotlink, to_served_url, with_cache_buster,
    ImageRefKind,
};
use crate::site_config::{ImagePolicy, SiteConfig};
use serde_json::Value;
use std::collections::HashSet;

/// Number of stock images synthesized when a listing has no usable image,
/// fewer when the catalog itself is smaller.
pub const FALLBACK_SET_SIZE: usize = 4;

const CACHED_PATH_FIELDS: [&str; 3] = ["image_path", "cached_path", "cachedPath"];
const CACHED_PATH_LIST_FIELDS: [&str; 3] = ["image_paths", "cached_paths", "cachedPaths"];

/// Image references of one listing, lifted out of the loosely-typed feed record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedImageSources {
    pub cached_paths: Vec<String>,
    pub primary: Option<String>,
    pub gallery: Vec<String>,
}

impl NormalizedImageSources {
    /// Missing fields, wrong types and non-string list entries all contribute nothing.
    pub fn from_record(record: &Value) -> Self {
        let mut cached_paths: Vec<String> = CACHED_PATH_FIELDS
            .iter()
            .filter_map(|field| non_empty_str(record.get(*field)))
            .collect();
        for field in CACHED_PATH_LIST_FIELDS {
            cached_paths.extend(string_list(record.get(field)));
        }

        Self {
            cached_paths,
            primary: non_empty_str(record.get("image")),
            gallery: string_list(record.get("images")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cached_paths.is_empty() && self.primary.is_none() && self.gallery.is_empty()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| non_empty_str(Some(item)))
            .collect(),
        Some(single @ Value::String(_)) => non_empty_str(Some(single)).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Ordered, de-duplicated display candidates for one listing. Never empty
/// when produced by [`CandidateBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateList {
    urls: Vec<String>,
    synthesized: bool,
}

impl CandidateList {
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    /// True when every entry came from the fallback catalog.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }
}

#[cfg(test)]
impl From<Vec<String>> for CandidateList {
    fn from(urls: Vec<String>) -> Self {
        Self {
            urls,
            synthesized: false,
        }
    }
}

pub struct CandidateBuilder<'a> {
    backend_base_url: &'a str,
    policy: &'a ImagePolicy,
    catalog: &'a FallbackCatalog,
}

impl<'a> CandidateBuilder<'a> {
    pub fn new(
        backend_base_url: &'a str,
        policy: &'a ImagePolicy,
        catalog: &'a FallbackCatalog,
    ) -> Self {
        Self {
            backend_base_url,
            policy,
            catalog,
        }
    }

    pub fn from_config(config: &'a SiteConfig) -> Self {
        Self::new(
            &config.backend_base_url,
            &config.image_policy,
            &config.fallback_catalog,
        )
    }

    /// Mirrored files first, then the designated primary image, then the rest
    /// of the gallery. Falls back to a stable rotation of stock images.
    pub fn build(&self, entity_id: &str, sources: &NormalizedImageSources) -> CandidateList {
        if sources.is_empty() {
            return self.synthesize(entity_id);
        }

        let served = sources
            .cached_paths
            .iter()
            .filter_map(|path| to_served_url(path, self.backend_base_url));
        let remote = sources
            .primary
            .iter()
            .chain(sources.gallery.iter())
            .filter_map(|raw| self.resolve_remote(entity_id, raw));

        let mut seen = HashSet::new();
        let urls: Vec<String> = served
            .chain(remote)
            .filter(|url| seen.insert(url.clone()))
            .collect();

        if urls.is_empty() {
            log::debug!("No usable images for {}, using stock rotation", entity_id);
            return self.synthesize(entity_id);
        }

        CandidateList {
            urls,
            synthesized: false,
        }
    }

    fn synthesize(&self, entity_id: &str) -> CandidateList {
        CandidateList {
            urls: self.catalog.rotation_for(entity_id, FALLBACK_SET_SIZE),
            synthesized: true,
        }
    }

    fn resolve_remote(&self, entity_id: &str, raw: &str) -> Option<String> {
        match classify(raw) {
            ImageRefKind::RemoteAbsolute => {
                if self.policy.has_local_path_marker(raw) {
                    log::debug!("Dropping cache path leaked into remote field: {}", raw);
                    None
                } else if is_blocked_hotlink(raw, self.policy) {
                    log::debug!("Dropping blocked hotlink: {}", raw);
                    None
                } else {
                    Some(with_cache_buster(raw.trim(), entity_id, self.policy))
                }
            }
            ImageRefKind::BackendRelative => {
                Some(compose_backend_relative(raw, self.backend_base_url))
            }
            ImageRefKind::CachedLocal | ImageRefKind::Unusable => {
                log::debug!("Dropping unusable image reference: {:?}", raw);
                None
            }
        }
    }
}
