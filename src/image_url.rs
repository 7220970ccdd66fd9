// src/image_url.rs
//
// Classification and normalization of raw image references coming from the
// listing feed. Everything here is pure and never fails: a reference that
// cannot be turned into something displayable simply yields `None`/`Unusable`.

use crate::site_config::{HostPolicy, ImagePolicy};
use url::Url;

/// Route prefixes handled by the backend image endpoint.
const BACKEND_IMAGE_PREFIXES: [&str; 2] = ["/api/images/", "/images/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRefKind {
    /// Filesystem path to a file mirrored by the backend image server.
    CachedLocal,
    /// `http://` or `https://` URL.
    RemoteAbsolute,
    /// Path under the backend image route, needs the configured base URL.
    BackendRelative,
    Unusable,
}

pub fn classify(raw: &str) -> ImageRefKind {
    let raw = raw.trim();
    if raw.is_empty() {
        return ImageRefKind::Unusable;
    }
    if is_remote_absolute(raw) {
        return match Url::parse(raw) {
            Ok(parsed) if parsed.host_str().is_some_and(|host| !host.is_empty()) => {
                ImageRefKind::RemoteAbsolute
            }
            _ => ImageRefKind::Unusable,
        };
    }
    if BACKEND_IMAGE_PREFIXES
        .iter()
        .any(|prefix| raw.starts_with(prefix))
    {
        // The route alone names no image.
        return match file_name(raw) {
            Some(_) => ImageRefKind::BackendRelative,
            None => ImageRefKind::Unusable,
        };
    }
    // Other schemes and protocol-relative URLs are never displayed.
    if raw.contains("://") || raw.starts_with("//") || raw.starts_with("data:") {
        return ImageRefKind::Unusable;
    }
    if (raw.contains('/') || raw.contains('\\')) && file_name(raw).is_some() {
        return ImageRefKind::CachedLocal;
    }
    ImageRefKind::Unusable
}

fn is_remote_absolute(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Final path segment, accepting both `/` and `\` separators.
pub fn file_name(path: &str) -> Option<&str> {
    path.trim()
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim().trim_end_matches('/')
}

/// Served URL for a file the scraper mirrored locally. Directory structure is discarded.
pub fn to_served_url(cached_local_path: &str, backend_base_url: &str) -> Option<String> {
    let name = file_name(cached_local_path)?;
    Some(format!(
        "{}/images/{}",
        trim_base(backend_base_url),
        urlencoding::encode(name)
    ))
}

/// Joins a backend route onto the base URL. When the base already ends with
/// the route's first segment (e.g. base `.../api` and route `/api/images/x`),
/// that segment is only emitted once.
pub fn compose_backend_relative(relative_path: &str, backend_base_url: &str) -> String {
    let route = relative_path.trim().trim_start_matches('/');
    let lead = route.split('/').next().unwrap_or_default();
    let base = strip_trailing_segment(trim_base(backend_base_url), lead);
    format!("{}/{}", base, route)
}

fn strip_trailing_segment<'a>(base: &'a str, segment: &str) -> &'a str {
    if segment.is_empty() {
        return base;
    }
    // Only path segments may be stripped, never part of the authority.
    let path_start = match base.find("://") {
        Some(scheme_end) => {
            let authority = scheme_end + 3;
            base[authority..]
                .find('/')
                .map_or(base.len(), |offset| authority + offset)
        }
        None => 0,
    };
    match base.strip_suffix(segment) {
        Some(rest) if rest.ends_with('/') && rest.len() > path_start => &rest[..rest.len() - 1],
        _ => base,
    }
}

fn host_policy(url: &str, policy: &ImagePolicy) -> Option<HostPolicy> {
    let parsed = Url::parse(url.trim()).ok()?;
    policy.rule_for_host(parsed.host_str()?)
}

pub fn is_blocked_hotlink(url: &str, policy: &ImagePolicy) -> bool {
    match host_policy(url, policy) {
        Some(HostPolicy::Block) => true,
        Some(HostPolicy::CacheBust) => policy.block_cache_bust_hosts,
        None => false,
    }
}

/// Keys the URL by entity when its host serves stale cached responses.
/// Blocked hosts are left untouched; the caller drops them anyway.
pub fn with_cache_buster(url: &str, entity_id: &str, policy: &ImagePolicy) -> String {
    if host_policy(url, policy) != Some(HostPolicy::CacheBust) || policy.block_cache_bust_hosts {
        return url.to_string();
    }
    match Url::parse(url.trim()) {
        Ok(mut parsed) => {
            parsed
                .query_pairs_mut()
                .append_pair(&policy.cache_bust_param, entity_id);
            parsed.into()
        }
        Err(_) => url.to_string(),
    }
}

/// Deterministic catalog index for an entity: its decimal digits reduced
/// modulo the catalog size, or a base-31 rolling hash of its UTF-16 code
/// units when it has no digits.
pub fn fallback_index(entity_id: &str, catalog_size: usize) -> usize {
    if catalog_size == 0 {
        return 0;
    }
    let size = catalog_size as u128;

    let mut saw_digit = false;
    let mut remainder: u128 = 0;
    for digit in entity_id.bytes().filter(u8::is_ascii_digit) {
        saw_digit = true;
        remainder = (remainder * 10 + u128::from(digit - b'0')) % size;
    }
    if saw_digit {
        return remainder as usize;
    }

    let hash = entity_id
        .encode_utf16()
        .fold(0u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(u32::from(unit)));
    (u128::from(hash) % size) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classifies_each_reference_shape() {
        assert_eq!(classify("https://cdn.example.com/a.jpg"), ImageRefKind::RemoteAbsolute);
        assert_eq!(classify("HTTP://cdn.example.com/a.jpg"), ImageRefKind::RemoteAbsolute);
        assert_eq!(classify("/api/images/a.jpg"), ImageRefKind::BackendRelative);
        assert_eq!(classify("/images/a.jpg"), ImageRefKind::BackendRelative);
        assert_eq!(classify("media_cache\\abc.jpeg"), ImageRefKind::CachedLocal);
        assert_eq!(classify("media_cache/abc.jpeg"), ImageRefKind::CachedLocal);
    }

    #[test]
    fn unusable_references() {
        assert_eq!(classify(""), ImageRefKind::Unusable);
        assert_eq!(classify("   "), ImageRefKind::Unusable);
        assert_eq!(classify("abc.jpeg"), ImageRefKind::Unusable);
        assert_eq!(classify("media_cache/"), ImageRefKind::Unusable);
        assert_eq!(classify("ftp://host/a.jpg"), ImageRefKind::Unusable);
        assert_eq!(classify("//cdn.example.com/a.jpg"), ImageRefKind::Unusable);
        assert_eq!(classify("data:image/png;base64,AAAA"), ImageRefKind::Unusable);
    }

    #[test]
    fn bare_scheme_or_route_is_unusable() {
        assert_eq!(classify("http://"), ImageRefKind::Unusable);
        assert_eq!(classify("/api/images/"), ImageRefKind::Unusable);
        assert_eq!(classify("/images/"), ImageRefKind::Unusable);
        assert_eq!(classify("/images/dir/"), ImageRefKind::Unusable);
    }

    #[test]
    fn served_url_keeps_only_the_file_name() {
        assert_eq!(
            to_served_url("cache\\dir\\abc.jpeg", "http://host/api").as_deref(),
            Some("http://host/api/images/abc.jpeg")
        );
        assert_eq!(
            to_served_url("/var/cache/dir/abc.jpeg", "http://host/api/").as_deref(),
            Some("http://host/api/images/abc.jpeg")
        );
    }

    #[test]
    fn served_url_percent_encodes_file_name() {
        assert_eq!(
            to_served_url("cache/my photo#1.jpg", "http://host/api").as_deref(),
            Some("http://host/api/images/my%20photo%231.jpg")
        );
    }

    #[test]
    fn served_url_needs_a_file_name() {
        assert_eq!(to_served_url("cache/dir/", "http://host/api"), None);
        assert_eq!(to_served_url("cache\\", "http://host/api"), None);
        assert_eq!(to_served_url("", "http://host/api"), None);
    }

    #[test]
    fn backend_relative_avoids_double_api() {
        assert_eq!(
            compose_backend_relative("/api/images/a.jpg", "http://host/api"),
            "http://host/api/images/a.jpg"
        );
        assert_eq!(
            compose_backend_relative("/api/images/a.jpg", "http://host/api/"),
            "http://host/api/images/a.jpg"
        );
        assert_eq!(
            compose_backend_relative("/images/a.jpg", "http://host/api"),
            "http://host/api/images/a.jpg"
        );
        assert_eq!(
            compose_backend_relative("/api/images/a.jpg", "http://host"),
            "http://host/api/images/a.jpg"
        );
    }

    #[test]
    fn backend_relative_never_strips_the_host() {
        assert_eq!(
            compose_backend_relative("/api/images/a.jpg", "http://api"),
            "http://api/api/images/a.jpg"
        );
    }

    #[test]
    fn backend_relative_with_relative_base() {
        assert_eq!(compose_backend_relative("/api/images/a.jpg", ""), "/api/images/a.jpg");
        assert_eq!(compose_backend_relative("/api/images/a.jpg", "/api"), "/api/images/a.jpg");
    }

    #[test]
    fn blocked_hosts_and_category_flag() {
        let policy = ImagePolicy::default().with_rule("hotlink.example.net", HostPolicy::Block);
        assert!(is_blocked_hotlink("https://img.hotlink.example.net/a.jpg", &policy));
        assert!(!is_blocked_hotlink("https://media.rightmove.co.uk/a.jpg", &policy));
        assert!(!is_blocked_hotlink("not a url", &policy));

        let policy = policy.with_cache_bust_hosts_blocked(true);
        assert!(is_blocked_hotlink("https://media.rightmove.co.uk/a.jpg", &policy));
    }

    #[test]
    fn cache_buster_only_for_cache_bust_hosts() {
        let policy = ImagePolicy::default();
        assert_eq!(
            with_cache_buster("https://media.rightmove.co.uk/a.jpg", "p1", &policy),
            "https://media.rightmove.co.uk/a.jpg?cb=p1"
        );
        assert_eq!(
            with_cache_buster("https://media.rightmove.co.uk/a.jpg?w=800", "p1", &policy),
            "https://media.rightmove.co.uk/a.jpg?w=800&cb=p1"
        );
        assert_eq!(
            with_cache_buster("https://images.example.com/a.jpg", "p1", &policy),
            "https://images.example.com/a.jpg"
        );
    }

    #[test]
    fn fallback_index_edge_cases() {
        assert_eq!(fallback_index("", 31), 0);
        assert_eq!(fallback_index("42", 31), 11);
        assert_eq!(fallback_index("abc-42-x", 31), 11);
        assert_eq!(fallback_index("anything", 0), 0);
        // "ab" = 97 * 31 + 98
        assert_eq!(fallback_index("ab", 10_000), 3105);
    }

    #[test]
    fn fallback_index_handles_long_digit_runs() {
        let id = "99999999999999999999999999999999";
        assert!(fallback_index(id, 31) < 31);
        assert_eq!(fallback_index(id, 10), 9);
    }

    proptest! {
        #[test]
        fn fallback_index_is_deterministic_and_in_range(id in ".*", size in 1usize..64) {
            let first = fallback_index(&id, size);
            prop_assert_eq!(first, fallback_index(&id, size));
            prop_assert!(first < size);
        }

        #[test]
        fn either_separator_yields_same_served_url(
            dirs in proptest::collection::vec("[a-z_]{1,8}", 0..4),
            name in "[A-Za-z0-9 ._-]{0,12}[A-Za-z0-9]",
        ) {
            let mut parts = dirs.clone();
            parts.push(name.clone());
            let unix = parts.join("/");
            let windows = parts.join("\\");
            let served = to_served_url(&unix, "http://host/api/");
            prop_assert_eq!(&served, &to_served_url(&windows, "http://host/api"));
            let served = served.unwrap();
            prop_assert!(!served.contains("/api/api"));
            prop_assert!(served.starts_with("http://host/api/images/"));
            prop_assert!(!served.contains('\\'));
        }
    }
}
