// src/utils.rs
use gloo_utils::window;

/// Path prefix the site is served under when deployed below the domain root.
const DEPLOY_PREFIX: &str = "/property-gallery";

/// Base path for a given page pathname. Empty when served from the root.
pub fn base_path_for(pathname: &str) -> &'static str {
    let under_prefix = pathname
        .strip_prefix(DEPLOY_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
    if under_prefix {
        DEPLOY_PREFIX
    } else {
        ""
    }
}

/// Get the base path for the running page
pub fn get_base_url() -> &'static str {
    let pathname = window().location().pathname().unwrap_or_default();
    base_path_for(&pathname)
}

/// Join a static resource path onto a base path.
pub fn join_resource(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Build a resource URL with the correct base path
pub fn resource_url(path: &str) -> String {
    join_resource(get_base_url(), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_detection() {
        assert_eq!(base_path_for("/property-gallery/"), "/property-gallery");
        assert_eq!(base_path_for("/property-gallery"), "/property-gallery");
        assert_eq!(base_path_for("/property-gallery-old/"), "");
        assert_eq!(base_path_for("/"), "");
    }

    #[test]
    fn test_resource_url_formatting() {
        assert_eq!(
            join_resource("", "/public/site-config.json"),
            "/public/site-config.json"
        );
        assert_eq!(
            join_resource("/property-gallery", "public/site-config.json"),
            "/property-gallery/public/site-config.json"
        );
    }
}
