//! Route handling and screenshot path mapping.
//!
//! Provides the mapping from a page's root-relative pathname to its
//! screenshot location:
//! - Relative output path under the `og/` directory
//! - Absolute public URL for templates embedding their own card image
//! - Page manifest loading for the CLI

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory under the public assets root where screenshots are written.
pub const SCREENSHOT_DIR: &str = "og";

/// One page of the built site, identified by its root-relative pathname.
///
/// Produced by the build process (typically via a JSON manifest); consumed
/// verbatim. Callers guarantee `pathname` starts with `/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub pathname: String,
}

impl Route {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
        }
    }
}

/// Map a route pathname to its screenshot path, relative to the assets root.
///
/// The root route maps to `og/index.png`; any other pathname has one
/// trailing slash stripped and `.png` appended. Total and deterministic.
///
/// # Examples
/// ```
/// use sitecard::routes::screenshot_rel_path;
/// use std::path::PathBuf;
/// assert_eq!(screenshot_rel_path("/"), PathBuf::from("og/index.png"));
/// assert_eq!(screenshot_rel_path("/about/"), PathBuf::from("og/about.png"));
/// assert_eq!(screenshot_rel_path("/blog/post-1"), PathBuf::from("og/blog/post-1.png"));
/// ```
#[inline]
pub fn screenshot_rel_path(pathname: &str) -> PathBuf {
    if pathname == "/" {
        return Path::new(SCREENSHOT_DIR).join("index.png");
    }
    let trimmed = pathname.strip_suffix('/').unwrap_or(pathname);
    PathBuf::from(format!("{SCREENSHOT_DIR}{trimmed}.png"))
}

/// Public URL of a route's screenshot, resolved against the site origin.
///
/// Render-time helper for page templates that want to reference their own
/// card image in metadata tags. Never called by the capture pipeline.
///
/// # Examples
/// ```
/// use sitecard::routes::screenshot_url;
/// use url::Url;
/// let site = Url::parse("https://example.com").unwrap();
/// let url = screenshot_url("/about", &site).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/og/about.png");
/// ```
pub fn screenshot_url(pathname: &str, site: &Url) -> Result<Url> {
    let rel = screenshot_rel_path(pathname);
    let path = rel
        .to_str()
        .ok_or_else(|| Error::Other(format!("non-UTF-8 screenshot path for {pathname}")))?;
    site.join(&format!("/{path}"))
        .map_err(|e| Error::Other(format!("cannot resolve {path} against {site}: {e}")))
}

/// Load the ordered page manifest the build process hands over.
///
/// The manifest is a JSON array of page descriptors; each descriptor must
/// carry at least a `pathname`, extra fields are ignored.
pub fn load_manifest(path: &Path) -> Result<Vec<Route>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Manifest(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::Manifest(format!("cannot parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_maps_to_index() {
        assert_eq!(screenshot_rel_path("/"), PathBuf::from("og/index.png"));
    }

    #[test]
    fn test_trailing_slash_stripped() {
        assert_eq!(screenshot_rel_path("/about/"), PathBuf::from("og/about.png"));
        assert_eq!(screenshot_rel_path("/about"), PathBuf::from("og/about.png"));
    }

    #[test]
    fn test_nested_route() {
        assert_eq!(
            screenshot_rel_path("/blog/post-1"),
            PathBuf::from("og/blog/post-1.png")
        );
    }

    #[test]
    fn test_mapping_is_deterministic() {
        for pathname in ["/", "/about/", "/blog/post-1", "/a/b/c/"] {
            assert_eq!(screenshot_rel_path(pathname), screenshot_rel_path(pathname));
        }
    }

    #[test]
    fn test_public_url() {
        let site = Url::parse("https://example.com").unwrap();
        assert_eq!(
            screenshot_url("/about", &site).unwrap().as_str(),
            "https://example.com/og/about.png"
        );
        assert_eq!(
            screenshot_url("/", &site).unwrap().as_str(),
            "https://example.com/og/index.png"
        );
    }

    #[test]
    fn test_public_url_ignores_origin_path() {
        // Screenshot URLs are rooted at the origin, not at any base path
        let site = Url::parse("https://example.com/docs/").unwrap();
        assert_eq!(
            screenshot_url("/about", &site).unwrap().as_str(),
            "https://example.com/og/about.png"
        );
    }

    #[test]
    fn test_manifest_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("pages.json");
        fs::write(
            &manifest,
            r#"[{"pathname": "/"}, {"pathname": "/about/", "title": "About"}]"#,
        )
        .unwrap();

        let routes = load_manifest(&manifest).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].pathname, "/");
        assert_eq!(routes[1].pathname, "/about/");
    }

    #[test]
    fn test_manifest_missing_pathname_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("pages.json");
        fs::write(&manifest, r#"[{"title": "no pathname"}]"#).unwrap();

        assert!(matches!(load_manifest(&manifest), Err(Error::Manifest(_))));
    }
}
