//! sitecard
//!
//! Build-time social-card screenshots for static sites. After the site has
//! been built, sitecard serves the output directory on an ephemeral local
//! port, drives a headless Chrome instance through every page, and writes a
//! fixed-size PNG per route under `og/` in the public assets root. Page
//! templates can point their metadata tags at the matching image with
//! [`routes::screenshot_url`].
//!
//! # Example
//!
//! ```no_run
//! use sitecard::{pipeline, routes::Route, CaptureConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CaptureConfig::new("dist", "public");
//! let pages = vec![Route::new("/"), Route::new("/about/")];
//!
//! let report = pipeline::run(&config, &pages).await?;
//! println!("{} of {} screenshots written", report.written(), pages.len());
//! # Ok(())
//! # }
//! ```
//!
//! Every page is captured with `data-sitecard="true"` set on `<body>`, so a
//! site's stylesheet can swap in a screenshot-specific presentation:
//!
//! ```css
//! body[data-sitecard] nav { display: none; }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod pipeline;
pub mod routes;
pub mod server;
pub mod session;

pub use pipeline::{CaptureReport, RouteOutcome};
pub use session::CaptureSession;

/// Configuration for one capture run.
///
/// Passed explicitly to [`pipeline::run`]; nothing about a run is ambient
/// state. Defaults capture at 1200×600, the uniform social-card aspect
/// ratio shared by every page, with a 30 second per-navigation deadline.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Build output directory served to the browser during capture
    pub dist_dir: PathBuf,
    /// Public assets root; screenshots land under its `og/` subdirectory
    pub assets_dir: PathBuf,
    /// Window and viewport size shared by every captured page
    pub viewport: Viewport,
    /// Deadline for each navigation/capture step in milliseconds
    pub timeout_ms: u64,
}

impl CaptureConfig {
    pub fn new(dist_dir: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            dist_dir: dist_dir.into(),
            assets_dir: assets_dir.into(),
            viewport: Viewport::default(),
            timeout_ms: 30_000,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::new("dist", "public");
        assert_eq!(config.viewport.width, 1200);
        assert_eq!(config.viewport.height, 600);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_viewport() {
        let viewport = Viewport {
            width: 1600,
            height: 800,
        };
        assert_eq!(viewport.width, 1600);
        assert_eq!(viewport.height, 800);
    }
}
