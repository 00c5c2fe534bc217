//! Capture pipeline: one screenshot per route.
//!
//! Stands the static server up over the build output, launches the capture
//! session, walks the routes strictly in order, and writes each capture to
//! its mapped path under the assets root. Server and browser are released
//! exactly once per run on every exit path: explicitly after the last route,
//! or through their drop handlers when setup fails partway.

use crate::error::{Error, Result};
use crate::routes::{self, Route};
use crate::server::StaticServer;
use crate::session::{CaptureSession, Page};
use crate::CaptureConfig;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;
use url::Url;

/// What happened to one route.
#[derive(Debug)]
pub struct RouteOutcome {
    pub pathname: String,
    /// Path of the written screenshot, or why this route failed.
    pub result: Result<PathBuf>,
}

/// Per-route results for a completed run, in route iteration order.
#[derive(Debug, Default)]
pub struct CaptureReport {
    pub outcomes: Vec<RouteOutcome>,
}

impl CaptureReport {
    /// True when every route produced a screenshot.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.written()
    }
}

/// Capture a screenshot for every route.
///
/// Routes are processed one at a time in the order given. A route that fails
/// to navigate, capture, or write is recorded in the report and the run
/// continues with the next route; only a server bind or browser launch
/// failure aborts the whole run. Files already written stay on disk either
/// way.
pub async fn run(config: &CaptureConfig, pages: &[Route]) -> Result<CaptureReport> {
    fs::create_dir_all(config.assets_dir.join(routes::SCREENSHOT_DIR))?;

    let server = StaticServer::bind(&config.dist_dir)?;
    // On launch failure the server handle drops here, releasing the port
    let session = CaptureSession::launch(config).await?;

    let mut report = CaptureReport::default();
    for page in pages {
        let result = capture_route(&session, server.origin(), config, page).await;
        match &result {
            Ok(target) => debug!("captured {} -> {}", page.pathname, target.display()),
            Err(e) => warn!("capture of {} failed: {e}", page.pathname),
        }
        report.outcomes.push(RouteOutcome {
            pathname: page.pathname.clone(),
            result,
        });
    }

    let closed = session.close().await;
    server.close();
    closed?;

    Ok(report)
}

/// Produce one route's screenshot: open a page, navigate, signal render
/// mode, capture, write. The page is closed before returning, success or
/// not.
async fn capture_route(
    session: &CaptureSession,
    origin: &Url,
    config: &CaptureConfig,
    route: &Route,
) -> Result<PathBuf> {
    let url = origin
        .join(&route.pathname)
        .map_err(|e| Error::Load(format!("bad route pathname {:?}: {e}", route.pathname)))?;

    let page = session.open_page().await?;
    let result = capture_page(&page, config, route, &url).await;
    let closed = page.close().await;

    let target = result?;
    closed?;
    Ok(target)
}

async fn capture_page(
    page: &Page,
    config: &CaptureConfig,
    route: &Route,
    url: &Url,
) -> Result<PathBuf> {
    page.goto(url.as_str()).await?;
    page.signal_render_mode().await?;
    let png = page.screenshot().await?;

    let target = config
        .assets_dir
        .join(routes::screenshot_rel_path(&route.pathname));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &png)?;

    Ok(target)
}
