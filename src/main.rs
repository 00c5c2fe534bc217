//! sitecard CLI: capture social-card screenshots after a static site build.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sitecard::{pipeline, routes, CaptureConfig};
use std::path::PathBuf;
use url::Url;

/// Generate a social-card screenshot for every page of a built static site.
#[derive(Parser)]
#[command(name = "sitecard", version, about)]
struct Cli {
    /// Build output directory to serve during capture
    #[arg(long, value_name = "DIR")]
    dist: PathBuf,

    /// Public assets root; screenshots are written under its og/ directory
    #[arg(long, value_name = "DIR")]
    assets: PathBuf,

    /// Page manifest: JSON array of descriptors with at least a "pathname"
    #[arg(long, value_name = "FILE")]
    pages: PathBuf,

    /// Deadline for each navigation/capture step, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    timeout_ms: u64,

    /// Also print each route's public screenshot URL against this origin
    #[arg(long, value_name = "URL")]
    site: Option<Url>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pages = routes::load_manifest(&cli.pages)
        .with_context(|| format!("loading page manifest {}", cli.pages.display()))?;
    if pages.is_empty() {
        println!("sitecard: page manifest is empty, nothing to capture");
        return Ok(());
    }

    let mut config = CaptureConfig::new(&cli.dist, &cli.assets);
    config.timeout_ms = cli.timeout_ms;

    let report = pipeline::run(&config, &pages)
        .await
        .context("capture run failed")?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(target) => println!("  {} -> {}", outcome.pathname, target.display()),
            Err(e) => eprintln!("  {} failed: {e}", outcome.pathname),
        }
    }

    if let Some(site) = &cli.site {
        for page in &pages {
            if let Ok(url) = routes::screenshot_url(&page.pathname, site) {
                println!("  {} => {url}", page.pathname);
            }
        }
    }

    println!(
        "sitecard: {} written, {} failed",
        report.written(),
        report.failed()
    );

    if !report.is_success() {
        bail!("{} of {} routes failed", report.failed(), report.outcomes.len());
    }
    Ok(())
}
