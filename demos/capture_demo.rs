//! End-to-end demo: build a tiny two-page site in a temp directory, capture
//! both pages, and print where the screenshots landed.
//!
//! Run with: cargo run --example capture_demo

use sitecard::{pipeline, routes::Route, CaptureConfig};
use std::fs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("sitecard capture demo\n");

    let dist = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;

    fs::write(
        dist.path().join("index.html"),
        r#"<!DOCTYPE html>
<html>
<head><title>Demo</title>
<style>
  body { font: 48px sans-serif; display: grid; place-items: center; height: 100vh; margin: 0 }
  body[data-sitecard] { background: #1e2430; color: #fff }
</style></head>
<body><div>Hello from sitecard</div></body>
</html>"#,
    )?;
    fs::create_dir(dist.path().join("about"))?;
    fs::write(
        dist.path().join("about/index.html"),
        "<html><head><title>About</title></head><body><h1>About</h1></body></html>",
    )?;

    let config = CaptureConfig::new(dist.path(), out.path());
    let pages = vec![Route::new("/"), Route::new("/about/")];

    println!("Capturing {} pages at {}x{}...", pages.len(), config.viewport.width, config.viewport.height);
    let report = pipeline::run(&config, &pages).await?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(target) => {
                let size = fs::metadata(target)?.len();
                println!("  {} -> {} ({size} bytes)", outcome.pathname, target.display());
            }
            Err(e) => println!("  {} failed: {e}", outcome.pathname),
        }
    }

    println!("\n{} written, {} failed", report.written(), report.failed());
    Ok(())
}
