//! Capture session: one headless browser process per run.
//!
//! The synchronous CDP client is owned by a dedicated worker thread; async
//! callers send commands over a channel and await oneshot replies, so the
//! pipeline can use an async interface without requiring the client to be
//! `Send` across tasks. The worker executes one command at a time, which
//! also keeps captures strictly sequential.
//!
//! Dropping a `CaptureSession` without calling [`CaptureSession::close`]
//! still terminates the browser: the command channel closes, the worker loop
//! ends, and the browser process is killed when the client is dropped.

use crate::error::{Error, Result};
use crate::{CaptureConfig, Viewport};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page as CdpPage;
use headless_chrome::{Browser, LaunchOptions};
use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

/// Script evaluated in every page before capture. Sets the render-mode
/// marker (`data-sitecard` on `<body>`) that a page's styling can observe to
/// present a screenshot-specific layout. One-way; nothing is read back.
const RENDER_MODE_SCRIPT: &str = "document.body.dataset.sitecard = 'true';";

enum Command {
    OpenPage(oneshot::Sender<Result<u64>>),
    Goto(u64, String, oneshot::Sender<Result<()>>),
    SignalRenderMode(u64, oneshot::Sender<Result<()>>),
    Screenshot(u64, oneshot::Sender<Result<Vec<u8>>>),
    ClosePage(u64, oneshot::Sender<Result<()>>),
    Close(oneshot::Sender<Result<()>>),
}

/// Owns the browser process and its fixed-size browsing context for the
/// duration of a run. Cheap to clone; all clones drive the same browser.
#[derive(Clone)]
pub struct CaptureSession {
    cmd_tx: Sender<Command>,
}

/// One page instance, exclusive to a single route's capture.
pub struct Page {
    id: u64,
    cmd_tx: Sender<Command>,
}

impl CaptureSession {
    /// Launch the headless browser with the configured window size.
    ///
    /// Launch failure is fatal to the run; no route is processed.
    pub async fn launch(config: &CaptureConfig) -> Result<Self> {
        let viewport = config.viewport;
        let timeout = Duration::from_millis(config.timeout_ms);

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            // Initialize the browser on the worker thread
            let mut worker = match Worker::launch(viewport, timeout) {
                Ok(w) => w,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            // Command loop; ends when the last sender is dropped
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::OpenPage(resp) => {
                        let _ = resp.send(worker.open_page());
                    }
                    Command::Goto(id, url, resp) => {
                        let _ = resp.send(worker.goto(id, &url));
                    }
                    Command::SignalRenderMode(id, resp) => {
                        let _ = resp.send(worker.signal_render_mode(id));
                    }
                    Command::Screenshot(id, resp) => {
                        let _ = resp.send(worker.screenshot(id));
                    }
                    Command::ClosePage(id, resp) => {
                        let _ = resp.send(worker.close_page(id));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(worker.close());
                        break;
                    }
                }
            }
        });

        let init_res = init_rx
            .await
            .map_err(|e| Error::Launch(format!("browser worker exited during init: {e}")))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    /// Open a fresh page instance for one route's capture.
    pub async fn open_page(&self) -> Result<Page> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::OpenPage(tx));
        let id = rx
            .await
            .map_err(|e| Error::Other(format!("open_page canceled: {e}")))??;
        Ok(Page {
            id,
            cmd_tx: self.cmd_tx.clone(),
        })
    }

    /// Shut the worker down and terminate the browser.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("close canceled: {e}")))?
    }
}

impl Page {
    /// Navigate to a URL and wait until the page has loaded.
    pub async fn goto(&self, url: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Goto(self.id, url.to_string(), tx));
        rx.await
            .map_err(|e| Error::Other(format!("goto canceled: {e}")))?
    }

    /// Set the render-mode marker on the document body.
    pub async fn signal_render_mode(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::SignalRenderMode(self.id, tx));
        rx.await
            .map_err(|e| Error::Other(format!("signal canceled: {e}")))?
    }

    /// Capture the page as PNG bytes at the session's fixed viewport.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Screenshot(self.id, tx));
        rx.await
            .map_err(|e| Error::Other(format!("screenshot canceled: {e}")))?
    }

    /// Release the page's navigation and rendering resources.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::ClosePage(self.id, tx));
        rx.await
            .map_err(|e| Error::Other(format!("close page canceled: {e}")))?
    }
}

/// Worker-thread state: the browser and its open tabs, one per in-flight
/// route.
struct Worker {
    browser: Browser,
    tabs: HashMap<u64, Arc<Tab>>,
    next_page: u64,
    timeout: Duration,
}

impl Worker {
    fn launch(viewport: Viewport, timeout: Duration) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((viewport.width, viewport.height)))
            .build()
            .map_err(|e| Error::Launch(format!("Failed to build launch options: {e}")))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::Launch(format!("Failed to launch browser: {e}")))?;

        Ok(Self {
            browser,
            tabs: HashMap::new(),
            next_page: 0,
            timeout,
        })
    }

    fn open_page(&mut self) -> Result<u64> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| Error::Load(format!("Failed to open page: {e}")))?;
        tab.set_default_timeout(self.timeout);

        let id = self.next_page;
        self.next_page += 1;
        self.tabs.insert(id, tab);
        Ok(id)
    }

    fn goto(&self, id: u64, url: &str) -> Result<()> {
        let tab = self.tab(id)?;
        tab.navigate_to(url)
            .map_err(|e| Error::Load(format!("Navigation to {url} failed: {e}")))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::Load(format!("Wait for {url} failed: {e}")))?;
        Ok(())
    }

    fn signal_render_mode(&self, id: u64) -> Result<()> {
        self.tab(id)?
            .evaluate(RENDER_MODE_SCRIPT, false)
            .map_err(|e| Error::Script(format!("Render-mode signal failed: {e}")))?;
        Ok(())
    }

    fn screenshot(&self, id: u64) -> Result<Vec<u8>> {
        self.tab(id)?
            .capture_screenshot(CdpPage::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::Capture(format!("Screenshot failed: {e}")))
    }

    fn close_page(&mut self, id: u64) -> Result<()> {
        let tab = self
            .tabs
            .remove(&id)
            .ok_or_else(|| Error::Other(format!("unknown page id {id}")))?;
        tab.close(true)
            .map_err(|e| Error::Other(format!("Failed to close page: {e}")))?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Drop the tab handles before the browser so the child process
        // terminates promptly
        self.tabs.clear();
        Ok(())
    }

    fn tab(&self, id: u64) -> Result<&Arc<Tab>> {
        self.tabs
            .get(&id)
            .ok_or_else(|| Error::Other(format!("unknown page id {id}")))
    }
}
