//! Error types for the capture run

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating screenshots
#[derive(Error, Debug)]
pub enum Error {
    /// The headless browser failed to start
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// The ephemeral static server could not be bound or stopped
    #[error("Static server failed: {0}")]
    Serve(String),

    /// A page failed to navigate or finish loading
    #[error("Failed to load page: {0}")]
    Load(String),

    /// The render-mode signal script could not be executed
    #[error("Script execution failed: {0}")]
    Script(String),

    /// Screenshot capture failed
    #[error("Screenshot capture failed: {0}")]
    Capture(String),

    /// The page manifest could not be read or parsed
    #[error("Invalid page manifest: {0}")]
    Manifest(String),

    /// Filesystem error while writing output
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
