use std::io;

use thiserror::Error;

/// Failures of the terminal host. The window-management core itself never
/// fails; it clamps or ignores instead.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DesktopError>;
