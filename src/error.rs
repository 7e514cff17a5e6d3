//! Crate-level error type
//!
//! Every failure is returned to the caller as an [`Error`]; the CLI turns it
//! into a message and an exit code in one place.

use crate::connection::ConnectionError;
use crate::entity_loader::LoadError;
use crate::executor::ApplyError;
use std::path::PathBuf;

/// Exit code for invalid arguments or configuration
pub const EXIT_USAGE: i32 = 2;
/// Exit code for load, connection and execution failures
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The connection string is required.")]
    MissingConnection,
    #[error("The XML file path is required.")]
    MissingXmlPath,
    #[error("The file '{}' does not exist.", .0.display())]
    XmlNotFound(PathBuf),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Apply(#[from] ApplyError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Argument and configuration problems, reported without a failure trace
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::MissingConnection
                | Error::MissingXmlPath
                | Error::XmlNotFound(_)
                | Error::Config(_)
        )
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            EXIT_USAGE
        } else {
            EXIT_FAILURE
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
