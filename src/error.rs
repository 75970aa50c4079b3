// src/error.rs
use sidenav_sidebar::SidebarError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from configuring and running the page post-processor.
#[derive(Error, Debug)]
pub enum SidenavError {
    #[error("Sidebar failed: {0}")]
    Sidebar(#[from] SidebarError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file '{path}' is invalid: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Pages '{first}' and '{second}' would both be written to '{output}'")]
    OutputCollision {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Plan serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SidenavError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SidenavError::Io {
            path: path.into(),
            source,
        }
    }
}
