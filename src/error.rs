//! Contains the fatal `Error` type of the library.
//!
//! Grammar problems are never errors here: they are collected as
//! `Diagnostic`s and translation goes on. An `Error` means the input or
//! output could not be accessed at all and nothing was produced.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error is a failure that aborts a translation as a whole.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result is an alias for standard result with bound Error type.
pub type Result<T> = std::result::Result<T, Error>;
