//! Content error taxonomy
//!
//! Per-item problems (missing fields, unpublished status, bad front matter)
//! are contained at the item level: listings skip them, lookups surface
//! `ParseFault` or an absent result. Only `StorageFault` aborts an operation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the content repository
#[derive(Error, Debug)]
pub enum ContentError {
    /// Front matter is present but is not valid YAML
    #[error("invalid front matter in {path}: {source}")]
    ParseFault {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Any file-system error other than "entry does not exist"
    #[error("storage error at {path}: {source}")]
    StorageFault {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
