// src/error.rs
use thiserror::Error;

/// Failure kinds surfaced by the pipeline.
///
/// `Parse` is fatal when the broken file is the trending store, and tolerated
/// per-file everywhere a batch walks historical snapshots.
#[derive(Debug, Error)]
pub enum Error {
    /// The portal answered, but with a failure status. Carries its `msg`.
    #[error("upstream API error: {0}")]
    Upstream(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        source: serde_json::Error,
    },

    #[error("{what}: {source}")]
    Io {
        what: String,
        source: std::io::Error,
    },
}

impl Error {
    pub fn parse(what: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Parse {
            what: what.into(),
            source,
        }
    }

    pub fn io(what: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            what: what.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
