use std::io;

use reqwest::StatusCode;
use thiserror::Error;

use crate::utils::multierr::MultiError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole playlist run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("playlist {0} not found")]
    NotFound(u64),

    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("no playlist id in url: {0}")]
    InvalidUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("worker pool closed: {0}")]
    Pool(#[from] tokio::sync::AcquireError),

    #[error("download worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Why a single candidate URL could not be downloaded.
#[derive(Debug, Error)]
pub enum CandidateFailure {
    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("write error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
#[error("{url}: {failure}")]
pub struct CandidateError {
    pub url: String,
    #[source]
    pub failure: CandidateFailure,
}

/// Per-episode error. Reported alongside the other episodes, never fatal.
#[derive(Debug, Error)]
pub enum EpisodeError {
    #[error("episode {number}: every candidate failed: {failures}")]
    ExhaustedCandidates {
        number: u32,
        failures: MultiError<CandidateError>,
    },
}

impl EpisodeError {
    pub fn number(&self) -> u32 {
        match self {
            EpisodeError::ExhaustedCandidates { number, .. } => *number,
        }
    }
}
