use std::io;
use std::path::Path;

use futures::StreamExt;
use reqwest::{Client, Response, StatusCode, header::RANGE};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, warn};

use crate::config::{DownloadOptions, ExecutionMode};
use crate::downloader::planer::{DownloadTask, Plan};
use crate::error::{CandidateError, CandidateFailure, EpisodeError, Result};
use crate::utils::{limited_spawner::LimitedSpawner, multierr::MultiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { bytes: u64 },
    Resumed { offset: u64, bytes: u64 },
    /// The server had nothing past the bytes already on disk.
    AlreadyComplete { size: u64 },
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub completed: Vec<u32>,
    pub failed: Vec<EpisodeError>,
}

impl DownloadReport {
    fn record(&mut self, number: u32, result: std::result::Result<FetchOutcome, EpisodeError>) {
        match result {
            Ok(_) => self.completed.push(number),
            Err(err) => self.failed.push(err),
        }
    }

    fn finish(mut self) -> Self {
        self.completed.sort_unstable();
        self.failed.sort_by_key(EpisodeError::number);
        self
    }

    pub fn total(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Length of a non-empty file already at `path`. Missing and empty files
/// are both downloaded from the start.
async fn resume_offset(path: &Path) -> io::Result<Option<u64>> {
    match fs::metadata(path).await {
        Ok(meta) if meta.len() > 0 => Ok(Some(meta.len())),
        Ok(_) => Ok(None),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

async fn write_body(
    response: Response,
    file: File,
    chunk_size: usize,
) -> std::result::Result<u64, CandidateFailure> {
    let mut body = response.bytes_stream();
    let mut writer = BufWriter::with_capacity(chunk_size, file);
    let mut written = 0u64;

    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => {
                writer.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            Err(err) => {
                // keep what arrived so the next candidate can resume from it
                writer.flush().await?;
                return Err(err.into());
            }
        }
    }
    writer.flush().await?;

    Ok(written)
}

/// One attempt against one candidate url. The file and the connection are
/// dropped before returning.
async fn fetch_candidate(
    client: &Client,
    url: &str,
    path: &Path,
    chunk_size: usize,
) -> std::result::Result<FetchOutcome, CandidateFailure> {
    let offset = resume_offset(path).await?;

    let mut request = client.get(url);
    if let Some(offset) = offset {
        request = request.header(RANGE, format!("bytes={}-", offset));
    }
    let response = request.send().await?;
    let status = response.status();
    debug!("GET {} ({:?}) -> {}", url, offset, status);

    if let Some(size) = offset {
        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(FetchOutcome::AlreadyComplete { size });
        }
    }
    if !status.is_success() {
        return Err(CandidateFailure::Status(status));
    }

    match offset {
        Some(offset) if status == StatusCode::PARTIAL_CONTENT => {
            let file = OpenOptions::new().append(true).open(path).await?;
            let bytes = write_body(response, file, chunk_size).await?;
            Ok(FetchOutcome::Resumed { offset, bytes })
        }
        _ => {
            if offset.is_some() {
                warn!("{} ignored the range request, restarting {}", url, path.display());
            }
            let file = File::create(path).await?;
            let bytes = write_body(response, file, chunk_size).await?;
            Ok(FetchOutcome::Downloaded { bytes })
        }
    }
}

/// Downloads one episode, trying its candidates in order of preference and
/// resuming from whatever is already on disk.
pub async fn fetch(
    client: &Client,
    task: DownloadTask,
    chunk_size: usize,
) -> std::result::Result<FetchOutcome, EpisodeError> {
    let number = task.descriptor.number();
    let name = task.file_name();
    let path = task.destination_path();

    let mut failures = MultiError::new();
    for url in task.descriptor.candidate_urls() {
        match resume_offset(&path).await {
            Ok(Some(offset)) => info!("resuming {} from byte {}", name, offset),
            _ => info!("downloading {}", name),
        }

        match fetch_candidate(client, url, &path, chunk_size).await {
            Ok(outcome) => {
                debug!("episode {} finished: {:?}", name, outcome);
                return Ok(outcome);
            }
            Err(failure) => {
                warn!("failed loading {}: {}, retrying with lower quality", url, failure);
                failures.push(CandidateError {
                    url: url.clone(),
                    failure,
                });
            }
        }
    }

    let err = EpisodeError::ExhaustedCandidates { number, failures };
    error!("{}", err);
    Err(err)
}

async fn execute_parallel(
    client: &Client,
    tasks: Vec<DownloadTask>,
    workers: usize,
    chunk_size: usize,
) -> Result<DownloadReport> {
    let spawner = LimitedSpawner::new(workers);
    let mut handles = Vec::with_capacity(tasks.len());
    for task in tasks {
        let client = client.clone();
        let number = task.descriptor.number();
        let handle = spawner
            .spawn(async move { (number, fetch(&client, task, chunk_size).await) })
            .await?;
        handles.push(handle);
    }

    let mut report = DownloadReport::default();
    for handle in handles {
        let (number, result) = handle.await?;
        report.record(number, result);
    }
    Ok(report.finish())
}

async fn execute_sequential(
    client: &Client,
    title: &str,
    tasks: Vec<DownloadTask>,
    chunk_size: usize,
) -> DownloadReport {
    info!("Playlist name: {}", title);
    let total = tasks.len();
    let mut report = DownloadReport::default();
    for task in tasks {
        let number = task.descriptor.number();
        info!("Downloading video {} of {}", number, total);
        report.record(number, fetch(client, task, chunk_size).await);
    }
    report.finish()
}

/// Runs every task of `plan`. Episode failures end up in the report; only
/// a broken worker pool aborts.
pub async fn execute_plan(
    client: &Client,
    plan: Plan,
    options: &DownloadOptions,
) -> Result<DownloadReport> {
    match options.mode {
        ExecutionMode::Parallel { workers } => {
            debug!("downloading {} episode(s) with {} workers", plan.tasks.len(), workers);
            execute_parallel(client, plan.tasks, workers, options.chunk_size).await
        }
        ExecutionMode::Sequential => {
            Ok(execute_sequential(client, &plan.title, plan.tasks, options.chunk_size).await)
        }
    }
}
