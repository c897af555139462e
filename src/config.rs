pub const API_URL: &str = "https://api.animevost.org/v1/";
pub const DEFAULT_WORKERS: usize = 4;
pub const CHUNK_SIZE: usize = 32 * 1024;

/// How the episodes of one playlist are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Up to `workers` episodes in flight, completing in any order.
    Parallel { workers: usize },
    /// One episode at a time in ascending order, with progress lines.
    Sequential,
}

impl ExecutionMode {
    /// Probes the host once. Hosts that cannot report their parallelism run
    /// sequentially.
    pub fn detect(workers: usize) -> Self {
        match std::thread::available_parallelism() {
            Ok(_) => Self::parallel(workers),
            Err(err) => {
                tracing::warn!("parallel downloads unavailable ({}), running sequentially", err);
                ExecutionMode::Sequential
            }
        }
    }

    /// A single worker is the sequential mode.
    pub fn parallel(workers: usize) -> Self {
        if workers <= 1 {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Parallel { workers }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Base of the remote API; method names are appended to it.
    pub api_url: String,
    pub mode: ExecutionMode,
    /// Write buffer size used while streaming a response body to disk.
    pub chunk_size: usize,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            api_url: API_URL.to_string(),
            mode: ExecutionMode::detect(DEFAULT_WORKERS),
            chunk_size: CHUNK_SIZE,
        }
    }
}
