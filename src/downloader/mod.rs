pub mod episode;
pub mod executor;
pub mod planer;
#[cfg(test)]
pub(crate) mod test_helpers;

use std::path::Path;

use tracing::{debug, error, info};

use crate::api::ApiClient;
use crate::config::DownloadOptions;
use crate::error::{EpisodeError, Result};

pub use episode::EpisodeDescriptor;
pub use executor::{DownloadReport, FetchOutcome, fetch};
pub use planer::{DownloadTask, Plan, Planer, playlist_id_from_url};

/// Downloads every episode of `playlist_id` into `<base_path>/<title slug>`.
pub async fn run(
    api: &ApiClient,
    playlist_id: u64,
    base_path: &Path,
    options: &DownloadOptions,
) -> Result<DownloadReport> {
    let plan = Planer::new(api.clone()).plan(playlist_id, base_path).await?;
    info!(
        "{} episode(s) of {} into {}",
        plan.tasks.len(),
        plan.title,
        plan.destination_dir.display()
    );
    executor::execute_plan(api.http(), plan, options).await
}

/// Entry point for a playlist page url such as
/// `https://animevost.org/tip/tv/2093-one-punch-man.html`.
pub async fn download(
    web_url: &str,
    base_path: &Path,
    options: &DownloadOptions,
) -> Result<DownloadReport> {
    let playlist_id = playlist_id_from_url(web_url)?;
    let api = ApiClient::new(reqwest::Client::new(), options.api_url.clone());

    let report = run(&api, playlist_id, base_path, options).await?;
    if report.is_success() {
        info!("{} episode(s) downloaded", report.completed.len());
    } else {
        let mut failed = Vec::with_capacity(report.failed.len());
        for err in &report.failed {
            let EpisodeError::ExhaustedCandidates { number, failures } = err;
            for attempt in failures.errors() {
                debug!("episode {}: {}", number, attempt);
            }
            failed.push(number.to_string());
        }
        error!(
            "{} of {} episode(s) failed: {}",
            failed.len(),
            report.total(),
            failed.join(", ")
        );
    }
    Ok(report)
}
