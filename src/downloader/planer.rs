use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::ApiClient;
use crate::downloader::episode::EpisodeDescriptor;
use crate::error::{Error, Result};
use crate::utils::slug::title_slug;

/// One episode bound to the file it is saved in.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub descriptor: EpisodeDescriptor,
    pub destination_dir: PathBuf,
    file_name: String,
}

impl DownloadTask {
    /// Saves to `<dir>/0007.<ext>`, the extension coming from the preferred
    /// stream whichever candidate ends up being downloaded.
    pub fn new(descriptor: EpisodeDescriptor, destination_dir: PathBuf) -> Self {
        let file_name = file_name(&descriptor, None);
        DownloadTask {
            descriptor,
            destination_dir,
            file_name,
        }
    }

    /// One task per descriptor, each with its own file. Episodes sharing a
    /// number get `0001-2.<ext>`, `0001-3.<ext>`... in the order given.
    pub fn for_episodes(descriptors: Vec<EpisodeDescriptor>, destination_dir: &Path) -> Vec<Self> {
        let mut taken = HashSet::new();
        descriptors
            .into_iter()
            .map(|descriptor| {
                let mut name = file_name(&descriptor, None);
                let mut copy = 1;
                while !taken.insert(name.clone()) {
                    copy += 1;
                    name = file_name(&descriptor, Some(copy));
                }
                if copy > 1 {
                    warn!(
                        "episode {} is listed more than once, saving as {}",
                        descriptor.number(),
                        name
                    );
                }
                DownloadTask {
                    descriptor,
                    destination_dir: destination_dir.to_path_buf(),
                    file_name: name,
                }
            })
            .collect()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn destination_path(&self) -> PathBuf {
        self.destination_dir.join(&self.file_name)
    }
}

fn file_name(descriptor: &EpisodeDescriptor, copy: Option<usize>) -> String {
    let mut name = format!("{:04}", descriptor.number());
    if let Some(copy) = copy {
        name.push_str(&format!("-{}", copy));
    }
    if let Some(ext) = descriptor
        .candidate_urls()
        .first()
        .and_then(|url| stream_extension(url))
    {
        name.push('.');
        name.push_str(&ext);
    }
    name
}

fn stream_extension(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_string)
}

#[derive(Debug)]
pub struct Plan {
    pub title: String,
    pub destination_dir: PathBuf,
    /// Ascending by episode number.
    pub tasks: Vec<DownloadTask>,
}

/// Extracts `2093` from `https://animevost.org/tip/tv/2093-one-punch-man.html`.
pub fn playlist_id_from_url(web_url: &str) -> Result<u64> {
    let last_segment = match Url::parse(web_url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        Err(_) => web_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.split('/').filter(|s| !s.is_empty()).last())
            .map(str::to_string),
    };

    last_segment
        .as_deref()
        .and_then(|segment| segment.split('-').next())
        .and_then(|id| id.parse::<u64>().ok())
        .ok_or_else(|| Error::InvalidUrl(web_url.to_string()))
}

pub struct Planer {
    api: ApiClient,
}

impl Planer {
    pub fn new(api: ApiClient) -> Self {
        Planer { api }
    }

    /// Directory-safe title of the playlist.
    pub async fn resolve_title(&self, playlist_id: u64) -> Result<String> {
        let info = self.api.info(playlist_id).await?;
        if !info.is_ok() {
            return Err(Error::NotFound(playlist_id));
        }

        let slug = info
            .data
            .first()
            .and_then(|entry| entry.title.as_deref())
            .map(title_slug)
            .filter(|slug| !slug.is_empty())
            .ok_or(Error::NotFound(playlist_id))?;

        debug!("playlist {} resolved to {:?}", playlist_id, slug);
        Ok(slug)
    }

    /// Episodes in ascending order. Equal numbers keep the order the API
    /// listed them in.
    pub async fn resolve_episodes(&self, playlist_id: u64) -> Result<Vec<EpisodeDescriptor>> {
        let raw = self.api.playlist(playlist_id).await?;
        let total = raw.len();

        let mut episodes = raw
            .iter()
            .filter_map(EpisodeDescriptor::from_raw)
            .collect::<Vec<_>>();
        episodes.sort_by_key(|episode| episode.number());

        if episodes.len() < total {
            info!(
                "skipped {} episode(s) without a name or stream",
                total - episodes.len()
            );
        }
        Ok(episodes)
    }

    /// Resolves the playlist and prepares `<base_path>/<slug>`. Nothing is
    /// created on disk when the title cannot be resolved.
    pub async fn plan(&self, playlist_id: u64, base_path: &Path) -> Result<Plan> {
        let title = self.resolve_title(playlist_id).await?;

        let destination_dir = base_path.join(&title);
        fs::create_dir_all(&destination_dir).await?;

        let episodes = self.resolve_episodes(playlist_id).await?;
        let tasks = DownloadTask::for_episodes(episodes, &destination_dir);

        Ok(Plan {
            title,
            destination_dir,
            tasks,
        })
    }
}
