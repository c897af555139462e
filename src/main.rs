use std::path::PathBuf;

use clap::Parser;

use animevost_dl::config::{API_URL, CHUNK_SIZE, DEFAULT_WORKERS};
use animevost_dl::{DownloadOptions, ExecutionMode, downloader, logging};

#[derive(Parser)]
#[command(name = "animevost-dl")]
#[command(about = "Download anime from animevost.org")]
#[command(version)]
struct Cli {
    #[arg(short, long, help = "url of an anime")]
    url: String,
    #[arg(short, long, help = "path where anime will be saved [default: current directory]")]
    path: Option<PathBuf>,
    #[arg(short, long, help = "episodes downloaded at once", default_value_t = DEFAULT_WORKERS)]
    workers: usize,
    #[arg(long, help = "download one episode at a time, in order")]
    sequential: bool,
    #[arg(long, help = "media api base url", default_value = API_URL)]
    api_url: String,
    #[arg(short, long, help = "debug output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let options = DownloadOptions {
        api_url: cli.api_url,
        mode: if cli.sequential {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::detect(cli.workers)
        },
        chunk_size: CHUNK_SIZE,
    };

    let report = downloader::download(&cli.url, &path, &options).await?;
    if !report.is_success() {
        return Err(format!("{} episode(s) failed", report.failed.len()).into());
    }

    Ok(())
}
