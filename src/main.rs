mod cli;

use clap::Parser;
use cli::{Cli, Commands, FetchArgs};
use futures_util::StreamExt;
use mediagrab::api;
use mediagrab::config::Config;
use mediagrab::download::DownloadRequest;
use mediagrab::fetch::HttpClient;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Server(args) => {
            let address = args.address.unwrap_or(config.server.bind_addr);
            api::run(config, address).await?
        }
        Commands::Fetch(args) => fetch(config, args).await?,
    }

    Ok(())
}

/// Run one download and write the stream to `<output>/<suggested filename>`
async fn fetch(config: Config, args: FetchArgs) -> Result<(), AnyError> {
    let http = Arc::new(HttpClient::new(config.http.to_http_config())?);
    let downloader =
        mediagrab::download::Downloader::with_defaults(http, config.youtube_base_url()?);

    let payload = downloader
        .download(&DownloadRequest::new(args.url, args.format))
        .await?;

    let (filename, content_type, _, mut stream) = payload.into_parts();
    let path = args.output.join(&filename);
    let mut file = tokio::fs::File::create(&path).await?;

    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    info!(path = %path.display(), content_type, bytes = written, "Saved");
    Ok(())
}
