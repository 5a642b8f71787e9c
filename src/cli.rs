use clap::{Parser, Subcommand};
use mediagrab::platform::MediaFormat;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mediagrab")]
#[command(about = "Social media downloader service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Server(ServerArgs),
    /// Download one URL to a local file
    Fetch(FetchArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to (overrides `server.bind_addr`)
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Page URL on a supported platform
    pub url: String,

    /// Output format: mp4 or mp3
    #[arg(long, default_value = "mp4", value_parser = parse_format)]
    pub format: MediaFormat,

    /// Directory the file is written to
    #[arg(long, default_value = ".")]
    pub output: PathBuf,
}

fn parse_format(value: &str) -> Result<MediaFormat, String> {
    MediaFormat::parse(value).ok_or_else(|| format!("unknown format '{value}', expected mp4 or mp3"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["mediagrab", "fetch", "https://fb.watch/abc"]).unwrap();
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.format, MediaFormat::Video);
                assert_eq!(args.output, PathBuf::from("."));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_format_rejected() {
        assert!(
            Cli::try_parse_from(["mediagrab", "fetch", "https://fb.watch/abc", "--format", "avi"])
                .is_err()
        );
    }

    #[test]
    fn test_server_address_optional() {
        let cli = Cli::try_parse_from(["mediagrab", "server"]).unwrap();
        assert!(matches!(cli.command, Commands::Server(ServerArgs { address: None })));
    }
}
