use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use playlist_lookup::SourceKind;
use playlist_lookup::api;
use playlist_lookup::core::config::{self, CliOverrides, LookupConfig, ResolvedConfig};
use playlist_lookup::headless::print_once;
use playlist_lookup::tui;
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "playlist-lookup", about = "Look up a user's playlists by user id")]
struct Args {
    /// Where lookups go (overrides config file and PLAYLIST_SOURCE)
    #[arg(short, long, value_enum)]
    source: Option<SourceKind>,

    /// Endpoint to query (overrides config file and PLAYLIST_API_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// User id to prefill and look up on startup
    #[arg(short, long)]
    user_id: Option<String>,

    /// Fetch once, print the JSON to stdout and exit (no terminal UI)
    #[arg(short, long, requires = "user_id")]
    print: bool,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(config: &ResolvedConfig) {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Config errors are reported once logging is up; defaults are used meanwhile.
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (LookupConfig::default(), Some(e)),
    };
    let cli = CliOverrides {
        source: args.source,
        endpoint: args.endpoint,
        log_file: args.log_file,
        user_id: args.user_id,
    };
    let resolved = config::resolve(&file_config, &cli);

    init_logging(&resolved);
    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!(
        "playlist-lookup starting up with source {:?}: {}",
        resolved.source,
        resolved.target()
    );

    let source = match api::build_source(&resolved) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Cannot build playlist source: {}", e);
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.print {
        let user_id = resolved.user_id.clone().unwrap_or_default();
        let (mut out, mut err) = (io::stdout(), io::stderr());
        return match print_once(source.as_ref(), &user_id, &mut out, &mut err).await {
            Ok(()) => Ok(ExitCode::SUCCESS),
            // The generic message is already on stderr
            Err(_) => Ok(ExitCode::FAILURE),
        };
    }

    tui::run(resolved, source)?;
    Ok(ExitCode::SUCCESS)
}
