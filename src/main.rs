use std::{
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use objectkeys::{adapters, config, PageFetcher};
use tracing::{error, info, span, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let span = span!(Level::INFO, "main", context = "main");
    let _e = span.enter();
    info!("called");

    let matches = config::command().get_matches();
    let config = match config::Config::from_matches(&matches) {
        Err(err) => {
            error!(error_message=%err, error_group=err.group());
            return ExitCode::FAILURE;
        }
        Ok(config) => config,
    };
    info!(
        bucket = %config.bucket,
        prefix = ?config.prefix,
        start_after = ?config.start_after,
        template = %config.template,
        "args"
    );

    let fetcher: Arc<dyn PageFetcher> = Arc::new(adapters::s3::build_client(&config));
    let mut keys = match config.enumerator(fetcher) {
        Err(err) => {
            error!(error_message=%err, error_group=err.group());
            return ExitCode::FAILURE;
        }
        Ok(keys) => keys,
    };

    let mut out = io::stdout().lock();
    let mut yielded: u64 = 0;
    loop {
        match keys.next_key() {
            Ok(Some(key)) => {
                if writeln!(out, "{}", key).is_err() {
                    break;
                }
                yielded += 1;
            }
            Ok(None) => break,
            Err(err) => {
                error!(
                    error_message=%err,
                    error_group=err.group(),
                    retryable=err.is_retryable(),
                    last_key=?keys.last_key()
                );
                return ExitCode::FAILURE;
            }
        }
    }

    let _ = out.flush();
    info!(
        keys = yielded,
        fetches = keys.fetch_count(),
        last_key = ?keys.last_key(),
        "done"
    );

    ExitCode::SUCCESS
}
