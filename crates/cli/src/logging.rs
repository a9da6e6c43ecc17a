// Diagnostic logging to stderr.
//
// `LEADSYNC_LOG` takes a full `EnvFilter` directive string and wins over the
// `-v` count. Without it only the leadsync crates log, at a level picked by
// verbosity.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "LEADSYNC_LOG";

pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn filter_for(verbosity: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    let level = level_for(verbosity);
    EnvFilter::new(format!(
        "leadsync={level},leadsync_recon={level},leadsync_io={level}"
    ))
}

pub fn init(verbosity: u8) {
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

/// Send panic reports to the debug log instead of stderr, so a failed
/// comparison prints only its `error:` line.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::debug!(panic = %info, "caught panic");
    }));
}
