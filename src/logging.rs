use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable consulted before the CLI flags.
pub const LOG_ENV: &str = "RSS_NOTES_LOG";

/// Initialize structured logging on stderr.
///
/// `RUST_LOG` or `RSS_NOTES_LOG` win over `--log-level`, which wins over
/// `--verbose`.
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV))
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

fn filter_directive(verbose: bool, log_level: Option<&str>) -> String {
    match (verbose, log_level) {
        (_, Some(level)) if level.contains('=') => level.to_string(),
        (_, Some(level)) => format!("rss_notes_lib={level},rss_notes={level}"),
        (true, None) => "rss_notes_lib=debug,rss_notes=debug".to_string(),
        (false, None) => "rss_notes_lib=warn,rss_notes=warn".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_beats_verbose_flag() {
        assert_eq!(
            filter_directive(true, Some("info")),
            "rss_notes_lib=info,rss_notes=info"
        );
        assert_eq!(filter_directive(false, Some("reqwest=trace")), "reqwest=trace");
        assert_eq!(
            filter_directive(true, None),
            "rss_notes_lib=debug,rss_notes=debug"
        );
        assert_eq!(
            filter_directive(false, None),
            "rss_notes_lib=warn,rss_notes=warn"
        );
    }
}
