use shared::config::{ClientConfig, LogFormat};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Filter for the configured level; `RUST_LOG` wins when set.
pub fn env_filter(config: &ClientConfig) -> EnvFilter {
    let default_level = config
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    })
}

/// Installs the global subscriber. Log lines go to stderr so command output
/// on stdout stays scriptable.
pub fn init(config: &ClientConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be installed, e.g. when commands run in tests.
    let _ = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = ClientConfig {
            log_level: "debug".to_string(),
            ..ClientConfig::with_defaults()
        };
        assert_eq!(env_filter(&config).to_string(), "debug");
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = ClientConfig {
            log_level: "chatty".to_string(),
            ..ClientConfig::with_defaults()
        };
        assert_eq!(env_filter(&config).to_string(), "info");
    }

    #[test]
    fn init_twice_does_not_panic() {
        let config = ClientConfig::with_defaults();
        init(&config);
        init(&ClientConfig {
            log_format: LogFormat::Json,
            ..config
        });
    }
}
