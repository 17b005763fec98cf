//! Logger bootstrap for the binaries and tests.
//!
//! The library itself only talks to the `log` facade; picking a backend is
//! left to whoever owns `main`.

use once_cell::sync::OnceCell;

/// Logger configuration.
///
/// `filter` uses the `env_logger` syntax, e.g. `"info"` or
/// `"rastercam=debug"`. When `None`, `RUST_LOG` is consulted and the level
/// falls back to `info`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub is_test: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
            is_test: false,
        }
    }
}

static INIT: OnceCell<()> = OnceCell::new();

/// Install the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.get_or_init(|| {
        let mut builder = env_logger::Builder::new();

        match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }

        builder.write_style(config.write_style);
        builder.is_test(config.is_test);

        // another crate may have installed a logger already
        if builder.try_init().is_err() {
            return;
        }
        log::debug!("logging initialized");
    });
}
