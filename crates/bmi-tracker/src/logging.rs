//! Diagnostic logging for the `bmi` binary.
//!
//! Results are printed to stdout; tracing events go to stderr so that
//! `bmi history --format json` and friends stay machine-readable at any
//! verbosity.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much of the crate's tracing output reaches stderr.
///
/// Chosen by the `-q` / `-v` flags; `RUST_LOG` overrides it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// `-q`: only failures such as an unreadable database.
    Quiet,
    /// No flag: rejected input and other warnings.
    #[default]
    Normal,
    /// `-v`: store opened, schema ready, record appended.
    Verbose,
    /// `-vv`: computed values and query sizes.
    Debug,
    /// `-vvv`: everything.
    Trace,
}

impl Verbosity {
    /// Most detailed level let through at this verbosity.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    ///
    /// Only this crate's events are enabled; `rusqlite` and other
    /// dependencies stay silent.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("{}={}", env!("CARGO_CRATE_NAME"), self.to_level_filter())
    }
}

/// Install the stderr subscriber for `verbosity`.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
///
/// # Examples
///
/// ```no_run
/// use bmi_tracker::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}
