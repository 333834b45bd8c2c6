//! Stderr logging for the sizing crates and the `sizefit` binary.
//!
//! Library code only emits through the `log` facade. A binary picks one sink
//! at startup: [`init_with_level`] for plain `[elapsed LEVEL crate] message`
//! lines, or `init_tracing` (feature `tracing`) for span-aware output.
//!
//! Records whose target is outside the workspace are capped at `Warn`, so a
//! `debug` run only shows sizing internals.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Target prefix shared by every workspace crate (`sizefit`, `sizefit_core`, ...).
const WORKSPACE_TARGET: &str = "sizefit";

struct SizingLogger {
    started: Instant,
    workspace: LevelFilter,
    dependencies: LevelFilter,
}

impl SizingLogger {
    fn new(level: LevelFilter) -> Self {
        Self {
            started: Instant::now(),
            workspace: level,
            dependencies: level.min(LevelFilter::Warn),
        }
    }

    fn filter_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(WORKSPACE_TARGET) {
            self.workspace
        } else {
            self.dependencies
        }
    }
}

impl Log for SizingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let secs = self.started.elapsed().as_secs_f64();
        let krate = record.target().split("::").next().unwrap_or_default();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{secs:7.3}s {:>5} {krate}] {}",
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<SizingLogger> = OnceLock::new();

/// Install the stderr logger; workspace records pass at `level`.
///
/// Only the first call installs anything; later calls return `Ok(())` and
/// keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| SizingLogger::new(level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Parse a level name such as `"debug"` or `"off"`, falling back to `Info`.
pub fn level_from_str(name: &str) -> LevelFilter {
    LevelFilter::from_str(name.trim()).unwrap_or(LevelFilter::Info)
}

/// Install a `tracing` subscriber. `RUST_LOG` wins; otherwise workspace
/// targets log at `info` and everything else at `warn`.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{WORKSPACE_TARGET}=info")));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels_and_falls_back_to_info() {
        assert_eq!(level_from_str("debug"), LevelFilter::Debug);
        assert_eq!(level_from_str(" WARN "), LevelFilter::Warn);
        assert_eq!(level_from_str("off"), LevelFilter::Off);
        assert_eq!(level_from_str("chatty"), LevelFilter::Info);
    }

    #[test]
    fn dependencies_are_capped_at_warn() {
        let logger = SizingLogger::new(LevelFilter::Debug);
        assert_eq!(
            logger.filter_for("sizefit_fusion::engine"),
            LevelFilter::Debug
        );
        assert_eq!(logger.filter_for("sizefit"), LevelFilter::Debug);
        assert_eq!(logger.filter_for("serde_json::de"), LevelFilter::Warn);

        let quiet = SizingLogger::new(LevelFilter::Error);
        assert_eq!(quiet.filter_for("clap_builder"), LevelFilter::Error);
    }

    #[test]
    fn repeated_init_is_a_no_op() {
        assert!(init_with_level(LevelFilter::Warn).is_ok());
        assert!(init_with_level(LevelFilter::Trace).is_ok());
    }
}
