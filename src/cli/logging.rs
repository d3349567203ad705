//! Log setup
//!
//! Lines look like `2024-10-26 10:00:00,123 [INFO] message` on the console
//! and, for scans, in `logs/scan_<timestamp>.log`.

use chrono::Local;
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::constants::time;
use crate::types::Result;

/// `timestamp [LEVEL] message`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} [{}] ",
            Local::now().format(time::LOG_LINE),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Path of a new scan log inside `logs_dir`
pub fn scan_log_path(logs_dir: &Path) -> PathBuf {
    let stamp = Local::now().format(time::FILE_STAMP);
    logs_dir.join(format!("scan_{}.log", stamp))
}

/// Install the global subscriber.
///
/// `default_level` applies when `RUST_LOG` is unset. With `log_file` set,
/// every event is also appended to that file without colors.
pub fn init(default_level: &str, log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LineFormat)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}
