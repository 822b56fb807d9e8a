//! Tracing subscriber: console formatter, run log file, and initialisation.
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata};

use super::utils::{HEADER_TIMESTAMP, LINE_TIMESTAMP, log_file_path, strip_ansi, utc_now};

/// Target of stage headers emitted by [`Logger::stage`](super::Logger::stage).
pub(super) const STAGE_TARGET: &str = "provision::stage";

/// How an event is rendered, shared by the console and the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Stage,
    Error,
    Warn,
    Info,
    Debug,
}

impl LineKind {
    fn of(metadata: &Metadata<'_>) -> Self {
        match *metadata.level() {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO if metadata.target() == STAGE_TARGET => Self::Stage,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text prefix used in the run log.
    const fn file_prefix(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::Error => "    [error] ",
            Self::Warn => "    [warn] ",
            Self::Info => "    ",
            Self::Debug => "    [debug] ",
        }
    }
}

/// The `message` of an event plus any structured fields as `key=value`.
#[derive(Default)]
struct EventText {
    message: String,
    fields: String,
}

impl EventText {
    fn of(event: &Event<'_>) -> Self {
        let mut text = Self::default();
        event.record(&mut text);
        text
    }
}

impl Visit for EventText {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}

/// A [`tracing_subscriber::Layer`] that appends every event to the run log,
/// timestamped and without ANSI codes.
///
/// Receives `DEBUG` and above whatever the console verbosity.  Structured
/// fields, which the console omits, are appended to the line.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the run log of `command`, write the run header, and open it
    /// for appending.
    ///
    /// Returns `None` if the log directory or file is unavailable.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("PROVISION_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\nprovision {command} ({version}) started {} UTC, pid {}\n{rule}\n",
            utc_now(HEADER_TIMESTAMP),
            std::process::id(),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let kind = LineKind::of(event.metadata());
        let text = EventText::of(event);
        let line = format!(
            "[{}] {}{}{}",
            utc_now(LINE_TIMESTAMP),
            kind.file_prefix(),
            strip_ansi(&text.message),
            text.fields
        );
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Console rendering: bold `==>` stages, coloured `ERROR`/`WARN`, dimmed
/// debug lines.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let msg = EventText::of(event).message;
        match LineKind::of(event.metadata()) {
            LineKind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            LineKind::Error => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            LineKind::Warn => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            LineKind::Info => writeln!(writer, "  {msg}"),
            LineKind::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global [`tracing`] subscriber for a `command` run.
///
/// Console: warnings and errors on stderr, the rest on stdout, at `INFO`
/// (`DEBUG` with `verbose`).  With `quiet` the console shows warnings and
/// errors only, leaving stdout to machine-readable output.  The run log
/// always receives `DEBUG` and above.
///
/// Call once, before anything is logged.
pub fn init_subscriber(verbose: bool, quiet: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = match (quiet, verbose) {
        (true, _) => LevelFilter::WARN,
        (false, true) => LevelFilter::DEBUG,
        (false, false) => LevelFilter::INFO,
    };

    let console = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .and(std::io::stdout.with_min_level(Level::INFO)),
        )
        .with_filter(console_level);

    let run_log = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console)
        .with(run_log)
        .init();
}
