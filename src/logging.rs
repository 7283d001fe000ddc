use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Mutex, Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_LOG_PATH: &str = "/tmp/vexconsole.log";
const LOG_FILTER_ENV: &str = "VEX_CONSOLE_LOG";
const LOG_PATH_ENV: &str = "VEX_CONSOLE_LOG_PATH";
const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Where log lines go. The TUI owns stderr's terminal, so an interactive run
/// always writes to a file.
fn resolve_log_path() -> Option<PathBuf> {
    crate::util::env_value(LOG_PATH_ENV)
        .map(PathBuf::from)
        .or_else(|| {
            if std::io::stderr().is_terminal() {
                Some(PathBuf::from(DEFAULT_LOG_PATH))
            } else {
                None
            }
        })
}

fn open_log_file(path: &PathBuf) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn env_filter() -> EnvFilter {
    let directives =
        crate::util::env_value(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init() {
    INIT.call_once(|| {
        let file = resolve_log_path().and_then(|path| match open_log_file(&path) {
            Ok(file) => Some(file),
            Err(err) => {
                eprintln!("vexconsole: cannot open log file {}: {err}", path.display());
                None
            }
        });

        let result = match file {
            Some(file) => Registry::default()
                .with(env_filter())
                .with(
                    fmt::Layer::new()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(Mutex::new(file)),
                )
                .try_init(),
            None => Registry::default()
                .with(env_filter())
                .with(fmt::Layer::new().with_writer(std::io::stderr))
                .try_init(),
        };

        if let Err(err) = result {
            eprintln!("vexconsole: logging already initialised: {err}");
        }
    });
}
