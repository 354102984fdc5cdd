use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

const DEFAULT_LOG_FILE: &str = "remote_expander.log";

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LoggerSettings {
    pub level: LevelFilter,
    /// Directory for the log file. Console only when `None`.
    pub log_dir: Option<PathBuf>,
}

impl LoggerSettings {
    /// Level from `RUST_LOG` (default `info`), log directory from
    /// `EXPANDER_LOG_DIR` (default: no log file).
    pub fn from_env() -> Self {
        let level = std::env::var("RUST_LOG").ok().and_then(|level| level.parse::<LevelFilter>().ok()).unwrap_or(LevelFilter::Info);
        let log_dir = std::env::var_os("EXPANDER_LOG_DIR").map(PathBuf::from);
        Self { level, log_dir }
    }
}

/// Initializes the global logger from the environment.
///
/// Call once at the start of `main`. Library code only uses the `log` macros
/// and leaves the choice of logger to the host.
pub fn init() {
    init_with(LoggerSettings::from_env());
}

pub fn init_with(settings: LoggerSettings) {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let console_config = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = Dispatch::new()
        .level(settings.level)
        .level_for("rustls", LevelFilter::Warn)
        .level_for("tokio_util", LevelFilter::Warn)
        .chain(console_config);

    let mut log_file_path = None;
    if let Some(log_dir) = &settings.log_dir {
        let path = log_dir.join(DEFAULT_LOG_FILE);
        let file = fs::create_dir_all(log_dir).and_then(|_| fern::log_file(&path));
        match file {
            Ok(file) => {
                let file_config = Dispatch::new()
                    .format(|out, message, record| {
                        out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.target(), message))
                    })
                    .chain(file);
                dispatch = dispatch.chain(file_config);
                log_file_path = Some(path);
            }
            Err(e) => eprintln!("Failed to open log file '{}': {}", path.display(), e),
        }
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
        return;
    }

    match log_file_path {
        Some(path) => log::info!("Logger initialized. Logging to console and '{}'.", path.display()),
        None => log::info!("Logger initialized. Logging to console."),
    }
}
