use log::LevelFilter;
use log4rs::Handle;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use parking_lot::Mutex;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Target that audited writes are logged under.
pub const AUDIT_TARGET: &str = "docguard::audit";

const ENCODER_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

static HANDLE: Mutex<Option<Handle>> = Mutex::new(None);

/// Initializes the logging system from a log4rs YAML file.
///
/// # Errors
/// Returns an error if the file cannot be read or a logger is already installed.
pub fn init_path(path: &Path) -> Result<(), Box<dyn Error>> {
    log4rs::init_file(path, log4rs::config::Deserializers::default())?;
    Ok(())
}

/// Map a level name onto a filter; unknown names mean `info`.
#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(base: &Path, name: &str, keep: u32) -> Result<RollingFileAppender, Box<dyn Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{name}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    Ok(RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENCODER_PATTERN)))
        .build(base.join(format!("{name}.log")), Box::new(policy))?)
}

/// Configure logging for the process: rolling `app.log` and `audit.log` in `dir`.
///
/// - dir: base directory for logs; if None, current directory.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
///
/// Calling it again replaces the previous configuration.
///
/// # Errors
/// Returns an error if the log files cannot be created or another logger is installed.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let base = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&base)?;
    let keep = u32::try_from(retention.unwrap_or(7)).unwrap_or(u32::MAX);
    let lvl = parse_level(level.unwrap_or("info"));
    let config = Config::builder()
        .appender(Appender::builder().build("app", Box::new(rolling(&base, "app", keep)?)))
        .appender(Appender::builder().build("audit", Box::new(rolling(&base, "audit", keep)?)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, lvl))
        .build(Root::builder().appender("app").build(lvl))?;
    let mut handle = HANDLE.lock();
    if let Some(h) = handle.as_ref() {
        h.set_config(config);
        return Ok(());
    }
    *handle = Some(log4rs::init_config(config)?);
    Ok(())
}

/// Configure logging from environment variables if present:
/// - DOCGUARD_LOG_DIR
/// - DOCGUARD_LOG_LEVEL
/// - DOCGUARD_LOG_RETENTION
///
/// # Errors
/// As [`configure_logging`].
pub fn configure_from_env() -> Result<(), Box<dyn Error>> {
    let dir = std::env::var("DOCGUARD_LOG_DIR").ok().map(PathBuf::from);
    let level = std::env::var("DOCGUARD_LOG_LEVEL").ok();
    let retention =
        std::env::var("DOCGUARD_LOG_RETENTION").ok().and_then(|s| s.parse::<usize>().ok());
    configure_logging(dir.as_deref(), level.as_deref(), retention)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_level("bogus"), LevelFilter::Info);
    }
}
