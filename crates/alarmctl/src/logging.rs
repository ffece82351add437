use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Crates whose diagnostics are raised to debug by `--verbose`.
const VERBOSE_TARGETS: &[&str] = &["alarmctl", "alarm_models"];

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Default level of logs to emit. `RUST_LOG` directives take precedence.
    #[clap(long = "log.level", global = true, value_enum, env = "ALARMCTL_LOG_LEVEL")]
    pub level: Option<LogLevel>,

    /// Format of logs written to stderr.
    #[clap(long = "log.format", global = true, value_enum, default_value_t = LogFormat::Text)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Install the global tracing subscriber. Logs go to stderr so that stdout
/// carries only command output.
pub fn init_logging(args: &LogArgs, verbose: bool) -> anyhow::Result<()> {
    let default = args.level.map(LevelFilter::from).unwrap_or(LevelFilter::WARN);

    let mut env_filter = EnvFilter::builder()
        .with_default_directive(default.into()) // Otherwise it's ERROR.
        .from_env_lossy();

    if verbose {
        for target in VERBOSE_TARGETS {
            env_filter = env_filter.add_directive(format!("{target}=debug").parse()?);
        }
    }

    let builder = tracing_subscriber::fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match args.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}
