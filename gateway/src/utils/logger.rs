use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::utils;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Per-target log levels, e.g. `{ "fleet_gateway": "debug", "hyper": "warn" }`.
pub struct LoggerTargets {
    directives: Vec<Directive>,
}

impl LoggerTargets {
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let targets: BTreeMap<String, String> = utils::serde::load_json_from_file(path)?;
        Self::from_map(targets)
    }

    fn from_map(targets: BTreeMap<String, String>) -> Result<Self> {
        let directives = targets
            .into_iter()
            .map(|(target, level)| {
                format!("{target}={level}")
                    .parse::<Directive>()
                    .with_context(|| format!("invalid log level for {target}: {level}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { directives })
    }

    pub fn build_filter(&self) -> EnvFilter {
        self.directives
            .iter()
            .cloned()
            .fold(EnvFilter::default(), EnvFilter::add_directive)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub outputs: Vec<LoggerOutput>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            outputs: vec![LoggerOutput::Stderr(LoggerStderrOutput::default())],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoggerOutput {
    Stderr(LoggerStderrOutput),
    File(LoggerFileOutput),
}

impl LoggerOutput {
    fn as_layer<S>(&self) -> Result<BoxedLayer<S>>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        match self {
            Self::Stderr(stderr) => Ok(stderr.as_layer()),
            Self::File(file) => file.as_layer(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct LoggerStderrOutput {
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggerStderrOutput {
    fn as_layer<S>(&self) -> BoxedLayer<S>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        match self.format {
            LogFormat::Human => fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .boxed(),
            LogFormat::Json => tracing_stackdriver::layer()
                .with_writer(std::io::stderr)
                .boxed(),
        }
    }
}

/// Hourly rotated log files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerFileOutput {
    pub dir: PathBuf,
    #[serde(default = "json_format")]
    pub format: LogFormat,
    #[serde(default = "log_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "max_log_files")]
    pub max_files: NonZeroUsize,
}

impl LoggerFileOutput {
    fn as_layer<S>(&self) -> Result<BoxedLayer<S>>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let writer = tracing_appender::rolling::Builder::new()
            .rotation(Rotation::HOURLY)
            .filename_prefix(&self.file_prefix)
            .max_log_files(self.max_files.get())
            .build(&self.dir)
            .with_context(|| format!("failed to open log dir {}", self.dir.display()))?;

        Ok(match self.format {
            LogFormat::Human => fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
            LogFormat::Json => tracing_stackdriver::layer().with_writer(writer).boxed(),
        })
    }
}

fn json_format() -> LogFormat {
    LogFormat::Json
}

fn log_file_prefix() -> String {
    "fleet-gateway.log".to_owned()
}

fn max_log_files() -> NonZeroUsize {
    NonZeroUsize::new(25).expect("shouldn't happen")
}

/// Initializes logger once.
///
/// Levels come from `logger_targets` when given, otherwise from `RUST_LOG`
/// with `info` as the default. All invocations after the first one fail.
pub fn init_logger(config: &LoggerConfig, logger_targets: Option<PathBuf>) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;

    let filter = match &logger_targets {
        None => EnvFilter::builder()
            .with_default_directive(tracing::Level::INFO.into())
            .from_env_lossy(),
        Some(path) => LoggerTargets::load_from(path)
            .context("failed to load logger config")?
            .build_filter(),
    };

    static ONCE: Once = Once::new();

    let mut result = None;
    ONCE.call_once(|| {
        result = Some((|| {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                config
                    .outputs
                    .iter()
                    .map(|o| o.as_layer())
                    .collect::<Result<Vec<_>>>()?,
            );
            tracing::subscriber::set_global_default(subscriber)?;
            Ok::<_, anyhow::Error>(())
        })());
    });

    match result {
        Some(res) => res,
        None => anyhow::bail!("logger was already initialized"),
    }
}

pub fn set_abort_with_tracing() {
    std::panic::set_hook(Box::new(|info| {
        use std::io::Write;

        let backtrace = std::backtrace::Backtrace::force_capture();
        tracing::error!("panic: {info}\n{backtrace}");

        std::io::stderr().flush().ok();
        std::io::stdout().flush().ok();

        #[allow(clippy::exit)]
        std::process::exit(1);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_logger_outputs() {
        let config: LoggerConfig = serde_json::from_str(
            r#"{
                "outputs": [
                    { "type": "stderr" },
                    { "type": "file", "dir": "/var/log/fleet-gateway", "max_files": 3 }
                ]
            }"#,
        )
        .unwrap();

        assert!(matches!(
            config.outputs[0],
            LoggerOutput::Stderr(LoggerStderrOutput {
                format: LogFormat::Human
            })
        ));
        let LoggerOutput::File(file) = &config.outputs[1] else {
            panic!("expected file output");
        };
        assert_eq!(file.format, LogFormat::Json);
        assert_eq!(file.file_prefix, "fleet-gateway.log");
        assert_eq!(file.max_files.get(), 3);
    }

    #[test]
    fn builds_directives_from_targets() {
        let targets = BTreeMap::from([
            ("fleet_gateway".to_owned(), "debug".to_owned()),
            ("hyper".to_owned(), "warn".to_owned()),
        ]);

        let targets = LoggerTargets::from_map(targets).unwrap();
        assert_eq!(targets.directives.len(), 2);
    }

    #[test]
    fn rejects_unknown_level() {
        let targets = BTreeMap::from([("fleet_gateway".to_owned(), "loud".to_owned())]);
        assert!(LoggerTargets::from_map(targets).is_err());
    }
}
