// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use alertqa::app_config::{self, Config, TranslationProvider};
use alertqa::app_controller::{read_notice, Controller};
use alertqa::report::ReportFormat;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    OpenAI,
    Anthropic,
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a notice into each target language and score the results
    Assess(AssessArgs),

    /// List terminology and ambiguous-term warnings without translating
    Warnings {
        /// Notice text; read from standard input when omitted
        #[arg(value_name = "TEXT")]
        text: Option<String>,

        /// Read the notice from a file
        #[arg(long, value_name = "PATH", conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Validate a lexicon asset and print a summary
    Lexicon {
        /// Lexicon file; the built-in lexicon when omitted
        #[arg(long, value_name = "PATH")]
        lexicon: Option<PathBuf>,
    },

    /// Generate shell completions for alertqa
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AssessArgs {
    /// Notice text; read from standard input when omitted
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read the notice from a file
    #[arg(long, value_name = "PATH", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Target language codes, comma separated (e.g. 'en,zh,th')
    #[arg(short, long, value_delimiter = ',')]
    targets: Vec<String>,

    /// Print the results as JSON
    #[arg(long)]
    json: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for hosted providers
    #[arg(long, env = "ALERTQA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Source language code of the notice
    #[arg(short, long)]
    source_language: Option<String>,
}

/// alertqa - translation quality assessment for emergency notices
///
/// Translates an emergency notice into several languages, back-translates each
/// result and scores how well meaning, urgency and terminology survived.
#[derive(Parser, Debug)]
#[command(name = "alertqa")]
#[command(version)]
#[command(about = "Translation quality assessment for emergency notices")]
#[command(long_about = "alertqa translates an emergency notice into several languages, back-translates
each result and scores how well meaning, urgency and terminology survived.

EXAMPLES:
    alertqa assess \"태풍 경보, 즉시 대피하세요\"         # Assess in the configured languages
    alertqa assess -t en,th --json --file notice.txt  # Two languages, JSON output
    alertqa warnings \"전주에 호우 경보\"                 # Term warnings only
    alertqa lexicon --lexicon my_lexicon.json         # Validate a lexicon file
    alertqa completions bash > alertqa.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key, default)
    anthropic - Anthropic API (requires API key)
    ollama    - Local Ollama server
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Lexicon file used instead of the configured one
    #[arg(long, global = true)]
    lexicon_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker for log level
    fn marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "✖",
            Level::Warn => "⚠",
            Level::Info => "·",
            Level::Debug => "»",
            Level::Trace => "…",
        }
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                Self::marker_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Load the config file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(path) = &cli.lexicon_path {
        config.lexicon_path = Some(path.clone());
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if let Commands::Assess(args) = &cli.command {
        if let Some(provider) = &args.provider {
            config.translation.provider = provider.clone().into();
        }
        if let Some(model) = &args.model {
            config.translation.active_provider_config_mut().model = model.clone();
        }
        if let Some(api_key) = &args.api_key {
            config.translation.active_provider_config_mut().api_key = api_key.clone();
        }
        if let Some(source_language) = &args.source_language {
            config.source_language = source_language.clone();
        }
        if !args.targets.is_empty() {
            config.target_languages = args.targets.clone();
        }
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "alertqa", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    CustomLogger::init(config.log_level.to_level_filter())?;

    match cli.command {
        Commands::Assess(args) => {
            config.validate().context("Configuration validation failed")?;
            let text = read_notice(args.text, args.file.as_deref())?;
            let format = if args.json { ReportFormat::Json } else { ReportFormat::Text };

            let controller = Controller::with_config(config)?;
            let report = controller.assess(&text, &[], format).await?;
            print!("{}", report);
        }
        Commands::Warnings { text, file } => {
            let text = read_notice(text, file.as_deref())?;
            let controller = Controller::with_config(config)?;
            print!("{}", controller.warnings(&text)?);
        }
        Commands::Lexicon { lexicon } => {
            let controller = Controller::with_config(config)?;
            print!("{}", controller.lexicon_summary(lexicon)?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
