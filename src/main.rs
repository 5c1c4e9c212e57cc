// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use transcript_digest::app_config::{self, Config, ProcessingMode, ProviderKind};
use transcript_digest::formats::FormatRegistry;
use transcript_digest::{CancellationFlag, Controller};

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Gemini,
    Ollama,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Gemini => ProviderKind::Gemini,
            CliProvider::Ollama => ProviderKind::Ollama,
        }
    }
}

/// CLI Wrapper for ProcessingMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliMode {
    Correct,
    Summarize,
}

impl From<CliMode> for ProcessingMode {
    fn from(cli_mode: CliMode) -> Self {
        match cli_mode {
            CliMode::Correct => ProcessingMode::Correct,
            CliMode::Summarize => ProcessingMode::Summarize,
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
    /// Correct and summarize a transcript file (default command)
    Process(ProcessArgs),

    /// List the available summary formats
    Formats,

    /// Generate shell completions for transcript-digest
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Transcript text file to process
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    options: ProcessOptions,
}

#[derive(Args, Debug, Clone)]
struct ProcessOptions {
    /// Write the JSON result here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Processing mode
    #[arg(short, long, value_enum)]
    mode: Option<CliMode>,

    /// Summary format key (see `formats`)
    #[arg(short, long)]
    format: Option<String>,

    /// Transcript language code (e.g., 'en', 'ja')
    #[arg(short, long)]
    language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Model name to use
    #[arg(long)]
    model: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Seed for the paragraph sampler used on oversized inputs
    #[arg(long)]
    seed: Option<u64>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// transcript-digest - transcript correction and summarization with AI
///
/// Splits long speech-recognition transcripts into chunks, corrects and
/// summarizes each chunk with an LLM provider, and merges the results.
#[derive(Parser, Debug)]
#[command(name = "transcript-digest")]
#[command(version)]
#[command(about = "AI-powered transcript correction and summarization")]
#[command(long_about = "transcript-digest corrects speech-recognition transcripts and summarizes them using AI providers.

EXAMPLES:
    transcript-digest talk.txt                        # Correct and summarize, print JSON
    transcript-digest talk.txt -o talk.json           # Write the result to a file
    transcript-digest -m summarize -f bullet talk.txt # Bullet-point summary only
    transcript-digest -l ja meeting.txt               # Japanese transcript
    transcript-digest -p ollama --model llama3 a.txt  # Use a local Ollama model
    transcript-digest formats                         # List summary formats
    transcript-digest completions bash > td.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The Gemini API key can also be given through
    the GEMINI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transcript text file to process
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    #[command(flatten)]
    options: ProcessOptions,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger);
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The max level is updated after config load
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    let ok = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "transcript-digest", &mut std::io::stdout());
            true
        }
        Some(Commands::Formats) => {
            list_formats();
            true
        }
        Some(Commands::Process(args)) => run_process(args).await?,
        None => {
            // Default behavior - top-level args mean `process`
            let input = cli.input.ok_or_else(|| {
                anyhow!("INPUT is required when no subcommand is specified")
            })?;
            run_process(ProcessArgs { input, options: cli.options }).await?
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn list_formats() {
    for format in FormatRegistry::all() {
        println!("{:<12} {} - {}", format.key, format.name, format.description);
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &ProcessOptions) {
    if let Some(provider) = &options.provider {
        config.provider.active = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.provider.active_provider_config_mut().model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        if config.provider.active == ProviderKind::Gemini {
            config.provider.active_provider_config_mut().api_key = api_key.clone();
        }
    }
    if let Some(mode) = &options.mode {
        config.mode = mode.clone().into();
    }
    if let Some(format) = &options.format {
        config.format = format.clone();
    }
    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(seed) = options.seed {
        config.processing.sample_seed = Some(seed);
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

/// Run one job; returns whether the job succeeded
async fn run_process(args: ProcessArgs) -> Result<bool> {
    let options = args.options;

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let mut config = Config::load_or_create(std::path::Path::new(&options.config_path))?;
    apply_overrides(&mut config, &options);

    config.validate()
        .context("Configuration validation failed")?;

    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    let cancel = CancellationFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping before the next chunk");
            signal_flag.cancel();
        }
    });

    let result = controller.run(&args.input, options.output.as_deref(), &cancel).await?;
    info!("Job finished with status {:?}", result.status);

    Ok(result.ok)
}
