//! CLI entrypoint for chatstream
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow};
use chatstream_application::{
    CodeRenderer, ExportHistoryUseCase, LlmGateway, SubmitTurnUseCase,
};
use chatstream_domain::Model;
use chatstream_infrastructure::{
    AnthropicConfig, AnthropicGateway, ConfigLoader, FileConfig, FileTranscriptExporter,
    JsonlConversationLogger, PythonPlotExecutor,
    config::LEGACY_API_KEY_ENV,
};
use chatstream_presentation::{ChatRepl, Cli, ReplConfig};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Credentials may live in a .env next to the project
    let _ = dotenvy::dotenv();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).map_err(|e| anyhow!("{}", e))?
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    let _log_guard = init_logging(cli.verbosity(), config.output.log_dir.as_deref());
    if !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting chatstream");

    // === Dependency Injection ===
    let api_key = config.api.resolve_api_key().ok_or_else(|| {
        anyhow!(
            "No API key found. Set {} (or {}) in the environment or a .env file.",
            config.api.api_key_env,
            LEGACY_API_KEY_ENV
        )
    })?;
    let gateway: Arc<dyn LlmGateway> = Arc::new(AnthropicGateway::new(
        AnthropicConfig::new(api_key)
            .with_base_url(config.api.base_url.clone())
            .with_api_version(config.api.api_version.clone())
            .with_timeouts(
                Duration::from_secs(config.api.connect_timeout_seconds),
                Duration::from_secs(config.api.timeout_seconds),
            ),
    )?);

    let mut submit = SubmitTurnUseCase::new(gateway).with_retry_policy(config.retry.to_policy());

    if config.render.enabled {
        match PythonPlotExecutor::new(&config.render.python, config.render.timeout()) {
            Ok(executor) => {
                let renderer =
                    CodeRenderer::with_settings(Arc::new(executor), config.render.to_settings());
                submit = submit.with_renderer(Arc::new(renderer));
            }
            Err(e) => warn!("Plot rendering disabled: {}", e),
        }
    }

    if let Some(path) = &config.output.conversation_log
        && let Some(logger) = JsonlConversationLogger::new(path)
    {
        info!("Conversation log: {}", logger.path().display());
        submit = submit.with_conversation_logger(Arc::new(logger));
    }

    let export = ExportHistoryUseCase::new(Arc::new(FileTranscriptExporter::new(
        config.output.export_dir.clone(),
    )));

    let mut repl = ChatRepl::new(submit, export, config.generation.to_params()?)
        .with_system_prompt(config.generation.system_prompt.clone())
        .with_prefill(config.generation.prefill.clone())
        .with_config(ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_file.as_ref().map(PathBuf::from),
        });

    match cli.message.as_deref() {
        Some(message) => repl.ask(message).await,
        None => repl.run().await?,
    }

    Ok(())
}

/// Command-line flags win over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        let Ok(model) = model.parse::<Model>();
        config.generation.model = model;
    }
    if let Some(temperature) = cli.temperature {
        config.generation.temperature = temperature;
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.generation.max_tokens = max_tokens;
    }
    if let Some(system) = &cli.system {
        config.generation.system_prompt = system.clone();
    }
    if let Some(prefill) = &cli.prefill {
        config.generation.prefill = prefill.clone();
    }
    if cli.no_render {
        config.render.enabled = false;
    }
}

/// Initialize logging based on verbosity level, optionally mirrored to a
/// daily-rolling file. The returned guard flushes the file writer on drop.
fn init_logging(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "chatstream.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}
