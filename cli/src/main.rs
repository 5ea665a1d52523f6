//! CLI entrypoint for juno-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use juno_application::{
    ChatBackend, ConversationLogger, ConversationSession, NoConversationLogger,
    NoSessionObserver, ReplyGenerator, SessionObserver,
};
use juno_domain::{CharacterId, RerollMode, UserId};
use juno_infrastructure::{
    CannedReplyGenerator, ConfigLoader, FileConfig, FileGenerationConfig, FileLoggingConfig,
    GenerationProvider, HermesReplyGenerator, HttpChatBackend, InMemoryChatBackend,
    JsonlConversationLogger, OpenRouterReplyGenerator, SamplingParams,
};
use juno_presentation::{ChatRepl, Cli, ReplConfig, SpinnerObserver};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_logging(cli.verbose, &config.logging)?;
    info!("Starting juno-chat");

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("config: {}", problem);
        }
        bail!("Invalid configuration ({} problem(s))", problems.len());
    }

    let user_id = UserId::new(cli.user.clone()).context("Invalid --user")?;
    let character_id = CharacterId::new(cli.character.clone()).context("Invalid --character")?;

    // === Dependency Injection ===
    let (backend, generator): (Arc<dyn ChatBackend>, Arc<dyn ReplyGenerator>) = if cli.offline {
        info!("Offline mode: in-memory backend, canned replies");
        (
            Arc::new(InMemoryChatBackend::new()),
            Arc::new(CannedReplyGenerator),
        )
    } else {
        (
            build_backend(&config, cli.token.clone())?,
            build_generator(&config.generation)?,
        )
    };

    let mut params = config.session.to_session_params();
    if let Some(mode) = cli.reroll_mode {
        params = params.with_reroll_mode(RerollMode::from(mode));
    }

    let show_progress = config.repl.show_progress && !cli.quiet;
    let observer: Arc<dyn SessionObserver> = if show_progress {
        Arc::new(SpinnerObserver::new())
    } else {
        Arc::new(NoSessionObserver)
    };

    let session = ConversationSession::new(backend, generator)
        .with_conversation_logger(conversation_logger(&config.logging))
        .with_observer(observer)
        .with_params(params);

    let repl_config = ReplConfig::default()
        .with_progress(show_progress)
        .with_history_path(config.repl.history_path());

    ChatRepl::new(Arc::new(session), user_id, character_id)
        .with_config(repl_config)
        .run()
        .await?;

    Ok(())
}

/// Initialize logging based on verbosity level, to a file when configured.
fn init_logging(verbose: u8, logging: &FileLoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = logging.file_path() else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("logging.file has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}

fn conversation_logger(logging: &FileLoggingConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = logging.conversation_log_path() else {
        return Arc::new(NoConversationLogger);
    };

    match JsonlConversationLogger::open(&path) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Could not open conversation log {}: {}", path.display(), e);
            Arc::new(NoConversationLogger)
        }
    }
}

fn build_backend(
    config: &FileConfig,
    token_override: Option<String>,
) -> Result<Arc<dyn ChatBackend>> {
    let token = token_override
        .filter(|t| !t.trim().is_empty())
        .or_else(|| config.backend.resolve_token());
    if token.is_none() {
        warn!("No backend token configured; requests are sent unauthenticated");
    }

    let backend = HttpChatBackend::new(
        config.backend.base_url.clone(),
        Duration::from_secs(config.backend.timeout_seconds),
    )?
    .with_token(token);
    info!("JunoChat backend: {}", backend.base_url());

    Ok(Arc::new(backend))
}

fn build_generator(config: &FileGenerationConfig) -> Result<Arc<dyn ReplyGenerator>> {
    let provider = config
        .parse_provider()
        .map_err(|unknown| anyhow!("Unknown generation provider: {}", unknown))?;
    let timeout = Duration::from_secs(config.timeout_seconds);
    let sampling = SamplingParams {
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        top_p: config.top_p,
        repetition_penalty: config.repetition_penalty,
    };
    let api_key = config.resolve_api_key(provider);
    if api_key.is_none() && provider != GenerationProvider::Canned {
        warn!("No API key found for the {} provider", provider);
    }

    let generator: Arc<dyn ReplyGenerator> = match provider {
        GenerationProvider::OpenRouter => Arc::new(
            OpenRouterReplyGenerator::new(
                config.resolved_base_url(provider),
                config.model.clone(),
                timeout,
            )?
            .with_api_key(api_key)
            .with_sampling(sampling),
        ),
        GenerationProvider::Hermes => Arc::new(
            HermesReplyGenerator::new(config.resolved_base_url(provider), timeout)?
                .with_api_token(api_key)
                .with_sampling(sampling),
        ),
        GenerationProvider::Canned => Arc::new(CannedReplyGenerator),
    };
    info!("Reply generator: {}", generator.name());

    Ok(generator)
}
