//! CLI entrypoint for negotia
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use negotia_application::{
    AgentGateway, ConversationLogger, NegotiationController, SessionRepository,
};
use negotia_infrastructure::{
    AgentBackend, AssistantsClient, ConfigLoader, FileConfig, HostedAssistantGateway,
    JsonSessionStore, JsonlConversationLogger, LocalModelGateway, load_catalog,
};
use negotia_presentation::{BackendArg, ChatRepl, Cli, ConsoleFormatter};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?
    };
    if let Some(backend) = cli.backend {
        config.agent.backend = match backend {
            BackendArg::Hosted => AgentBackend::Hosted,
            BackendArg::Local => AgentBackend::Local,
        };
    }

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.dir.clone());
    let _guard = init_logging(cli.verbose, log_dir.as_deref())?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!(backend = config.agent.backend.as_str(), "Starting negotia");

    let store = Arc::new(JsonSessionStore::new(&config.storage.dir));

    if let Some(term) = &cli.list {
        let sessions = store.list_sessions(Some(term))?;
        print!("{}", ConsoleFormatter::format_sessions(&sessions));
        return Ok(());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{}", ConsoleFormatter::format_error(&e.to_string()));
        }
        bail!("{} configuration error(s)", errors.len());
    }

    let catalog = load_catalog(&config.catalog.path).with_context(|| {
        format!(
            "Could not load product catalog from {}",
            config.catalog.path.display()
        )
    })?;

    // === Dependency Injection ===
    let gateway = build_gateway(&config).await?;
    let mut controller = NegotiationController::new(gateway, store, Arc::new(catalog));

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                info!(path = %path.display(), "Writing transcript");
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                controller = controller.with_conversation_logger(logger);
            }
            Err(e) => warn!("Transcript disabled, cannot open {}: {}", path.display(), e),
        }
    }

    match &cli.load {
        Some(filename) => controller
            .load_session(filename)
            .with_context(|| format!("Could not resume session {}", filename))?,
        None => controller.new_negotiation().await,
    }

    let mut repl = ChatRepl::new(controller)
        .with_progress(!cli.quiet && config.repl.show_progress)
        .with_top_products(config.output.top_products)
        .with_history_file(config.repl.history_file.as_ref().map(Into::into));

    repl.run().await?;
    Ok(())
}

/// Stderr logging at the `-v` level (`RUST_LOG` wins when set), plus a
/// daily rotated file under `log_dir`.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "negotia.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn build_gateway(config: &FileConfig) -> Result<Arc<dyn AgentGateway>> {
    let polling = config.polling.to_params();

    match config.agent.backend {
        AgentBackend::Hosted => {
            let client =
                AssistantsClient::from_env(&config.hosted.api_base, &config.hosted.api_key_env)?;
            let gateway = HostedAssistantGateway::new(client, &config.hosted.assistant_id)
                .with_polling(polling);
            gateway.describe().await.with_context(|| {
                format!(
                    "Could not reach assistant {}",
                    config.hosted.assistant_id
                )
            })?;
            Ok(Arc::new(gateway))
        }
        AgentBackend::Local => {
            let local = &config.local;
            let mut gateway = LocalModelGateway::new(&local.url, &local.model)
                .with_temperature(local.temperature)
                .with_max_tokens(local.max_tokens)
                .with_max_wait(polling.max_wait);
            if let Some(prompt) = &local.system_prompt {
                gateway = gateway.with_system_prompt(prompt);
            }
            info!(model = %gateway.model(), url = %local.url, "Using local model");
            Ok(Arc::new(gateway))
        }
    }
}
