use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use offer_builder::advisor::{Advisor, AdvisorConfig, LlmAdvisor, WebsitePrefill};
use offer_builder::cli::TerminalWizard;
use offer_builder::config::AppConfig;
use offer_builder::llm::create_provider;
use offer_builder::wizard::{self, SessionManager};

/// Install the tracing subscriber. With a log directory, output goes to a
/// daily-rolling file instead of stderr; the guard must outlive `main`.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "offer-builder.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;
    let _log_guard = init_tracing(config.log_dir.as_deref());

    eprintln!("Offer Builder v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/sessions", config.port);

    // ── Advisor ─────────────────────────────────────────────────────────
    let mut manager = SessionManager::new(config.session_idle_timeout);
    match &config.llm {
        Some(llm_config) => {
            let llm = create_provider(llm_config).context("Failed to create LLM provider")?;
            eprintln!("   Advisor: {} ({})", llm_config.backend, llm_config.model);

            let advisor: Arc<dyn Advisor> =
                Arc::new(LlmAdvisor::new(llm.clone(), AdvisorConfig::default()));
            let prefill = Arc::new(WebsitePrefill::new(llm, config.fetch_timeout));
            manager = manager.with_advisor(advisor).with_prefill(prefill);
        }
        None => {
            eprintln!("   Advisor: disabled (set ANTHROPIC_API_KEY or OPENAI_API_KEY)");
        }
    }
    let manager = Arc::new(manager);

    // Sweep idle sessions every minute.
    let _prune_handle = wizard::spawn_prune_task(manager.clone());

    // ── HTTP server ─────────────────────────────────────────────────────
    let app = wizard::wizard_routes(manager.clone());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "HTTP server started");

    if !config.run_cli {
        axum::serve(listener, app).await.context("HTTP server failed")?;
        return Ok(());
    }

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "HTTP server failed");
        }
    });

    // ── Terminal wizard ─────────────────────────────────────────────────
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut terminal = TerminalWizard::new(manager, stdin, tokio::io::stdout());
    terminal.run().await.context("Terminal wizard failed")?;

    server.abort();
    Ok(())
}
