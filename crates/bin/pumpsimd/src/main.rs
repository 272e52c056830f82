//! # pumpsimd: pumpsim daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging and the process-wide translation catalog
//! - Construct the virtual collaborators (adapters)
//! - Construct the form controller and dashboard shell, injecting adapters via
//!   port traits
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use pumpsim_adapter_http_axum::state::AppState;
use pumpsim_adapter_virtual::{RandomNameProvider, SimulatedPump};
use pumpsim_app::i18n::{self, Catalog};
use pumpsim_app::services::{DashboardShell, FormController};
use pumpsim_domain::layout::{CardDescriptor, CardKind};
use tracing_subscriber::EnvFilter;

use config::{Config, I18nConfig};

fn build_catalog(config: &I18nConfig) -> Result<Catalog, i18n::CatalogError> {
    let mut catalog = Catalog::bundled(&config.locale, &config.fallback_locale)?;
    if let Some(dir) = &config.locales_dir {
        let loaded = catalog.load_dir(dir)?;
        tracing::info!(dir = %dir.display(), loaded, "loaded extra locale bundles");
    }
    catalog.validate()?;
    Ok(catalog)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Translations
    let catalog = build_catalog(&config.i18n)?;
    tracing::info!(
        locale = catalog.locale(),
        fallback = catalog.fallback_locale(),
        locales = ?catalog.locales(),
        "translation catalog ready"
    );
    i18n::init(catalog)?;

    // Collaborators
    let naming = RandomNameProvider::with_latency(config.naming.latency());

    // Services
    let controller = FormController::loading(naming, SimulatedPump::default())
        .with_naming_timeout(config.naming.timeout());
    // A fresh simulated pump has no applied configuration yet.
    controller.finish_loading(None)?;

    let shell = DashboardShell::default()
        .register(CardDescriptor::new(CardKind::Placeholder, "PLACEHOLDER.TITLE"));

    // HTTP
    let app = pumpsim_adapter_http_axum::router::build(AppState::new(controller, shell));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "pumpsimd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("pumpsimd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
