//! # Procurement Server
//!
//! Runs the REST API over in-memory repositories. Committed events are fanned
//! out on a broadcast channel; this binary logs them in place of the external
//! notification system.

use anyhow::Context;
use clap::Parser;
use procurement_rfq::api::rest::{AppState, create_router};
use procurement_rfq::application::{Procurement, SystemClock};
use procurement_rfq::config::Settings;
use procurement_rfq::domain::events::{DomainEvent, ProcurementEvent};
use procurement_rfq::infrastructure::events::{BroadcastEventPublisher, DEFAULT_CHANNEL_CAPACITY};
use procurement_rfq::infrastructure::persistence::InMemoryQuotationRepository;
use procurement_rfq::telemetry;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Command line overrides for the loaded settings.
#[derive(Debug, Parser)]
#[command(name = "procurement-server", version, about)]
struct Args {
    /// Bind host.
    #[arg(long)]
    host: Option<String>,

    /// Bind port.
    #[arg(long)]
    port: Option<u16>,

    /// Event channel capacity.
    #[arg(long, default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    event_capacity: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut settings = Settings::load().context("failed to load settings")?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    telemetry::init(&settings.logging).context("failed to install tracing subscriber")?;

    let publisher = BroadcastEventPublisher::new(args.event_capacity);
    tokio::spawn(log_events(publisher.subscribe()));

    let quotations = InMemoryQuotationRepository::new();
    let stock_requests = Arc::new(quotations.stock_requests());
    let procurement = Procurement::new(
        Arc::new(quotations),
        stock_requests,
        Arc::new(publisher),
        Arc::new(SystemClock),
        settings.engine.clone(),
    );
    let router = create_router(AppState::new(procurement));

    let addr = settings
        .server
        .socket_addr()
        .with_context(|| format!("invalid bind address {}", settings.server.host))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        environment = %settings.environment,
        number_prefix = %settings.engine.quotation_number_prefix,
        "procurement server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("procurement server stopped");
    Ok(())
}

async fn log_events(mut events: broadcast::Receiver<ProcurementEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => info!(
                event = event.event_name(),
                quotation_id = %event.quotation_id(),
                actor = %event.actor_id(),
                "event"
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event log lagging");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
