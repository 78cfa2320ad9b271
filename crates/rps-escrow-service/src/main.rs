//! RPS Escrow Service
//!
//! HTTP front end for the Rock-Paper-Scissors escrow, backed by an
//! in-memory ledger with a simulated clock.

mod error;
mod handlers;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use rps_escrow_core::EscrowConfig;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use handlers::*;
use state::AppState;

const DEFAULT_FAUCET_BALANCE: u64 = 10_000;

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Accounts
        .route("/api/accounts", post(create_account))
        .route("/api/accounts/:id", get(get_account))
        .route("/api/accounts/:id/fund", post(fund_account))
        // Commitments
        .route("/api/hash", post(hash_move))
        // Challenges
        .route("/api/challenges", post(register_challenge))
        .route("/api/challenges/:hash", get(get_challenge))
        .route("/api/challenges/:hash/accept", post(accept_challenge))
        .route("/api/challenges/:hash/reveal", post(deposit_reveal))
        .route("/api/challenges/:hash/claim", post(claim))
        .route("/api/challenges/:hash/reclaim", post(reclaim_timeout))
        // Escrow
        .route("/api/events", get(list_events))
        .route("/api/escrow", get(escrow_status))
        // System
        .route("/api/system/tick", post(tick))
        .route("/api/health", get(health))
        .fallback(direct_transfer)
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match EscrowConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Invalid escrow configuration: {}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };
    tracing::info!(
        "Timeout window {}s..={}s, reveal window {}s",
        config.min_timeout,
        config.max_timeout,
        config.reveal_window
    );

    let faucet_balance: u64 = std::env::var("RPS_FAUCET_BALANCE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FAUCET_BALANCE);
    let genesis = u64::try_from(Utc::now().timestamp()).unwrap_or(0);

    let state = AppState::new(config, genesis, faucet_balance);
    let app = create_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("RPS escrow service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
