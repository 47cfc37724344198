use anyhow::Context;

use crate::api::config::ApiSecrets;
use crate::api::state::ApiState;
use crate::config::AppConfig;
use crate::preferences::PreferencesStore;
use crate::tracker::TrackerClient;
use crate::utils;

pub mod config;
pub mod controllers;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod state;

/// Runs the HTTP API until a termination signal arrives.
pub async fn http_service(config: AppConfig) -> anyhow::Result<()> {
    let secrets = ApiSecrets::from_env()?;

    let tracker_client = TrackerClient::new(&config.tracker, &secrets.onestepgps_api_key)
        .context("failed to create tracker client")?;
    tracing::info!(url = %config.tracker.url, timeout = ?config.tracker.timeout, "tracker client ready");

    let preferences_store = PreferencesStore::new(&config.preferences);
    tracing::info!(path = %preferences_store.path().display(), "using preferences file");

    tracing::info!(listen_addr = %config.api.listen_addr, "API server starting...");

    let state = ApiState::builder()
        .with_config(config.api)
        .with_tracker_client(tracker_client)
        .with_preferences_store(preferences_store)
        .build();

    let shutdown = utils::signal::termination_signal()
        .context("failed to subscribe to termination signals")?;

    let endpoint = state.bind_endpoint().await?;
    endpoint
        .serve(async move {
            let signal = shutdown.await;
            tracing::info!(?signal, "received termination signal, draining requests");
        })
        .await
        .context("API server failed")?;

    tracing::info!("API server stopped");
    Ok(())
}
