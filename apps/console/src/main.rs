//! Logdeck role administration console.

#![forbid(unsafe_code)]

mod commands;
mod console_config;

use std::sync::Arc;

use logdeck_application::{
    ActionLifecycle, RoleActionBridge, RoleActionSubscription, RoleRoutes, RoleStore,
};
use logdeck_core::{AppError, AppResult};
use logdeck_infrastructure::ReqwestRestTransport;
use tracing::{debug, info, warn};

use crate::commands::{Command, USAGE};
use crate::console_config::{ConsoleConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args, config.per_page) {
        Ok(command) => command,
        Err(error) => {
            eprintln!("{USAGE}");
            return Err(error);
        }
    };

    let store = build_role_store(&config)?;
    let listener = tokio::spawn(log_role_actions(
        store.bridge().subscribe(),
        config.developer_mode,
    ));

    info!(
        api_url = %config.api_url,
        developer_mode = config.developer_mode,
        per_page = config.per_page,
        "logdeck-console started"
    );

    let result = command.run(&store).await;
    drop(store);
    if let Err(error) = listener.await {
        warn!(error = %error, "role action listener stopped abnormally");
    }

    let output = result?;
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}

fn build_role_store(config: &ConsoleConfig) -> AppResult<RoleStore> {
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let mut transport = ReqwestRestTransport::new(http_client, config.api_url.clone());
    if let Some(credentials) = config.credentials.clone() {
        transport = transport.with_credentials(credentials);
    }

    Ok(RoleStore::new(
        Arc::new(transport),
        RoleRoutes::default(),
        RoleActionBridge::default(),
    ))
}

/// Logs lifecycle events until every bridge handle is dropped.
async fn log_role_actions(mut subscription: RoleActionSubscription, developer_mode: bool) {
    while let Some(event) = subscription.recv().await {
        let action = event.action.as_str();
        let invocation = event.invocation.as_u64();
        match &event.lifecycle {
            ActionLifecycle::Pending => {
                debug!(action, invocation, "role action started");
            }
            ActionLifecycle::Completed(_) if developer_mode => {
                info!(action, invocation, outcome = ?event.lifecycle, "role action completed");
            }
            ActionLifecycle::Completed(_) => {
                info!(action, invocation, "role action completed");
            }
            ActionLifecycle::Failed(error) => {
                warn!(action, invocation, error = %error, "role action failed");
            }
        }
    }

    if subscription.missed_events() > 0 {
        warn!(
            missed = subscription.missed_events(),
            "role action listener fell behind"
        );
    }
}
