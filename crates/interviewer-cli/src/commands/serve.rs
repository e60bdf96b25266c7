//! The `interviewer serve` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use interviewer_core::InterviewService;
use interviewer_providers::config::load_config_from;
use interviewer_server::{start_server, ServerConfig};

pub async fn execute(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider = config.build_provider()?;
    let service = InterviewService::from_provider(provider, config.engine_config()?);

    let server_config = ServerConfig {
        host: host.unwrap_or(config.server.host),
        port: port.unwrap_or(config.server.port),
    };

    tracing::info!(
        provider = %config.default_provider,
        model = %config.default_model,
        gate_capacity = config.gate_capacity,
        "interview service ready"
    );

    start_server(server_config, Arc::new(service)).await
}
