#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use resource_plan::{PlanWorkspace, PlannerConfig, http_api, load_snapshot_from_json, telemetry};

    let config = PlannerConfig::from_env()?;
    telemetry::init_tracing(&config.log_level);

    let addr: SocketAddr = config.http_addr.parse()?;
    let mut workspace = PlanWorkspace::from_config(&config)?;

    if let Some(path) = config.snapshot_path.as_deref() {
        workspace.set_snapshot(load_snapshot_from_json(path)?)?;
    }
    tracing::info!(%addr, policy = workspace.name_policy().as_str(), "starting resource-plan http api");
    let state = build_state(&config, workspace).await?;
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(all(feature = "http_api", feature = "rest_client"))]
async fn build_state(
    config: &resource_plan::PlannerConfig,
    mut workspace: resource_plan::PlanWorkspace,
) -> Result<resource_plan::http_api::AppState, resource_plan::PlanError> {
    use resource_plan::http_api::AppState;

    let Some(base_url) = config.api_base_url.as_deref() else {
        return Ok(AppState::new(workspace));
    };
    let mut client = resource_plan::ApiClient::new(base_url);
    if let Some(token) = config.api_token.as_deref() {
        client = client.with_token(token);
    }
    workspace.set_snapshot(client.fetch_snapshot().await?)?;
    Ok(AppState::new(workspace).with_client(client))
}

#[cfg(all(feature = "http_api", not(feature = "rest_client")))]
async fn build_state(
    config: &resource_plan::PlannerConfig,
    workspace: resource_plan::PlanWorkspace,
) -> Result<resource_plan::http_api::AppState, resource_plan::PlanError> {
    if config.api_base_url.is_some() {
        tracing::warn!("api_base_url is set but the `rest_client` feature is disabled");
    }
    Ok(resource_plan::http_api::AppState::new(workspace))
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
