use identity_core::observability::init_tracing;
use identity_core::ApiService;
use identity_flow::{run_flow, FlowConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = FlowConfig::load()?;

    init_tracing(
        "identity-flow",
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    let api = ApiService::from_config(config.client.clone())?;
    let report = run_flow(&api, &config).await?;

    tracing::info!(
        identity_id = %report.identity_id,
        accepted = report.accepted,
        rejected = report.rejected,
        final_status = ?report.final_status,
        "Flow finished"
    );

    if report.rejected > 0 {
        anyhow::bail!(
            "{} of {} inputs were rejected",
            report.rejected,
            report.results.len()
        );
    }

    Ok(())
}
