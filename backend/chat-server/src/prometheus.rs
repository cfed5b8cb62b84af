use crate::error::{Result as ServerErrorResult, ServerError};

use log::info;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder; hub and connection metrics flow into it
pub fn install_recorder() -> ServerErrorResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::metrics(format!("Failed to install Prometheus recorder: {e}")))?;

    info!("Prometheus recorder installed");
    Ok(handle)
}

/// GET /metrics body
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}
