//! Health and metrics endpoints.

use std::sync::Arc;

use axum::{Json, body::Body, extract::State, http::StatusCode, response::Response};
use dossier_telemetry::build_sha;
use tracing::error;

use crate::http::errors::ApiError;
use crate::models::HealthResponse;
use crate::state::ApiState;

pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        build: build_sha().to_string(),
    })
}

pub(crate) async fn metrics(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    match state.telemetry.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )
            .body(Body::from(body))
            .map_err(|err| {
                error!(error = %err, "failed to build metrics response");
                ApiError::internal("failed to build metrics response")
            }),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            Err(ApiError::internal("failed to render metrics"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use dossier_telemetry::UpdateOutcomeLabel;
    use dossier_test_support::mocks::MockCollaborators;

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
        assert!(!body.build.is_empty());
    }

    #[tokio::test]
    async fn metrics_renders_update_counters() -> Result<()> {
        let (service, telemetry) = MockCollaborators::new().service()?;
        telemetry.inc_dossier_update(UpdateOutcomeLabel::Closed);
        let state = Arc::new(ApiState::new(service, telemetry));

        let response = metrics(State(state))
            .await
            .map_err(|err| anyhow::anyhow!("metrics failed: {err:?}"))?;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let text = String::from_utf8(bytes.to_vec())?;
        assert!(text.contains("dossier_updates_total"));
        assert!(text.contains("outcome=\"closed\""));
        Ok(())
    }
}
