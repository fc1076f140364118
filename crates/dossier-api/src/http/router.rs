//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::MatchedPath,
    http::Request,
    routing::{get, patch},
};
use dossier_core::PartialUpdateDossierService;
use dossier_telemetry::{Metrics, build_sha};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Span, info, warn};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::{HEADER_TRACE_ID, ROUTE_DOSSIER};
use crate::http::dossiers::patch_dossier_description;
use crate::http::health::{health, metrics};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper that hosts the dossier API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the router around a ready-to-use update service and the shared metrics registry.
    #[must_use]
    pub fn new(service: PartialUpdateDossierService, telemetry: Metrics) -> Self {
        let state = Arc::new(ApiState::new(service, telemetry.clone()));
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let route = request.extensions().get::<MatchedPath>().map_or_else(
                    || request.uri().path().to_string(),
                    |matched| matched.as_str().to_string(),
                );
                let trace_id = request
                    .headers()
                    .get(HEADER_TRACE_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %route,
                    trace_id = %trace_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route(ROUTE_DOSSIER, patch(patch_dossier_description))
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    /// Serve the API on the supplied address until ctrl-c is received.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(%addr, "dossier API listening");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }

    #[cfg(test)]
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, StatusCode};
    use dossier_core::Decision;
    use dossier_telemetry::UpdateOutcomeLabel;
    use dossier_test_support::fixtures::{CONSUMER_ID, DESCRIPTION, DOSSIER_ID, TRACE_ID};
    use dossier_test_support::mocks::{CallKind, MockCollaborators, SearchResponse};
    use tower::ServiceExt;

    use crate::http::constants::HEADER_CONSUMER_ID;
    use crate::models::{DossierUpdateResponse, ProblemDetails};

    fn server(mocks: &MockCollaborators) -> Result<(ApiServer, Metrics)> {
        let (service, telemetry) = mocks.service()?;
        Ok((ApiServer::new(service, telemetry.clone()), telemetry))
    }

    fn patch_request(dossier_id: &str, body: &str) -> Result<Request<Body>> {
        Ok(Request::builder()
            .method(Method::PATCH)
            .uri(format!("/v1/dossiers/{dossier_id}"))
            .header("content-type", "application/json")
            .header(HEADER_CONSUMER_ID, CONSUMER_ID)
            .header(HEADER_TRACE_ID, TRACE_ID)
            .body(Body::from(body.to_string()))?)
    }

    fn description_body() -> String {
        serde_json::json!({ "description": DESCRIPTION }).to_string()
    }

    #[tokio::test]
    async fn patch_route_updates_and_counts_request() -> Result<()> {
        let mocks = MockCollaborators::new();
        let (server, telemetry) = server(&mocks)?;
        let response = server
            .router()
            .oneshot(patch_request(DOSSIER_ID, &description_body())?)
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body: DossierUpdateResponse = serde_json::from_slice(&bytes)?;
        assert_eq!(body.dossier_id, DOSSIER_ID);
        assert_eq!(body.trace_id, TRACE_ID);
        assert!(body.audited);
        assert_eq!(mocks.log().count(CallKind::Audit), 1);

        let rendered = telemetry.render()?;
        assert!(rendered.contains("route=\"/v1/dossiers/{dossier_id}\""));
        Ok(())
    }

    #[tokio::test]
    async fn denied_update_returns_problem_document() -> Result<()> {
        let mocks = MockCollaborators::new().with_decision(Decision::deny("viewer"));
        let (server, _) = server(&mocks)?;
        let response = server
            .router()
            .oneshot(patch_request(DOSSIER_ID, &description_body())?)
            .await?;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let problem: ProblemDetails = serde_json::from_slice(&bytes)?;
        assert_eq!(problem.code.as_deref(), Some("ACCESS_DENIED"));
        assert_eq!(problem.status, 403);
        assert_eq!(mocks.log().count(CallKind::PartialUpdate), 0);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_dossier_returns_not_found() -> Result<()> {
        let mocks = MockCollaborators::new().with_search(SearchResponse::Missing);
        let (server, _) = server(&mocks)?;
        let response = server
            .router()
            .oneshot(patch_request("missing", &description_body())?)
            .await?;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let problem: ProblemDetails = serde_json::from_slice(&bytes)?;
        assert_eq!(problem.code.as_deref(), Some("DOSSIER_NOT_FOUND"));
        Ok(())
    }

    #[tokio::test]
    async fn undecodable_bodies_return_invalid_request_problems() -> Result<()> {
        let mocks = MockCollaborators::new();
        let (server, telemetry) = server(&mocks)?;

        for body in ["{}", "not json"] {
            let response = server
                .router()
                .oneshot(patch_request(DOSSIER_ID, body)?)
                .await?;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(
                response
                    .headers()
                    .get("content-type")
                    .and_then(|value| value.to_str().ok()),
                Some("application/json")
            );
            assert_eq!(
                response
                    .headers()
                    .get(HEADER_TRACE_ID)
                    .and_then(|value| value.to_str().ok()),
                Some(TRACE_ID)
            );
            let bytes = to_bytes(response.into_body(), usize::MAX).await?;
            let problem: ProblemDetails = serde_json::from_slice(&bytes)?;
            assert_eq!(problem.code.as_deref(), Some("INVALID_REQUEST"));
            assert_eq!(problem.status, 400);
        }

        assert!(mocks.log().calls().is_empty());
        assert_eq!(telemetry.dossier_updates(UpdateOutcomeLabel::Invalid), 2);
        Ok(())
    }

    #[tokio::test]
    async fn missing_consumer_header_returns_authentication_problem() -> Result<()> {
        let mocks = MockCollaborators::new();
        let (server, telemetry) = server(&mocks)?;
        let request = Request::builder()
            .method(Method::PATCH)
            .uri(format!("/v1/dossiers/{DOSSIER_ID}"))
            .header("content-type", "application/json")
            .body(Body::from(description_body()))?;

        let response = server.router().oneshot(request).await?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(HEADER_TRACE_ID).is_some());
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let problem: ProblemDetails = serde_json::from_slice(&bytes)?;
        assert_eq!(problem.code.as_deref(), Some("AUTHENTICATION_FAILED"));
        assert_eq!(
            telemetry.dossier_updates(UpdateOutcomeLabel::Unauthenticated),
            1
        );
        Ok(())
    }

    #[tokio::test]
    async fn health_route_is_served() -> Result<()> {
        let (server, _) = server(&MockCollaborators::new())?;
        let response = server
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let trace = response.headers().get(HEADER_TRACE_ID);
        if trace.is_some() {
            return Err(anyhow!("health responses should not carry a trace id"));
        }
        Ok(())
    }
}
