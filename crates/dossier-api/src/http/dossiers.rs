//! Dossier update route.
//!
//! # Design
//! - The consumer id header is mandatory; the trace id header is optional and
//!   generated when absent so every collaborator call carries one.
//! - Missing headers and undecodable bodies are answered with problem documents
//!   and counted like the workflow's own rejections.
//! - The trace id is echoed on success and error responses.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path as AxumPath, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use dossier_core::{DossierDescriptionRequest, DossierError, DossierErrorKind};
use dossier_telemetry::{UpdateOutcomeLabel, with_trace_context};
use tracing::{error, info};
use uuid::Uuid;

use crate::http::constants::{HEADER_CONSUMER_ID, HEADER_TRACE_ID, ROUTE_DOSSIER};
use crate::http::errors::ApiError;
use crate::models::DossierUpdateResponse;
use crate::state::ApiState;

pub(crate) async fn patch_dossier_description(
    State(state): State<Arc<ApiState>>,
    AxumPath(dossier_id): AxumPath<String>,
    headers: HeaderMap,
    payload: Result<Json<DossierDescriptionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let trace_id = header_value(&headers, HEADER_TRACE_ID)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let Some(consumer_id) = header_value(&headers, HEADER_CONSUMER_ID) else {
        state
            .telemetry
            .inc_dossier_update(UpdateOutcomeLabel::Unauthenticated);
        let err = DossierError::Authentication {
            consumer_id: String::new(),
            source: "missing consumer id header".into(),
        };
        return Err(ApiError::from(&err)
            .with_detail("missing consumer id header")
            .with_trace_id(trace_id));
    };
    let Json(request) = payload.map_err(|rejection| {
        state.telemetry.inc_dossier_update(UpdateOutcomeLabel::Invalid);
        let err = DossierError::InvalidRequest {
            field: "body",
            reason: "malformed",
        };
        ApiError::from(&err)
            .with_detail(rejection.body_text())
            .with_trace_id(trace_id.clone())
    })?;

    let outcome = with_trace_context(
        trace_id.clone(),
        ROUTE_DOSSIER,
        state
            .service
            .partial_update_by_patch(&consumer_id, &trace_id, &dossier_id, &request),
    )
    .await
    .map_err(|err| {
        if err.kind() == DossierErrorKind::Upstream {
            error!(
                trace_id = %trace_id,
                dossier_id = %dossier_id,
                code = err.code(),
                error = ?err,
                "dossier update failed in a collaborator"
            );
        }
        ApiError::from(&err).with_trace_id(trace_id.clone())
    })?;

    info!(
        trace_id = %trace_id,
        dossier_id = %dossier_id,
        audited = outcome.audited,
        "dossier description patch served"
    );

    let body = DossierUpdateResponse {
        dossier_id: outcome.dossier_id,
        trace_id: trace_id.clone(),
        audited: outcome.audited,
    };
    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(HEADER_TRACE_ID, value);
    }
    Ok(response)
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
