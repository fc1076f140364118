//! RFC9457-style API error wrapper.

use axum::{
    Json,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use dossier_core::{DossierError, DossierErrorKind};

use crate::http::constants::{
    HEADER_TRACE_ID, PROBLEM_BAD_REQUEST, PROBLEM_FORBIDDEN, PROBLEM_INTERNAL, PROBLEM_NOT_FOUND,
    PROBLEM_UNAUTHORIZED, PROBLEM_UPSTREAM,
};
use crate::models::ProblemDetails;

/// Structured API error with optional RFC9457 fields.
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    kind: &'static str,
    title: &'static str,
    detail: Option<String>,
    code: Option<&'static str>,
    trace_id: Option<String>,
}

impl ApiError {
    const fn new(status: StatusCode, kind: &'static str, title: &'static str) -> Self {
        Self {
            status,
            kind,
            title,
            detail: None,
            code: None,
            trace_id: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub(crate) const fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub(crate) fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            PROBLEM_INTERNAL,
            "internal server error",
        )
        .with_detail(message)
    }

    pub(crate) fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            PROBLEM_UNAUTHORIZED,
            "authentication required",
        )
        .with_detail(detail)
    }

    pub(crate) fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, PROBLEM_FORBIDDEN, "forbidden").with_detail(detail)
    }

    pub(crate) fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, PROBLEM_BAD_REQUEST, "bad request").with_detail(detail)
    }

    pub(crate) fn not_found(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            PROBLEM_NOT_FOUND,
            "resource not found",
        )
        .with_detail(detail)
    }

    pub(crate) fn upstream(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_GATEWAY,
            PROBLEM_UPSTREAM,
            "upstream dependency failed",
        )
        .with_detail(detail)
    }

    #[cfg(test)]
    pub(crate) const fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub(crate) const fn code(&self) -> Option<&'static str> {
        self.code
    }
}

impl From<&DossierError> for ApiError {
    fn from(err: &DossierError) -> Self {
        let code = err.code();
        let base = match err.kind() {
            DossierErrorKind::BadRequest => Self::bad_request(describe(err)),
            DossierErrorKind::Unauthenticated => Self::unauthorized(describe(err)),
            DossierErrorKind::Forbidden => Self::forbidden(describe(err)),
            DossierErrorKind::NotFound => Self::not_found(describe(err)),
            DossierErrorKind::Upstream => Self::upstream(describe(err)),
        };
        base.with_code(code)
    }
}

fn describe(err: &DossierError) -> String {
    match err {
        DossierError::InvalidRequest { field, reason } => {
            format!("field '{field}' is invalid: {reason}")
        }
        DossierError::Authentication { .. } => "caller identity could not be resolved".into(),
        DossierError::NotFound { dossier_id } => format!("dossier '{dossier_id}' was not found"),
        DossierError::AlreadyClosed { dossier_id } => {
            format!("dossier '{dossier_id}' is already closed")
        }
        DossierError::AccessDenied { .. } => "update not permitted for this actor".into(),
        DossierError::Lookup { .. } => "dossier search is unavailable".into(),
        DossierError::Authorization { .. } => "authorization service is unavailable".into(),
        DossierError::Update { .. } => "content repository rejected the update".into(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            code: self.code.map(str::to_string),
        };
        let mut response = (self.status, Json(body)).into_response();
        if let Some(value) = self
            .trace_id
            .and_then(|trace_id| HeaderValue::from_str(&trace_id).ok())
        {
            response.headers_mut().insert(HEADER_TRACE_ID, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dossier_errors_map_to_expected_statuses() {
        let cases = [
            (
                DossierError::AlreadyClosed {
                    dossier_id: "d".into(),
                },
                StatusCode::BAD_REQUEST,
                "DOSSIER_ALREADY_CLOSED",
            ),
            (
                DossierError::AccessDenied {
                    actor_id: "a".into(),
                    role: None,
                },
                StatusCode::FORBIDDEN,
                "ACCESS_DENIED",
            ),
            (
                DossierError::NotFound {
                    dossier_id: "d".into(),
                },
                StatusCode::NOT_FOUND,
                "DOSSIER_NOT_FOUND",
            ),
            (
                DossierError::Update {
                    dossier_id: "d".into(),
                    source: "offline".into(),
                },
                StatusCode::BAD_GATEWAY,
                "DOSSIER_UPDATE_FAILED",
            ),
        ];
        for (err, status, code) in cases {
            let api = ApiError::from(&err);
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), Some(code));
        }
    }

    #[test]
    fn trace_id_is_echoed_on_error_responses() {
        let response = ApiError::internal("boom")
            .with_trace_id("trace-1")
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response
                .headers()
                .get(HEADER_TRACE_ID)
                .and_then(|value| value.to_str().ok()),
            Some("trace-1")
        );
    }
}
