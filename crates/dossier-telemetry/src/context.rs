//! Trace context propagation for request-scoped spans.
//!
//! # Design
//! - Keeps the caller's trace identifier and matched route in task-local storage.
//! - Downstream code reads the identifiers without threading them through every call.

use std::future::Future;
use std::sync::Arc;

/// Retrieve the trace identifier of the request being served, if any.
#[must_use]
pub fn current_trace_id() -> Option<String> {
    ACTIVE_TRACE_CONTEXT
        .try_with(|ctx| ctx.trace_id.as_ref().to_string())
        .ok()
}

/// Retrieve the matched route of the request being served, if any.
#[must_use]
pub fn current_route() -> Option<String> {
    ACTIVE_TRACE_CONTEXT
        .try_with(|ctx| ctx.route.as_ref().to_string())
        .ok()
}

/// Execute the provided future with the supplied trace context available to downstream code.
pub async fn with_trace_context<Fut, T>(
    trace_id: impl Into<String>,
    route: impl Into<String>,
    fut: Fut,
) -> T
where
    Fut: Future<Output = T>,
{
    let context = TraceContext {
        trace_id: Arc::from(trace_id.into()),
        route: Arc::from(route.into()),
    };
    ACTIVE_TRACE_CONTEXT.scope(context, fut).await
}

#[derive(Clone)]
struct TraceContext {
    trace_id: Arc<str>,
    route: Arc<str>,
}

tokio::task_local! {
    static ACTIVE_TRACE_CONTEXT: TraceContext;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_trace_context_exposes_identifiers() {
        let output = with_trace_context("trace-42", "/v1/dossiers/{dossier_id}", async {
            assert_eq!(current_trace_id().as_deref(), Some("trace-42"));
            assert_eq!(
                current_route().as_deref(),
                Some("/v1/dossiers/{dossier_id}")
            );
            "done"
        })
        .await;
        assert_eq!(output, "done");
        assert!(current_trace_id().is_none());
        assert!(current_route().is_none());
    }
}
