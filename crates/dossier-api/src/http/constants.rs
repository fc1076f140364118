//! Shared HTTP constants (headers, routes, problem URIs).

pub(crate) const HEADER_CONSUMER_ID: &str = "x-consumer-id";
pub(crate) const HEADER_TRACE_ID: &str = "x-trace-id";

pub(crate) const ROUTE_DOSSIER: &str = "/v1/dossiers/{dossier_id}";

pub(crate) const PROBLEM_INTERNAL: &str = "https://dossier.dev/problems/internal";
pub(crate) const PROBLEM_UNAUTHORIZED: &str = "https://dossier.dev/problems/unauthorized";
pub(crate) const PROBLEM_FORBIDDEN: &str = "https://dossier.dev/problems/forbidden";
pub(crate) const PROBLEM_BAD_REQUEST: &str = "https://dossier.dev/problems/bad-request";
pub(crate) const PROBLEM_NOT_FOUND: &str = "https://dossier.dev/problems/not-found";
pub(crate) const PROBLEM_UPSTREAM: &str = "https://dossier.dev/problems/upstream";
