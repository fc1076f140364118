//! Identifiers and records shared by the dossier test suites.

use dossier_core::{DossierDescriptionRequest, DossierMetadata};

/// Consumer identifier presented by the caller.
pub const CONSUMER_ID: &str = "testConsumerId";
/// Correlation token threaded through every call.
pub const TRACE_ID: &str = "testTraceId";
/// Dossier under update.
pub const DOSSIER_ID: &str = "testDossierId";
/// Actor resolved from [`CONSUMER_ID`].
pub const ACTOR_ID: &str = "actorId";
/// Content-repository document behind [`DOSSIER_ID`].
pub const DOCUMENT_ID: &str = "testDocumentId";
/// Description applied by [`description_request`].
pub const DESCRIPTION: &str = "Test Description";

/// Metadata for an open dossier carrying a repository document id.
#[must_use]
pub fn open_dossier() -> DossierMetadata {
    DossierMetadata::default()
        .with("uniqueId", DOSSIER_ID)
        .with("documentId", DOCUMENT_ID)
        .with("dossierStatus", "open")
}

/// Metadata for a dossier whose status is `CLOSED`.
#[must_use]
pub fn closed_dossier() -> DossierMetadata {
    open_dossier().with("dossierStatus", "CLOSED")
}

/// Request carrying [`DESCRIPTION`].
#[must_use]
pub fn description_request() -> DossierDescriptionRequest {
    DossierDescriptionRequest::new(DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_fixture_differs_only_by_status() {
        let open = open_dossier();
        let closed = closed_dossier();
        assert_eq!(open.status("dossierStatus"), Some("open"));
        assert_eq!(closed.status("dossierStatus"), Some("CLOSED"));
        assert_eq!(open.get_str("documentId"), closed.get_str("documentId"));
    }
}
