//! Shared handler state.

use dossier_core::PartialUpdateDossierService;
use dossier_telemetry::Metrics;

pub(crate) struct ApiState {
    pub(crate) service: PartialUpdateDossierService,
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    pub(crate) const fn new(service: PartialUpdateDossierService, telemetry: Metrics) -> Self {
        Self { service, telemetry }
    }
}
