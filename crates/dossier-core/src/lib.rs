#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Dossier domain model, collaborator interfaces, and the partial update workflow.
//!
//! Layout: `model.rs` (request/metadata/decision DTOs), `service.rs`
//! (collaborator traits), `update.rs` (`PartialUpdateDossierService`),
//! `error.rs` (`DossierError`).

pub mod error;
pub mod model;
pub mod service;
pub mod update;

pub use error::{DossierError, DossierErrorKind, DossierResult};
pub use model::{
    AuditRecord, Decision, DecisionEffect, DossierDescriptionRequest, DossierLookup,
    DossierMetadata, MAX_DESCRIPTION_CHARS, PartialUpdateCommand,
    PartialUpdateProperties, Resource, UpdateOutcome,
};
pub use service::{
    AttributeResourceMapper, AuditSink, AuthorizationPolicy, Collaborators, ContentRepository,
    DossierSearch, IdentityValidator, ResourceMapper,
};
pub use update::PartialUpdateDossierService;
