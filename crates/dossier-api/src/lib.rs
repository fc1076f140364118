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

//! HTTP delivery surface for the dossier partial update workflow.
//!
//! Layout: `http/router.rs` (`ApiServer`), `http/dossiers.rs` (PATCH handler),
//! `http/health.rs` (health + metrics), `http/errors.rs` (problem responses),
//! `http/telemetry.rs` (request metrics layer), `models.rs` (wire DTOs).

pub mod error;
mod http;
pub mod models;
mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
