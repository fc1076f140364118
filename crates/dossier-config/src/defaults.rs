//! Default values applied when a setting is not provided.

use std::net::{IpAddr, Ipv4Addr};

pub(crate) const BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub(crate) const HTTP_PORT: u16 = 8080;
pub(crate) const SEARCH_INDEX: &str = "searchDossier";
pub(crate) const ID_FIELD: &str = "uniqueId";
pub(crate) const STATUS_FIELD: &str = "dossierStatus";
pub(crate) const CLOSED_STATUS: &str = "closed";
pub(crate) const REPOSITORY_ID_FIELD: &str = "documentId";
pub(crate) const RESOURCE_TYPE: &str = "DOSSIER";
pub(crate) const UPDATE_ACTION: &str = "UPDATE_DOSSIER";
pub(crate) const LOG_LEVEL: &str = "info";
