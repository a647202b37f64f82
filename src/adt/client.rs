//! adt::client
//!
//! `AdtClient` and the thin read operations.
//!
//! # Design
//!
//! The client owns a shared transport plus the few settings that shape
//! requests (language, default package, "already exists" marker). Reads
//! are single proxy calls; the write-side sequences live in
//! [`mutation`](super::mutation) and [`upsert`](super::upsert) and are
//! implemented as further methods on this type.

use std::sync::Arc;

use serde::Serialize;

use crate::bridge::{BridgeError, BridgeTransport, ProxyCall};
use crate::core::config::Config;
use crate::core::naming;

use super::paths::{self, ObjectKind};
use super::payloads::{self, ObjectReference};
use super::AdtError;

/// Outcome of a connectivity check. Never an `Err`; unavailability is a
/// reportable state, not a failure.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    /// Whether the discovery document was served.
    pub connected: bool,
    /// Bridge base URL that answered, when one did.
    pub bridge_url: Option<String>,
    /// Human-readable detail (error text when not connected).
    pub detail: String,
}

/// Hits of a repository search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// The query as sent.
    pub query: String,
    /// Matching objects.
    pub objects: Vec<ObjectReference>,
}

/// Package metadata plus direct contents.
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo {
    /// Package name, upper-cased.
    pub name: String,
    /// Short description, empty when absent.
    pub description: String,
    /// Objects housed directly in the package.
    pub objects: Vec<ObjectReference>,
}

/// Generic metadata of one object, fetched by URI.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    /// URI the info was fetched from.
    pub uri: String,
    /// All metadata attributes the repository returned.
    pub attributes: std::collections::BTreeMap<String, String>,
}

/// Client for repository operations over a bridge transport.
pub struct AdtClient {
    pub(super) bridge: Arc<dyn BridgeTransport>,
    pub(super) already_exists_marker: String,
    pub(super) default_package: String,
    pub(super) language: String,
}

impl std::fmt::Debug for AdtClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdtClient")
            .field("already_exists_marker", &self.already_exists_marker)
            .field("default_package", &self.default_package)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl AdtClient {
    /// Create a client with explicit settings.
    pub fn new(
        bridge: Arc<dyn BridgeTransport>,
        already_exists_marker: impl Into<String>,
        default_package: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            bridge,
            already_exists_marker: already_exists_marker.into(),
            default_package: default_package.into(),
            language: language.into(),
        }
    }

    /// Create a client taking its settings from loaded configuration.
    pub fn from_config(bridge: Arc<dyn BridgeTransport>, config: &Config) -> Self {
        Self::new(
            bridge,
            config.already_exists_marker(),
            config.default_package(),
            config.language(),
        )
    }

    /// Verify connectivity by fetching the discovery document.
    pub async fn check_connection(&self, bridge_url: Option<String>) -> ConnectionStatus {
        match self
            .bridge
            .get_text(paths::DISCOVERY_PATH, "application/atomsvc+xml")
            .await
        {
            Ok(_) => ConnectionStatus {
                connected: true,
                bridge_url,
                detail: "remote system reachable".to_string(),
            },
            Err(e) => ConnectionStatus {
                connected: false,
                bridge_url: None,
                detail: e.to_string(),
            },
        }
    }

    /// Quick-search the repository.
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        object_type: Option<&str>,
        package: Option<&str>,
    ) -> Result<SearchResults, AdtError> {
        let mut call = ProxyCall::new("GET", paths::SEARCH_PATH)
            .header("Accept", "application/xml")
            .param("operation", "quickSearch")
            .param("query", query)
            .param("maxResults", max_results.to_string());
        if let Some(t) = object_type {
            call = call.param("objectType", t);
        }
        if let Some(p) = package {
            call = call.param("packageName", p.to_uppercase());
        }

        let result = self.bridge.send(call).await?;
        Ok(SearchResults {
            query: query.to_string(),
            objects: payloads::parse_object_references(&result.body),
        })
    }

    /// Read the main source of an object.
    ///
    /// Tables have no source include; their read routes to the structure
    /// definition instead. Function modules need their housing group.
    pub async fn read_source(
        &self,
        kind: ObjectKind,
        name: &str,
        group: Option<&str>,
    ) -> Result<String, AdtError> {
        if kind == ObjectKind::Table {
            return self.table_definition(name).await;
        }

        let path = match kind {
            ObjectKind::FunctionModule => {
                let group = group.ok_or_else(|| AdtError::UnsupportedKind {
                    kind: "function-module without --group".to_string(),
                    supported: "pass the housing function group".to_string(),
                })?;
                format!("{}/source/main", paths::function_module_path(group, name))
            }
            _ => kind.source_path(name),
        };

        self.bridge
            .get_text(&path, "text/plain")
            .await
            .map_err(|e| Self::map_not_found(e, kind, name))
    }

    /// Read a table's structure definition.
    pub async fn table_definition(&self, name: &str) -> Result<String, AdtError> {
        let path = ObjectKind::Table.object_path(name);
        self.bridge
            .get_text(&path, "application/xml")
            .await
            .map_err(|e| Self::map_not_found(e, ObjectKind::Table, name))
    }

    /// Fetch package metadata and direct contents.
    pub async fn get_package(&self, name: &str) -> Result<PackageInfo, AdtError> {
        let upper = name.to_uppercase();
        let meta_path = format!("/sap/bc/adt/packages/{}", upper.to_lowercase());
        let meta_body = self
            .bridge
            .get_text(&meta_path, "application/xml")
            .await
            .map_err(|e| match e.status() {
                Some(404) => AdtError::NotFound {
                    kind: "package".to_string(),
                    name: upper.clone(),
                },
                _ => e.into(),
            })?;
        let attrs = payloads::parse_attributes(&meta_body);

        let contents = self
            .search("*", 100, None, Some(&upper))
            .await
            .map(|r| r.objects)
            .unwrap_or_default();

        Ok(PackageInfo {
            name: upper,
            description: attrs
                .get("adtcore:description")
                .cloned()
                .unwrap_or_default(),
            objects: contents,
        })
    }

    /// Fetch generic metadata of an object by its URI.
    pub async fn object_info(&self, uri: &str) -> Result<ObjectInfo, AdtError> {
        let body = self.bridge.get_text(uri, "application/xml").await?;
        Ok(ObjectInfo {
            uri: uri.to_string(),
            attributes: payloads::parse_attributes(&body),
        })
    }

    /// Normalized object name per the customer-namespace rules.
    pub(super) fn normalized(&self, name: &str) -> String {
        naming::normalize_object_name(name)
    }

    fn map_not_found(e: BridgeError, kind: ObjectKind, name: &str) -> AdtError {
        match e.status() {
            Some(404) => AdtError::NotFound {
                kind: kind.to_string(),
                name: name.to_uppercase(),
            },
            _ => e.into(),
        }
    }
}
