//! adt::upsert
//!
//! Create-or-update reconciliation.
//!
//! # Design
//!
//! There is no existence pre-check. Every upsert optimistically POSTs
//! the creation payload; when the remote rejects it with a 4xx whose
//! body contains the configured "already exists" marker, the operation
//! switches to update mode. A check-then-create would race against
//! concurrent creators; the rejection body is the authoritative signal.
//!
//! After creation (or the already-exists fallback), source handling
//! depends on what the caller supplied: with source text the full
//! [`mutation`](super::mutation) sequence runs, without it a freshly
//! created object is activated once so it does not linger inactive.

use serde::Serialize;

use crate::bridge::BridgeError;
use crate::core::naming;

use super::client::AdtClient;
use super::paths::{self, ObjectKind};
use super::payloads;
use super::{mutation, AdtError};

/// What the reconciler ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertAction {
    /// The object did not exist and was created.
    Created,
    /// The object existed; its source was replaced.
    Updated,
    /// The object existed and nothing further was requested.
    AlreadyExisted,
}

impl std::fmt::Display for UpsertAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpsertAction::Created => write!(f, "created"),
            UpsertAction::Updated => write!(f, "updated"),
            UpsertAction::AlreadyExisted => write!(f, "already existed"),
        }
    }
}

/// Caller's description of the desired object state.
#[derive(Debug, Clone, Default)]
pub struct ObjectDescriptor {
    /// Object name; normalized before use.
    pub name: String,
    /// Short description for newly created objects.
    pub description: Option<String>,
    /// Housing package; falls back to the configured default.
    pub package: Option<String>,
    /// Transport request number, when the package needs one.
    pub transport: Option<String>,
    /// Desired main source; `None` means metadata-only.
    pub source: Option<String>,
}

/// Report of a completed upsert.
#[derive(Debug, Clone, Serialize)]
pub struct UpsertOutcome {
    /// What happened.
    pub action: UpsertAction,
    /// Normalized object name.
    pub name: String,
    /// Package the object lives in.
    pub package: String,
    /// Transport request used, if any.
    pub transport: Option<String>,
    /// Whether source was written as part of this upsert.
    pub source_written: bool,
    /// Housing function group, for function modules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Whether an error is the remote's "this object already exists"
/// rejection: a 4xx application error whose body carries the marker.
fn is_already_exists(err: &BridgeError, marker: &str) -> bool {
    match err {
        BridgeError::Api { status, body, .. } => {
            (400..500).contains(status) && body.contains(marker)
        }
        _ => false,
    }
}

impl AdtClient {
    /// Create or update a class.
    pub async fn create_or_update_class(
        &self,
        desc: &ObjectDescriptor,
    ) -> Result<UpsertOutcome, AdtError> {
        let name = self.normalized(&desc.name);
        let package = self.package_for(desc);
        let body = payloads::class_xml(
            &name,
            desc.description.as_deref().unwrap_or(&name),
            &package,
            &self.language,
        );
        self.upsert_with_source(
            ObjectKind::Class,
            &name,
            &body,
            payloads::CLASS_CONTENT_TYPE,
            desc,
            package,
        )
        .await
    }

    /// Create or update a program.
    pub async fn create_or_update_program(
        &self,
        desc: &ObjectDescriptor,
    ) -> Result<UpsertOutcome, AdtError> {
        let name = self.normalized(&desc.name);
        let package = self.package_for(desc);
        let body = payloads::program_xml(
            &name,
            desc.description.as_deref().unwrap_or(&name),
            &package,
            &self.language,
        );
        self.upsert_with_source(
            ObjectKind::Program,
            &name,
            &body,
            payloads::PROGRAM_CONTENT_TYPE,
            desc,
            package,
        )
        .await
    }

    /// Ensure a function group exists. Groups carry no directly editable
    /// source; the outcome is `Created` or `AlreadyExisted`.
    pub async fn ensure_function_group(
        &self,
        desc: &ObjectDescriptor,
    ) -> Result<UpsertOutcome, AdtError> {
        let name = naming::normalize_group_name(&desc.name)?;
        let package = self.package_for(desc);
        let body = payloads::function_group_xml(
            &name,
            desc.description.as_deref().unwrap_or(&name),
            &package,
            &self.language,
        );

        let action = self
            .create(
                ObjectKind::FunctionGroup.collection_path(),
                &body,
                payloads::GROUP_CONTENT_TYPE,
                desc.transport.as_deref(),
            )
            .await?;

        Ok(UpsertOutcome {
            action: match action {
                UpsertAction::Created => UpsertAction::Created,
                _ => UpsertAction::AlreadyExisted,
            },
            name,
            package,
            transport: desc.transport.clone(),
            source_written: false,
            group: None,
        })
    }

    /// Create or update a function module, ensuring its housing group
    /// first.
    ///
    /// An explicit `group` is validated against the group-name limit and
    /// rejected before any network call when too long. Without a group,
    /// one is derived from the module name (truncated to the limit).
    pub async fn create_or_update_function_module(
        &self,
        desc: &ObjectDescriptor,
        group: Option<&str>,
    ) -> Result<UpsertOutcome, AdtError> {
        let name = self.normalized(&desc.name);
        let group_name = match group {
            Some(g) => naming::normalize_group_name(g)?,
            None => naming::derive_group_name(&name),
        };

        let group_desc = ObjectDescriptor {
            name: group_name.clone(),
            description: Some(format!("Function group for {}", name)),
            package: desc.package.clone(),
            transport: desc.transport.clone(),
            source: None,
        };
        self.ensure_function_group(&group_desc).await?;

        let body = payloads::function_module_xml(
            &name,
            desc.description.as_deref().unwrap_or(&name),
        );
        let action = self
            .create(
                &paths::function_module_collection(&group_name),
                &body,
                payloads::MODULE_CONTENT_TYPE,
                desc.transport.as_deref(),
            )
            .await?;

        let module_path = paths::function_module_path(&group_name, &name);
        let (action, source_written) = self
            .apply_source(action, &module_path, &name, desc)
            .await?;

        Ok(UpsertOutcome {
            action,
            name,
            package: self.package_for(desc),
            transport: desc.transport.clone(),
            source_written,
            group: Some(group_name),
        })
    }

    /// Dispatch an upsert by kind.
    pub async fn create_or_update(
        &self,
        kind: ObjectKind,
        desc: &ObjectDescriptor,
        group: Option<&str>,
    ) -> Result<UpsertOutcome, AdtError> {
        match kind {
            ObjectKind::Class => self.create_or_update_class(desc).await,
            ObjectKind::Program => self.create_or_update_program(desc).await,
            ObjectKind::FunctionGroup => self.ensure_function_group(desc).await,
            ObjectKind::FunctionModule => {
                self.create_or_update_function_module(desc, group).await
            }
            other => Err(AdtError::UnsupportedKind {
                kind: format!("{} (creation)", other),
                supported: "class, program, function-group, function-module".to_string(),
            }),
        }
    }

    /// POST the creation payload; classify the already-exists rejection.
    async fn create(
        &self,
        collection: &str,
        body: &str,
        content_type: &str,
        transport: Option<&str>,
    ) -> Result<UpsertAction, AdtError> {
        let mut params = std::collections::HashMap::new();
        if let Some(corr) = transport {
            params.insert("corrNr".to_string(), corr.to_string());
        }

        match self
            .bridge
            .post(collection, body, content_type, "application/xml", params)
            .await
        {
            Ok(_) => Ok(UpsertAction::Created),
            Err(e) if is_already_exists(&e, &self.already_exists_marker) => {
                Ok(UpsertAction::AlreadyExisted)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create then handle source, sharing the tail of class/program
    /// upserts.
    async fn upsert_with_source(
        &self,
        kind: ObjectKind,
        name: &str,
        creation_body: &str,
        content_type: &str,
        desc: &ObjectDescriptor,
        package: String,
    ) -> Result<UpsertOutcome, AdtError> {
        let action = self
            .create(
                kind.collection_path(),
                creation_body,
                content_type,
                desc.transport.as_deref(),
            )
            .await?;

        let object_path = kind.object_path(name);
        let (action, source_written) =
            self.apply_source(action, &object_path, name, desc).await?;

        Ok(UpsertOutcome {
            action,
            name: name.to_string(),
            package,
            transport: desc.transport.clone(),
            source_written,
            group: None,
        })
    }

    /// Run the source/activation tail of an upsert.
    ///
    /// With source: the full mutation sequence, and an object that
    /// already existed is reported as `Updated`. Without source: a fresh
    /// creation is activated once so it does not linger inactive.
    async fn apply_source(
        &self,
        action: UpsertAction,
        object_path: &str,
        name: &str,
        desc: &ObjectDescriptor,
    ) -> Result<(UpsertAction, bool), AdtError> {
        match (&desc.source, action) {
            (Some(source), _) => {
                mutation::write_source_and_activate(
                    self.bridge.as_ref(),
                    object_path,
                    name,
                    source,
                    desc.transport.as_deref(),
                )
                .await?;
                let action = match action {
                    UpsertAction::Created => UpsertAction::Created,
                    _ => UpsertAction::Updated,
                };
                Ok((action, true))
            }
            (None, UpsertAction::Created) => {
                mutation::activate(self.bridge.as_ref(), object_path, name)
                    .await
                    .map_err(|e| AdtError::PartialMutation {
                        name: name.to_string(),
                        source: e,
                    })?;
                Ok((UpsertAction::Created, false))
            }
            (None, _) => Ok((UpsertAction::AlreadyExisted, false)),
        }
    }

    fn package_for(&self, desc: &ObjectDescriptor) -> String {
        desc.package
            .as_deref()
            .unwrap_or(&self.default_package)
            .to_uppercase()
    }
}
