//! References to RDAP objects

use super::classifier::{classify, normalize};
use crate::error::{RdapError, Result};
use crate::types::{normalize_service_url, ObjectKind};

/// An identifier to look up, with an optional explicit kind and service
///
/// The kind, the normalized handle and the query URL are derived on demand,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    identifier: String,
    kind: Option<ObjectKind>,
    service: Option<String>,
}

impl ObjectReference {
    /// Reference whose kind is inferred from the identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into().trim().to_string(),
            kind: None,
            service: None,
        }
    }

    /// Reference to a domain name
    pub fn domain(name: impl Into<String>) -> Self {
        Self::new(name).with_kind(ObjectKind::Domain)
    }

    /// Reference to an entity handle
    pub fn entity(handle: impl Into<String>) -> Self {
        Self::new(handle).with_kind(ObjectKind::Entity)
    }

    /// Force the kind, regardless of what the identifier looks like
    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Query `service` directly instead of bootstrapping
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = Some(normalize_service_url(service));
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn explicit_kind(&self) -> Option<ObjectKind> {
        self.kind
    }

    pub fn explicit_service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn kind(&self) -> Result<ObjectKind> {
        classify(&self.identifier, self.kind)
    }

    /// Identifier used for registry lookups and in the query path
    ///
    /// Unclassifiable identifiers are returned unchanged.
    pub fn handle(&self) -> &str {
        match self.kind() {
            Ok(kind) => normalize(&self.identifier, kind),
            Err(_) => &self.identifier,
        }
    }

    /// The explicit service; without a client there is nothing to bootstrap from
    pub fn service(&self) -> Result<&str> {
        self.service
            .as_deref()
            .ok_or_else(|| RdapError::unknown_service(&self.identifier, self.kind().ok()))
    }

    /// Query URL of this object on `service`
    ///
    /// The handle is appended verbatim so CIDR notation keeps its `/`.
    pub fn object_url(&self, service: &str) -> Result<String> {
        let kind = self.kind()?;
        Ok(self.url_for(service, kind))
    }

    /// Query URL for an already classified reference
    pub(crate) fn url_for(&self, service: &str, kind: ObjectKind) -> String {
        let url = format!(
            "{}{}/{}",
            normalize_service_url(service),
            kind.path_segment(),
            normalize(&self.identifier, kind)
        );
        tracing::debug!(identifier = %self.identifier, kind = %kind, url = %url, "Built object URL");
        url
    }

    /// Query URL on the explicit service
    pub fn explicit_object_url(&self) -> Result<String> {
        self.object_url(self.service()?)
    }
}

impl std::fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier)
    }
}
