//! Per-transport cache of bootstrap registries

use super::{
    fetch_document, AsnRegistry, BootstrapRegistry, DomainRegistry, EntityRegistry, Ipv4Registry,
    Ipv6Registry,
};
use crate::client::{Transport, TransportId};
use crate::error::Result;
use crate::types::{normalize_service_url, ObjectKind, IANA_BOOTSTRAP_URL};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Registries of one kind, keyed by the transport that fetched them
///
/// Registries are built completely before they are published, so a reader
/// either sees the previous registry or the new one, never a partial one.
pub struct RegistrySlot<R> {
    registries: RwLock<HashMap<TransportId, Arc<R>>>,
}

impl<R> RegistrySlot<R> {
    fn new() -> Self {
        Self {
            registries: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, transport: TransportId) -> Option<Arc<R>> {
        self.registries.read().get(&transport).cloned()
    }

    fn publish(&self, transport: TransportId, registry: Arc<R>) -> Option<Arc<R>> {
        self.registries.write().insert(transport, registry)
    }

    fn remove(&self, transport: TransportId) -> Option<Arc<R>> {
        self.registries.write().remove(&transport)
    }

    fn clear(&self) {
        self.registries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.registries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.read().is_empty()
    }
}

/// Lazily populated bootstrap registries, one slot per object kind
///
/// Entries are built on first use and replaced only by an explicit refresh;
/// nothing expires on its own. Two tasks missing the same entry at once may
/// both fetch the document; the last one to finish is kept.
pub struct RegistryCache {
    base_url: String,
    pub(super) asn: RegistrySlot<AsnRegistry>,
    pub(super) domain: RegistrySlot<DomainRegistry>,
    pub(super) entity: RegistrySlot<EntityRegistry>,
    pub(super) ipv4: RegistrySlot<Ipv4Registry>,
    pub(super) ipv6: RegistrySlot<Ipv6Registry>,
}

impl RegistryCache {
    /// Cache backed by the IANA bootstrap service
    pub fn new() -> Self {
        Self::with_base_url(IANA_BOOTSTRAP_URL)
    }

    /// Cache backed by a mirror of the IANA bootstrap documents
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_service_url(base_url),
            asn: RegistrySlot::new(),
            domain: RegistrySlot::new(),
            entity: RegistrySlot::new(),
            ipv4: RegistrySlot::new(),
            ipv6: RegistrySlot::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Location of the bootstrap document for `kind`
    pub fn document_url(&self, kind: ObjectKind) -> String {
        format!("{}{}", self.base_url, kind.bootstrap_document())
    }

    /// Registry already built for `transport`, without fetching
    pub fn cached<R: BootstrapRegistry>(&self, transport: TransportId) -> Option<Arc<R>> {
        R::slot(self).get(transport)
    }

    /// Registry for `transport`, fetching the document on first use
    pub async fn get<R: BootstrapRegistry>(&self, transport: &dyn Transport) -> Result<Arc<R>> {
        if let Some(registry) = self.cached::<R>(transport.id()) {
            tracing::debug!(kind = %R::KIND, "Bootstrap registry cache hit");
            return Ok(registry);
        }

        self.refresh::<R>(transport).await
    }

    /// Fetch the document again and replace the cached registry
    ///
    /// On failure the previous registry, if any, stays in place. Callers still
    /// holding the old registry keep a consistent view of the old data.
    pub async fn refresh<R: BootstrapRegistry>(&self, transport: &dyn Transport) -> Result<Arc<R>> {
        let url = self.document_url(R::KIND);
        let start_time = Instant::now();

        let built = match fetch_document(transport, &url).await {
            Ok(document) => R::from_document(&document).map_err(|e| e.with_url(&url)),
            Err(e) => Err(e),
        };

        match built {
            Ok(registry) => {
                let registry = Arc::new(registry);
                let replaced = R::slot(self).publish(transport.id(), Arc::clone(&registry));

                tracing::info!(
                    kind = %R::KIND,
                    url = %url,
                    entries = %registry.len(),
                    publication = ?registry.published_at(),
                    replaced = replaced.is_some(),
                    duration_ms = %start_time.elapsed().as_millis(),
                    "Bootstrap registry loaded"
                );

                Ok(registry)
            }
            Err(e) => {
                tracing::warn!(
                    kind = %R::KIND,
                    url = %url,
                    error = %e,
                    keeps_previous = self.cached::<R>(transport.id()).is_some(),
                    "Bootstrap registry refresh failed"
                );
                Err(e)
            }
        }
    }

    /// Drop the registry built for `transport`; returns whether one existed
    pub fn invalidate<R: BootstrapRegistry>(&self, transport: TransportId) -> bool {
        R::slot(self).remove(transport).is_some()
    }

    /// Drop every cached registry of every kind
    pub fn clear(&self) {
        self.asn.clear();
        self.domain.clear();
        self.entity.clear();
        self.ipv4.clear();
        self.ipv6.clear();
    }
}

impl Default for RegistryCache {
    fn default() -> Self {
        Self::new()
    }
}
