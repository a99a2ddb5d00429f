//! Object tag registry (`object-tags.json`, RFC 8521)

use super::{BootstrapDocument, BootstrapRegistry, BootstrapTable, ExactMatch, RegistryCache, RegistrySlot};
use crate::error::Result;
use crate::types::ObjectKind;
use chrono::{DateTime, Utc};

/// Maps entity handle tags (`...-RIPE`) to the RDAP service that issued them
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    table: BootstrapTable<ExactMatch>,
}

impl EntityRegistry {
    /// Service URL for a tag exactly as published (tags are upper-case)
    pub fn resolve_tag(&self, tag: &str) -> Option<&str> {
        self.table.find(tag)
    }

    /// Service URL for a handle, keyed by the text after its last `-`
    ///
    /// Handles without a `-` carry no tag and are never looked up.
    pub fn resolve_handle(&self, handle: &str) -> Option<&str> {
        let (_, tag) = handle.rsplit_once('-')?;
        self.resolve_tag(tag)
    }

    pub fn table(&self) -> &BootstrapTable<ExactMatch> {
        &self.table
    }
}

impl BootstrapRegistry for EntityRegistry {
    const KIND: ObjectKind = ObjectKind::Entity;

    fn from_document(document: &BootstrapDocument) -> Result<Self> {
        Ok(Self {
            table: BootstrapTable::from_document(document)?,
        })
    }

    fn slot(cache: &RegistryCache) -> &RegistrySlot<Self> {
        &cache.entity
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.table.published_at()
    }
}
