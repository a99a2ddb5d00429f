//! DNS registry (`dns.json`)

use super::{BootstrapDocument, BootstrapRegistry, BootstrapTable, ExactMatch, RegistryCache, RegistrySlot};
use crate::error::Result;
use crate::types::ObjectKind;
use chrono::{DateTime, Utc};

/// Maps DNS labels to the RDAP service of the responsible registry
#[derive(Debug, Clone)]
pub struct DomainRegistry {
    table: BootstrapTable<ExactMatch>,
}

impl DomainRegistry {
    /// Service URL for a label exactly as published (e.g. `com`)
    pub fn resolve_label(&self, label: &str) -> Option<&str> {
        self.table.find(label)
    }

    /// Service URL for a fully qualified name; the longest registered suffix wins
    pub fn resolve_fqdn(&self, name: &str) -> Option<&str> {
        let mut candidate = name;
        loop {
            if let Some(url) = self.resolve_label(candidate) {
                return Some(url);
            }
            match candidate.split_once('.') {
                Some((_, parent)) => candidate = parent,
                None => return None,
            }
        }
    }

    pub fn table(&self) -> &BootstrapTable<ExactMatch> {
        &self.table
    }
}

impl BootstrapRegistry for DomainRegistry {
    const KIND: ObjectKind = ObjectKind::Domain;

    fn from_document(document: &BootstrapDocument) -> Result<Self> {
        Ok(Self {
            table: BootstrapTable::from_document(document)?,
        })
    }

    fn slot(cache: &RegistryCache) -> &RegistrySlot<Self> {
        &cache.domain
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.table.published_at()
    }
}
