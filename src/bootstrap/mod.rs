//! IANA bootstrap registries (RFC 9224)
//!
//! Every kind of identifier is resolved through a table of
//! `(matcher, service URL)` entries built from one bootstrap document. The
//! tables differ only in their match strategy, so they share one generic
//! [`BootstrapTable`] parameterized by a [`Matcher`].

pub mod asn;
pub mod cache;
pub mod document;
pub mod domain;
pub mod entity;
pub mod ip;

pub use asn::{AsnRange, AsnRegistry};
pub use cache::{RegistryCache, RegistrySlot};
pub use document::{fetch_document, BootstrapDocument, ServiceRecord};
pub use domain::DomainRegistry;
pub use entity::EntityRegistry;
pub use ip::{Ipv4Prefix, Ipv4Registry, Ipv6Prefix, Ipv6Registry};

use crate::error::Result;
use crate::types::ObjectKind;
use chrono::{DateTime, Utc};

/// Match strategy of a bootstrap table
pub trait Matcher: Sized {
    /// What a lookup is tested against
    type Query: ?Sized;

    /// Parse one matcher string of a bootstrap document
    fn parse(raw: &str) -> Result<Self>;

    /// Whether this matcher covers `query`
    fn matches(&self, query: &Self::Query) -> bool;
}

/// Exact, case-sensitive match on a DNS label or an object tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactMatch(String);

impl ExactMatch {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Matcher for ExactMatch {
    type Query = str;

    fn parse(raw: &str) -> Result<Self> {
        Ok(Self(raw.to_string()))
    }

    fn matches(&self, query: &str) -> bool {
        self.0 == query
    }
}

/// One matcher of a bootstrap document and the service responsible for it
#[derive(Debug, Clone)]
pub struct BootstrapEntry<M> {
    pub matcher: M,
    pub service_url: String,
}

/// Immutable, ordered lookup table built from a bootstrap document
#[derive(Debug, Clone)]
pub struct BootstrapTable<M> {
    entries: Vec<BootstrapEntry<M>>,
    published_at: Option<DateTime<Utc>>,
}

impl<M: Matcher> BootstrapTable<M> {
    /// Build the table; any matcher that fails to parse fails the whole table
    pub fn from_document(document: &BootstrapDocument) -> Result<Self> {
        let mut entries = Vec::new();
        for record in document.records()? {
            for raw in record.matchers {
                entries.push(BootstrapEntry {
                    matcher: M::parse(raw)?,
                    service_url: record.service_url.to_string(),
                });
            }
        }

        Ok(Self {
            entries,
            published_at: document.published_at(),
        })
    }

    /// Service URL of the first entry, in document order, that covers `query`
    pub fn find(&self, query: &M::Query) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.matcher.matches(query))
            .map(|entry| entry.service_url.as_str())
    }

    pub fn entries(&self) -> &[BootstrapEntry<M>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }
}

/// A kind-specific registry that can live in a [`RegistryCache`]
pub trait BootstrapRegistry: Sized + Send + Sync + 'static {
    /// Kind of object this registry resolves
    const KIND: ObjectKind;

    fn from_document(document: &BootstrapDocument) -> Result<Self>;

    /// The cache slot holding registries of this type
    fn slot(cache: &RegistryCache) -> &RegistrySlot<Self>;

    /// Number of matcher entries
    fn len(&self) -> usize;

    fn published_at(&self) -> Option<DateTime<Utc>>;
}
