//! Autonomous system number registry (`asn.json`)

use super::{BootstrapDocument, BootstrapRegistry, BootstrapTable, Matcher, RegistryCache, RegistrySlot};
use crate::error::Result;
use crate::format_error;
use crate::types::ObjectKind;
use chrono::{DateTime, Utc};

/// Inclusive ASN range; a single published number is a range of one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsnRange {
    pub start: u32,
    pub end: u32,
}

impl AsnRange {
    fn parse_bound(value: &str, raw: &str) -> Result<u32> {
        value
            .trim()
            .parse()
            .map_err(|_| format_error!("invalid ASN range '{}'", raw))
    }
}

impl Matcher for AsnRange {
    type Query = u32;

    fn parse(raw: &str) -> Result<Self> {
        let (start, end) = match raw.split_once('-') {
            Some((start, end)) => (Self::parse_bound(start, raw)?, Self::parse_bound(end, raw)?),
            None => {
                let asn = Self::parse_bound(raw, raw)?;
                (asn, asn)
            }
        };

        if start > end {
            return Err(format_error!("ASN range '{}' ends before it starts", raw));
        }

        Ok(Self { start, end })
    }

    fn matches(&self, asn: &u32) -> bool {
        (self.start..=self.end).contains(asn)
    }
}

/// Maps ASNs to the RDAP service of the registry that allocated them
#[derive(Debug, Clone)]
pub struct AsnRegistry {
    table: BootstrapTable<AsnRange>,
}

impl AsnRegistry {
    /// Service URL for `asn`
    pub fn resolve(&self, asn: u32) -> Option<&str> {
        self.table.find(&asn)
    }

    /// Service URL for a plain decimal ASN; anything else is not found
    pub fn resolve_str(&self, asn: &str) -> Option<&str> {
        asn.trim().parse().ok().and_then(|asn| self.resolve(asn))
    }

    pub fn table(&self) -> &BootstrapTable<AsnRange> {
        &self.table
    }
}

impl BootstrapRegistry for AsnRegistry {
    const KIND: ObjectKind = ObjectKind::Asn;

    fn from_document(document: &BootstrapDocument) -> Result<Self> {
        Ok(Self {
            table: BootstrapTable::from_document(document)?,
        })
    }

    fn slot(cache: &RegistryCache) -> &RegistrySlot<Self> {
        &cache.asn
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.table.published_at()
    }
}
