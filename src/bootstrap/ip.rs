//! IPv4 and IPv6 registries (`ipv4.json`, `ipv6.json`)

use super::{BootstrapDocument, BootstrapRegistry, BootstrapTable, Matcher, RegistryCache, RegistrySlot};
use crate::error::Result;
use crate::format_error;
use crate::types::ObjectKind;
use chrono::{DateTime, Utc};
use std::net::{Ipv4Addr, Ipv6Addr};

fn split_prefix(cidr: &str) -> (&str, Option<&str>) {
    match cidr.trim().split_once('/') {
        Some((address, len)) => (address, Some(len)),
        None => (cidr.trim(), None),
    }
}

fn parse_len(len: Option<&str>, max: u8) -> Option<u8> {
    match len {
        None => Some(max),
        Some(len) => len.parse::<u8>().ok().filter(|len| *len <= max),
    }
}

fn mask_v4(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        u32::MAX << (32 - len)
    }
}

fn mask_v6(len: u8) -> u128 {
    if len == 0 {
        0
    } else {
        u128::MAX << (128 - len)
    }
}

/// IPv4 network in CIDR notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Prefix {
    network: u32,
    len: u8,
}

impl Ipv4Prefix {
    /// Parse `a.b.c.d` or `a.b.c.d/n`; host bits are cleared
    pub fn from_cidr(cidr: &str) -> Option<Self> {
        let (address, len) = split_prefix(cidr);
        let address: Ipv4Addr = address.parse().ok()?;
        let len = parse_len(len, 32)?;
        Some(Self {
            network: u32::from(address) & mask_v4(len),
            len,
        })
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.network)
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        u32::from(address) & mask_v4(self.len) == self.network
    }
}

impl Matcher for Ipv4Prefix {
    type Query = Ipv4Addr;

    fn parse(raw: &str) -> Result<Self> {
        Self::from_cidr(raw).ok_or_else(|| format_error!("invalid IPv4 prefix '{}'", raw))
    }

    fn matches(&self, address: &Ipv4Addr) -> bool {
        self.contains(*address)
    }
}

/// IPv6 network in CIDR notation; a bare address is a /128
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Prefix {
    network: u128,
    len: u8,
}

impl Ipv6Prefix {
    /// Parse `addr` or `addr/n`; host bits are cleared
    pub fn from_cidr(cidr: &str) -> Option<Self> {
        let (address, len) = split_prefix(cidr);
        let address: Ipv6Addr = address.parse().ok()?;
        let len = parse_len(len, 128)?;
        Some(Self {
            network: u128::from(address) & mask_v6(len),
            len,
        })
    }

    pub fn network(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.network)
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Whether `other` lies entirely inside this network
    pub fn contains(&self, other: &Ipv6Prefix) -> bool {
        other.len >= self.len && other.network & mask_v6(self.len) == self.network
    }
}

impl Matcher for Ipv6Prefix {
    type Query = Ipv6Prefix;

    fn parse(raw: &str) -> Result<Self> {
        Self::from_cidr(raw).ok_or_else(|| format_error!("invalid IPv6 prefix '{}'", raw))
    }

    fn matches(&self, query: &Ipv6Prefix) -> bool {
        self.contains(query)
    }
}

/// Maps IPv4 addresses to the RDAP service of the allocating registry
#[derive(Debug, Clone)]
pub struct Ipv4Registry {
    table: BootstrapTable<Ipv4Prefix>,
}

impl Ipv4Registry {
    /// Service URL for an address or subnet
    ///
    /// A subnet is resolved by its network address alone: queried subnets are
    /// assumed not to straddle two allocations.
    pub fn resolve(&self, ip: &str) -> Option<&str> {
        let (address, _) = split_prefix(ip);
        let address: Ipv4Addr = address.parse().ok()?;
        self.table.find(&address)
    }

    pub fn table(&self) -> &BootstrapTable<Ipv4Prefix> {
        &self.table
    }
}

impl BootstrapRegistry for Ipv4Registry {
    const KIND: ObjectKind = ObjectKind::Ipv4;

    fn from_document(document: &BootstrapDocument) -> Result<Self> {
        Ok(Self {
            table: BootstrapTable::from_document(document)?,
        })
    }

    fn slot(cache: &RegistryCache) -> &RegistrySlot<Self> {
        &cache.ipv4
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.table.published_at()
    }
}

/// Maps IPv6 addresses and prefixes to the RDAP service of the allocating registry
#[derive(Debug, Clone)]
pub struct Ipv6Registry {
    table: BootstrapTable<Ipv6Prefix>,
}

impl Ipv6Registry {
    /// Service URL for the registry prefix that fully contains `ip`
    pub fn resolve(&self, ip: &str) -> Option<&str> {
        let query = Ipv6Prefix::from_cidr(ip)?;
        self.table.find(&query)
    }

    pub fn table(&self) -> &BootstrapTable<Ipv6Prefix> {
        &self.table
    }
}

impl BootstrapRegistry for Ipv6Registry {
    const KIND: ObjectKind = ObjectKind::Ipv6;

    fn from_document(document: &BootstrapDocument) -> Result<Self> {
        Ok(Self {
            table: BootstrapTable::from_document(document)?,
        })
    }

    fn slot(cache: &RegistryCache) -> &RegistrySlot<Self> {
        &cache.ipv6
    }

    fn len(&self) -> usize {
        self.table.len()
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.table.published_at()
    }
}
