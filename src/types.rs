//! Core types and configuration for rdap-bootstrap

use crate::error::{RdapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default location of the IANA bootstrap documents
pub const IANA_BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/";

/// Kind of object an identifier refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Asn,
    Domain,
    Entity,
    Ipv4,
    Ipv6,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Asn,
        ObjectKind::Domain,
        ObjectKind::Entity,
        ObjectKind::Ipv4,
        ObjectKind::Ipv6,
    ];

    /// Path segment of the RDAP lookup for this kind (RFC 9082)
    pub fn path_segment(&self) -> &'static str {
        match self {
            ObjectKind::Asn => "autnum",
            ObjectKind::Domain => "domain",
            ObjectKind::Entity => "entity",
            ObjectKind::Ipv4 | ObjectKind::Ipv6 => "ip",
        }
    }

    /// File name of the IANA bootstrap document covering this kind
    pub fn bootstrap_document(&self) -> &'static str {
        match self {
            ObjectKind::Asn => "asn.json",
            ObjectKind::Domain => "dns.json",
            ObjectKind::Entity => "object-tags.json",
            ObjectKind::Ipv4 => "ipv4.json",
            ObjectKind::Ipv6 => "ipv6.json",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Asn => write!(f, "asn"),
            ObjectKind::Domain => write!(f, "domain"),
            ObjectKind::Entity => write!(f, "entity"),
            ObjectKind::Ipv4 => write!(f, "ipv4"),
            ObjectKind::Ipv6 => write!(f, "ipv6"),
        }
    }
}

impl FromStr for ObjectKind {
    type Err = RdapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asn" | "autnum" => Ok(ObjectKind::Asn),
            "domain" | "dns" => Ok(ObjectKind::Domain),
            "entity" => Ok(ObjectKind::Entity),
            "ipv4" | "ip4" => Ok(ObjectKind::Ipv4),
            "ipv6" | "ip6" => Ok(ObjectKind::Ipv6),
            other => Err(crate::config_error!(
                "Unknown object type '{}'. Supported types: asn, domain, entity, ipv4, ipv6",
                other
            )),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
    /// Fixed RDAP server; when set, bootstrap resolution is skipped
    pub service_url: Option<String>,
    pub bootstrap_base_url: String,
    pub connection_pool_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("rdap-bootstrap/{}", crate::VERSION),
            service_url: None,
            bootstrap_base_url: IANA_BOOTSTRAP_URL.to_string(),
            connection_pool_size: 4,
        }
    }
}

impl ClientConfig {
    /// Build configuration from `RDAP_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a dotenv file without touching the process environment
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let mut vars = HashMap::new();
        for item in dotenv::from_path_iter(path)? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secs) = lookup("RDAP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                crate::config_error!("RDAP_TIMEOUT_SECS must be a number of seconds, got '{}'", secs)
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(size) = lookup("RDAP_POOL_SIZE") {
            config.connection_pool_size = size.trim().parse().map_err(|_| {
                crate::config_error!("RDAP_POOL_SIZE must be a positive number, got '{}'", size)
            })?;
        }

        if let Some(agent) = lookup("RDAP_USER_AGENT").filter(|s| !s.trim().is_empty()) {
            config.user_agent = agent.trim().to_string();
        }

        if let Some(url) = lookup("RDAP_SERVICE_URL").filter(|s| !s.trim().is_empty()) {
            config.service_url = Some(normalize_service_url(url.trim()));
        }

        if let Some(url) = lookup("RDAP_BOOTSTRAP_URL").filter(|s| !s.trim().is_empty()) {
            config.bootstrap_base_url = normalize_service_url(url.trim());
        }

        Ok(config)
    }
}

/// Ensure a base URL ends with a slash so path segments can be appended
pub fn normalize_service_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
