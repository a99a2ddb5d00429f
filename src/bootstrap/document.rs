//! Loader for IANA bootstrap documents (RFC 9224)

use crate::client::Transport;
use crate::error::Result;
use crate::format_error;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A parsed bootstrap document
///
/// Every service is a list of string arrays. Number, address and DNS documents
/// carry `[matchers, urls]`; the object tags document carries
/// `[contacts, tags, urls]`. The matcher list is always second to last.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapDocument {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publication: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    services: Vec<Vec<Vec<String>>>,
}

/// One service of a bootstrap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord<'a> {
    pub matchers: &'a [String],
    /// First listed URL; mirrors are ignored
    pub service_url: &'a str,
}

impl BootstrapDocument {
    /// Parse a document body
    pub fn parse(text: &str) -> Result<Self> {
        let document: Self = serde_json::from_str(text)
            .map_err(|e| format_error!("not a bootstrap document: {}", e))?;
        document.records()?;
        Ok(document)
    }

    /// Service records in document order
    pub fn records(&self) -> Result<Vec<ServiceRecord<'_>>> {
        self.services
            .iter()
            .enumerate()
            .map(|(index, service)| {
                if service.len() < 2 {
                    return Err(format_error!(
                        "service #{} has {} arrays, expected at least 2",
                        index,
                        service.len()
                    ));
                }

                let matchers = &service[service.len() - 2];
                let service_url = service[service.len() - 1]
                    .first()
                    .ok_or_else(|| format_error!("service #{} lists no URLs", index))?;

                Ok(ServiceRecord {
                    matchers,
                    service_url,
                })
            })
            .collect()
    }

    /// Publication timestamp, when present and well formed
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.publication
            .as_deref()
            .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

/// Fetch and parse the bootstrap document at `url`
///
/// No retries happen here; a transport failure is returned as is.
pub async fn fetch_document(transport: &dyn Transport, url: &str) -> Result<BootstrapDocument> {
    let body = transport.get(url).await?;
    BootstrapDocument::parse(&body).map_err(|e| e.with_url(url))
}
