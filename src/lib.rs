//! RDAP Bootstrap - find the RDAP server responsible for an identifier
//!
//! Classifies identifiers (AS numbers, IPv4/IPv6 addresses and prefixes,
//! domain names, entity handles), resolves them to a service through the IANA
//! bootstrap registries (RFC 9224) and queries that service for the object.

pub mod bootstrap;
pub mod client;
pub mod error;
pub mod object;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use error::{RdapError, Result};
pub use types::{ClientConfig, ObjectKind, IANA_BOOTSTRAP_URL};

// Re-export main functionality
pub use bootstrap::RegistryCache;
pub use client::{HttpTransport, RdapClient, StaticTransport, Transport};
pub use object::{classify, ObjectReference};
pub use response::RdapObject;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
