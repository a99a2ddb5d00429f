//! RDAP client: bootstrap resolution and object queries

pub mod transport;

pub use transport::{HttpTransport, StaticTransport, Transport, TransportId, RDAP_ACCEPT};

use crate::bootstrap::{
    AsnRegistry, DomainRegistry, EntityRegistry, Ipv4Registry, Ipv6Registry, RegistryCache,
};
use crate::error::{RdapError, Result};
use crate::object::{normalize, ObjectReference};
use crate::response::{Autnum, Domain, Entity, IpNetwork, RdapObject};
use crate::types::{normalize_service_url, ClientConfig, ObjectKind};
use std::sync::Arc;
use std::time::Instant;

/// Resolves references to RDAP services and queries them
///
/// Clones share the transport and the registry cache.
#[derive(Clone)]
pub struct RdapClient {
    transport: Arc<dyn Transport>,
    cache: Arc<RegistryCache>,
    service_url: Option<String>,
}

impl RdapClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client over HTTP with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(transport, &config))
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            cache: Arc::new(RegistryCache::with_base_url(&config.bootstrap_base_url)),
            service_url: config.service_url.as_deref().map(normalize_service_url),
        }
    }

    /// Share a registry cache with other clients
    pub fn with_cache(mut self, cache: Arc<RegistryCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Fixed service used for every reference without its own
    pub fn service_url(&self) -> Option<&str> {
        self.service_url.as_deref()
    }

    pub fn cache(&self) -> &Arc<RegistryCache> {
        &self.cache
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Base URL of the RDAP service responsible for `reference`
    ///
    /// The reference's own service wins, then the client's fixed service.
    /// Only when neither is set is the bootstrap registry for the
    /// reference's kind consulted, fetching it on first use.
    pub async fn resolve_service(&self, reference: &ObjectReference) -> Result<String> {
        if let Some(service) = self.fixed_service(reference) {
            return Ok(service.to_string());
        }

        let kind = reference.kind()?;
        self.bootstrap_service(reference, kind).await
    }

    fn fixed_service<'a>(&'a self, reference: &'a ObjectReference) -> Option<&'a str> {
        reference.explicit_service().or(self.service_url.as_deref())
    }

    /// Service from the bootstrap registry of `kind`
    async fn bootstrap_service(&self, reference: &ObjectReference, kind: ObjectKind) -> Result<String> {
        let handle = normalize(reference.identifier(), kind);
        let transport = self.transport.as_ref();

        let service = match kind {
            ObjectKind::Asn => self
                .cache
                .get::<AsnRegistry>(transport)
                .await?
                .resolve_str(handle)
                .map(str::to_string),
            ObjectKind::Domain => self
                .cache
                .get::<DomainRegistry>(transport)
                .await?
                .resolve_fqdn(handle)
                .map(str::to_string),
            ObjectKind::Entity => self
                .cache
                .get::<EntityRegistry>(transport)
                .await?
                .resolve_handle(handle)
                .map(str::to_string),
            ObjectKind::Ipv4 => self
                .cache
                .get::<Ipv4Registry>(transport)
                .await?
                .resolve(handle)
                .map(str::to_string),
            ObjectKind::Ipv6 => self
                .cache
                .get::<Ipv6Registry>(transport)
                .await?
                .resolve(handle)
                .map(str::to_string),
        };

        match service {
            Some(service) => {
                tracing::debug!(identifier = %reference, kind = %kind, service = %service, "Resolved RDAP service");
                Ok(service)
            }
            None => {
                tracing::debug!(identifier = %reference, kind = %kind, "No RDAP service in bootstrap registry");
                Err(RdapError::unknown_service(reference.identifier(), Some(kind)))
            }
        }
    }

    /// Query URL of `reference` on its resolved service
    pub async fn object_url(&self, reference: &ObjectReference) -> Result<String> {
        let kind = reference.kind()?;
        self.object_url_as(reference, kind).await
    }

    async fn object_url_as(&self, reference: &ObjectReference, kind: ObjectKind) -> Result<String> {
        let service = match self.fixed_service(reference) {
            Some(service) => service.to_string(),
            None => self.bootstrap_service(reference, kind).await?,
        };
        Ok(reference.url_for(&service, kind))
    }

    /// Fetch and deserialize the object `reference` points to
    pub async fn query(&self, reference: &ObjectReference) -> Result<RdapObject> {
        let kind = reference.kind()?;
        self.query_as(reference, kind).await
    }

    async fn query_as(&self, reference: &ObjectReference, kind: ObjectKind) -> Result<RdapObject> {
        let url = self.object_url_as(reference, kind).await?;
        self.query_url(&url, kind).await
    }

    /// Fetch an already resolved object URL and deserialize it as `kind`
    pub async fn query_url(&self, url: &str, kind: ObjectKind) -> Result<RdapObject> {
        let start_time = Instant::now();

        let body = self.transport.get(url).await?;
        let object = RdapObject::from_json(kind, &body)?;

        tracing::debug!(
            url = %url,
            kind = %kind,
            handle = ?object.handle(),
            duration_ms = %start_time.elapsed().as_millis(),
            "RDAP query completed"
        );

        Ok(object)
    }

    pub async fn query_autnum(&self, reference: &ObjectReference) -> Result<Autnum> {
        let kind = expect_kind(reference, &[ObjectKind::Asn])?;
        match self.query_as(reference, kind).await? {
            RdapObject::Autnum(autnum) => Ok(autnum),
            other => Err(unexpected_object(&other)),
        }
    }

    pub async fn query_domain(&self, reference: &ObjectReference) -> Result<Domain> {
        let kind = expect_kind(reference, &[ObjectKind::Domain])?;
        match self.query_as(reference, kind).await? {
            RdapObject::Domain(domain) => Ok(domain),
            other => Err(unexpected_object(&other)),
        }
    }

    pub async fn query_entity(&self, reference: &ObjectReference) -> Result<Entity> {
        let kind = expect_kind(reference, &[ObjectKind::Entity])?;
        match self.query_as(reference, kind).await? {
            RdapObject::Entity(entity) => Ok(entity),
            other => Err(unexpected_object(&other)),
        }
    }

    /// Query an IPv4 or IPv6 network
    pub async fn query_ip_network(&self, reference: &ObjectReference) -> Result<IpNetwork> {
        let kind = expect_kind(reference, &[ObjectKind::Ipv4, ObjectKind::Ipv6])?;
        match self.query_as(reference, kind).await? {
            RdapObject::IpNetwork(network) => Ok(network),
            other => Err(unexpected_object(&other)),
        }
    }

    /// Re-fetch the bootstrap registry for `kind`
    ///
    /// The previous registry stays cached if the refresh fails.
    pub async fn refresh(&self, kind: ObjectKind) -> Result<()> {
        let transport = self.transport.as_ref();
        match kind {
            ObjectKind::Asn => self.cache.refresh::<AsnRegistry>(transport).await.map(drop),
            ObjectKind::Domain => self.cache.refresh::<DomainRegistry>(transport).await.map(drop),
            ObjectKind::Entity => self.cache.refresh::<EntityRegistry>(transport).await.map(drop),
            ObjectKind::Ipv4 => self.cache.refresh::<Ipv4Registry>(transport).await.map(drop),
            ObjectKind::Ipv6 => self.cache.refresh::<Ipv6Registry>(transport).await.map(drop),
        }
    }
}

fn expect_kind(reference: &ObjectReference, allowed: &[ObjectKind]) -> Result<ObjectKind> {
    let actual = reference.kind()?;
    if allowed.contains(&actual) {
        Ok(actual)
    } else {
        Err(RdapError::kind_mismatch(reference.identifier(), allowed[0], actual))
    }
}

fn unexpected_object(object: &RdapObject) -> RdapError {
    RdapError::internal(format!("Unexpected RDAP object {:?}", object.handle()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOTSTRAP: &str = "https://bootstrap.test/";

    fn config() -> ClientConfig {
        ClientConfig {
            bootstrap_base_url: BOOTSTRAP.to_string(),
            ..ClientConfig::default()
        }
    }

    fn transport() -> Arc<StaticTransport> {
        Arc::new(
            StaticTransport::new()
                .with_document(
                    format!("{}asn.json", BOOTSTRAP),
                    include_str!("../../tests/fixtures/asn.json"),
                )
                .with_document(
                    format!("{}ipv4.json", BOOTSTRAP),
                    include_str!("../../tests/fixtures/ipv4.json"),
                ),
        )
    }

    #[tokio::test]
    async fn test_resolve_from_registry() {
        let transport = transport();
        let client = RdapClient::with_transport(transport.clone(), &config());

        let service = client.resolve_service(&ObjectReference::new("AS34854")).await.unwrap();
        assert_eq!(service, "https://rdap.db.ripe.net/");

        let url = client.object_url(&ObjectReference::new("AS13335")).await.unwrap();
        assert_eq!(url, "https://rdap.arin.net/registry/autnum/13335");
        assert_eq!(transport.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_service_precedence() {
        let transport = transport();
        let config = ClientConfig {
            service_url: Some("https://fixed.test".to_string()),
            ..config()
        };
        let client = RdapClient::with_transport(transport.clone(), &config);
        assert_eq!(client.service_url(), Some("https://fixed.test/"));

        let reference = ObjectReference::new("AS34854");
        assert_eq!(client.resolve_service(&reference).await.unwrap(), "https://fixed.test/");

        let reference = reference.with_service("https://own.test/");
        assert_eq!(client.resolve_service(&reference).await.unwrap(), "https://own.test/");
        assert_eq!(transport.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_service() {
        let client = RdapClient::with_transport(transport(), &config());
        let err = client.resolve_service(&ObjectReference::new("64496")).await.unwrap_err();
        assert!(matches!(
            err,
            RdapError::UnknownService { kind: Some(ObjectKind::Asn), .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_document_is_transport_error() {
        let client = RdapClient::with_transport(transport(), &config());
        let err = client
            .resolve_service(&ObjectReference::domain("example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_kind_mismatch_before_network() {
        let transport = transport();
        let client = RdapClient::with_transport(transport.clone(), &config());

        let err = client.query_domain(&ObjectReference::new("AS1234")).await.unwrap_err();
        match err {
            RdapError::KindMismatch { expected, actual, .. } => {
                assert_eq!(expected, ObjectKind::Domain);
                assert_eq!(actual, ObjectKind::Asn);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = client
            .query_autnum(&ObjectReference::new("1.1.1.1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RdapError::KindMismatch { .. }));
        assert_eq!(transport.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_query_ip_network() {
        let transport = transport();
        transport.insert(
            "https://rdap.db.ripe.net/ip/45.151.215.1",
            r#"{"objectClassName":"ip network","handle":"45.151.214.0 - 45.151.215.255","startAddress":"45.151.214.0","endAddress":"45.151.215.255","ipVersion":"v4"}"#,
        );
        let client = RdapClient::with_transport(transport, &config());

        let network = client
            .query_ip_network(&ObjectReference::new("45.151.215.1"))
            .await
            .unwrap();
        assert_eq!(network.start_address.as_deref(), Some("45.151.214.0"));
    }

    #[tokio::test]
    async fn test_query_url_after_single_resolution() {
        let transport = transport();
        transport.insert(
            "https://rdap.arin.net/registry/autnum/13335",
            r#"{"objectClassName":"autnum","handle":"AS13335","startAutnum":13335,"endAutnum":13335}"#,
        );
        let client = RdapClient::with_transport(transport.clone(), &config());
        let reference = ObjectReference::new("AS13335");

        let url = client.object_url(&reference).await.unwrap();
        let object = client.query_url(&url, reference.kind().unwrap()).await.unwrap();

        assert_eq!(object.handle(), Some("AS13335"));
        // one bootstrap document, one object
        assert_eq!(transport.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_query_url_does_not_bootstrap() {
        let transport = Arc::new(StaticTransport::new().with_document(
            "https://rdap.example/entity/EXAMPLE-RIPE",
            r#"{"objectClassName":"entity","handle":"EXAMPLE-RIPE","roles":["registrant"]}"#,
        ));
        let client = RdapClient::with_transport(transport.clone(), &config());

        let object = client
            .query_url("https://rdap.example/entity/EXAMPLE-RIPE", ObjectKind::Entity)
            .await
            .unwrap();
        assert!(matches!(object, RdapObject::Entity(ref entity) if entity.roles == ["registrant"]));
        assert_eq!(transport.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_typed_query_uses_fixed_service() {
        let transport = Arc::new(StaticTransport::new().with_document(
            "https://fixed.test/autnum/64496",
            r#"{"objectClassName":"autnum","handle":"AS64496","name":"EXAMPLE"}"#,
        ));
        let config = ClientConfig {
            service_url: Some("https://fixed.test".to_string()),
            ..config()
        };
        let client = RdapClient::with_transport(transport.clone(), &config);

        let autnum = client.query_autnum(&ObjectReference::new("ASN64496")).await.unwrap();
        assert_eq!(autnum.name.as_deref(), Some("EXAMPLE"));
        assert_eq!(transport.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_shared_cache() {
        let transport = transport();
        let first = RdapClient::with_transport(transport.clone(), &config());
        let second = RdapClient::with_transport(transport.clone(), &config())
            .with_cache(Arc::clone(first.cache()));

        first.resolve_service(&ObjectReference::new("AS34854")).await.unwrap();
        second.resolve_service(&ObjectReference::new("AS13335")).await.unwrap();
        assert_eq!(transport.fetch_count(), 1);

        second.refresh(ObjectKind::Asn).await.unwrap();
        assert_eq!(transport.fetch_count(), 2);
    }
}
