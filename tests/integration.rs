//! Integration tests for rdap-bootstrap

use rdap_bootstrap::{
    bootstrap::{AsnRegistry, DomainRegistry},
    response::RdapObject,
    ClientConfig, ObjectKind, ObjectReference, RdapClient, RdapError, RegistryCache,
    StaticTransport, Transport, IANA_BOOTSTRAP_URL,
};
use std::sync::Arc;
use std::time::Duration;

const MARIA_CC: &str = include_str!("fixtures/domain-maria-cc.json");

/// Transport serving the pinned bootstrap snapshots at their IANA locations
fn iana_snapshot() -> Arc<StaticTransport> {
    let documents = [
        ("asn.json", include_str!("fixtures/asn.json")),
        ("dns.json", include_str!("fixtures/dns.json")),
        ("ipv4.json", include_str!("fixtures/ipv4.json")),
        ("ipv6.json", include_str!("fixtures/ipv6.json")),
        ("object-tags.json", include_str!("fixtures/object-tags.json")),
    ];

    let transport = StaticTransport::new();
    for (name, body) in documents {
        transport.insert(format!("{}{}", IANA_BOOTSTRAP_URL, name), body);
    }
    Arc::new(transport)
}

fn client(transport: Arc<StaticTransport>) -> RdapClient {
    RdapClient::with_transport(transport, &ClientConfig::default())
}

#[tokio::test]
async fn test_client_creation() {
    let mut config = ClientConfig::default();
    config.timeout = Duration::from_secs(5);
    config.service_url = Some("https://rdap.example.net".to_string());

    let client = RdapClient::with_config(config).unwrap();
    assert_eq!(client.service_url(), Some("https://rdap.example.net/"));
    assert_eq!(client.cache().base_url(), IANA_BOOTSTRAP_URL);
}

#[tokio::test]
async fn test_resolve_every_kind() {
    let client = client(iana_snapshot());

    let cases = [
        (ObjectReference::new("AS34854"), "https://rdap.db.ripe.net/"),
        (ObjectReference::new("13335"), "https://rdap.arin.net/registry/"),
        (ObjectReference::new("ASN207908"), "https://rdap.db.ripe.net/"),
        (ObjectReference::new("45.151.215.1"), "https://rdap.db.ripe.net/"),
        (ObjectReference::new("8.8.8.0/24"), "https://rdap.arin.net/registry/"),
        (ObjectReference::new("2003::1"), "https://rdap.db.ripe.net/"),
        (ObjectReference::new("2600:1f18::/32"), "https://rdap.arin.net/registry/"),
        (ObjectReference::domain("example.com"), "https://rdap.verisign.com/com/v1/"),
        (ObjectReference::domain("maria.cc"), "https://tld-rdap.verisign.com/cc/v1/"),
        (ObjectReference::entity("EXAMPLE-RIPE"), "https://rdap.db.ripe.net/"),
    ];

    for (reference, expected) in cases {
        let service = client.resolve_service(&reference).await.unwrap();
        assert_eq!(service, expected, "{}", reference);
    }
}

#[tokio::test]
async fn test_object_urls() {
    let client = client(iana_snapshot());

    let url = client.object_url(&ObjectReference::new("AS34854")).await.unwrap();
    assert_eq!(url, "https://rdap.db.ripe.net/autnum/34854");

    let url = client.object_url(&ObjectReference::domain("maria.cc")).await.unwrap();
    assert_eq!(url, "https://tld-rdap.verisign.com/cc/v1/domain/maria.cc");

    let url = client.object_url(&ObjectReference::new("45.151.0.0/16")).await.unwrap();
    assert_eq!(url, "https://rdap.db.ripe.net/ip/45.151.0.0/16");
}

#[tokio::test]
async fn test_unresolvable_references() {
    let client = client(iana_snapshot());

    for identifier in ["example.com", "045.151.215.1"] {
        let err = client.resolve_service(&ObjectReference::new(identifier)).await.unwrap_err();
        assert!(matches!(err, RdapError::Classification { .. }), "{}", identifier);
    }

    for reference in [
        ObjectReference::new("AS64496"),
        ObjectReference::domain("example.invalid"),
        ObjectReference::entity("NOTAG"),
        ObjectReference::entity("EXAMPLE-NOPE"),
        ObjectReference::new("192.0.2.1"),
    ] {
        let err = client.resolve_service(&reference).await.unwrap_err();
        assert!(matches!(err, RdapError::UnknownService { .. }), "{}", reference);
    }
}

#[tokio::test]
async fn test_registries_fetched_once_per_kind() {
    let transport = iana_snapshot();
    let client = client(transport.clone());

    for asn in ["AS34854", "AS13335", "AS2043", "AS36864"] {
        client.resolve_service(&ObjectReference::new(asn)).await.unwrap();
    }
    assert_eq!(transport.fetch_count(), 1);

    client.resolve_service(&ObjectReference::domain("example.com")).await.unwrap();
    assert_eq!(transport.fetch_count(), 2);

    let cached = client.cache().cached::<AsnRegistry>(transport.id()).unwrap();
    assert_eq!(cached.resolve(34854), Some("https://rdap.db.ripe.net/"));
}

#[tokio::test]
async fn test_refresh_picks_up_new_snapshot() {
    let transport = iana_snapshot();
    let client = client(transport.clone());
    let reference = ObjectReference::domain("example.dev");

    assert_eq!(
        client.resolve_service(&reference).await.unwrap(),
        "https://www.registry.google/rdap/"
    );
    let before = client.cache().cached::<DomainRegistry>(transport.id()).unwrap();

    transport.insert(
        format!("{}dns.json", IANA_BOOTSTRAP_URL),
        r#"{"version":"1.0","publication":"2024-06-01T00:00:00Z","services":[[["dev"],["https://rdap.example.dev/"]]]}"#,
    );
    client.refresh(ObjectKind::Domain).await.unwrap();

    assert_eq!(
        client.resolve_service(&reference).await.unwrap(),
        "https://rdap.example.dev/"
    );
    assert_eq!(before.resolve_fqdn("example.dev"), Some("https://www.registry.google/rdap/"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_registry() {
    let transport = iana_snapshot();
    let client = client(transport.clone());
    let reference = ObjectReference::new("AS34854");

    client.resolve_service(&reference).await.unwrap();
    transport.insert(format!("{}asn.json", IANA_BOOTSTRAP_URL), r#"{"services": "broken"}"#);

    let err = client.refresh(ObjectKind::Asn).await.unwrap_err();
    assert!(matches!(err, RdapError::Format { url: Some(_), .. }));
    assert_eq!(
        client.resolve_service(&reference).await.unwrap(),
        "https://rdap.db.ripe.net/"
    );
}

#[tokio::test]
async fn test_query_domain() {
    let transport = iana_snapshot();
    transport.insert("https://tld-rdap.verisign.com/cc/v1/domain/maria.cc", MARIA_CC);
    let client = client(transport);

    let domain = client.query_domain(&ObjectReference::domain("maria.cc")).await.unwrap();
    assert_eq!(domain.ldh_name.as_deref(), Some("MARIA.CC"));
    assert_eq!(
        domain.common.registrar().and_then(|r| r.full_name()),
        Some("Staclar, Inc.")
    );
    assert!(domain.common.epp_status().contains(&"clientTransferProhibited"));
}

#[tokio::test]
async fn test_query_with_explicit_service_skips_bootstrap() {
    let transport = Arc::new(
        StaticTransport::new().with_document("https://rdap.example.net/domain/maria.cc", MARIA_CC),
    );
    let client = client(transport.clone());
    let reference = ObjectReference::domain("maria.cc").with_service("https://rdap.example.net");

    let object = client.query(&reference).await.unwrap();
    assert!(matches!(object, RdapObject::Domain(_)));
    assert_eq!(object.handle(), Some("187144380_DOMAIN_CC-VRSN"));
    assert_eq!(transport.fetch_count(), 1);
}

#[tokio::test]
async fn test_query_kind_mismatch() {
    let transport = iana_snapshot();
    let client = client(transport.clone());

    let err = client.query_entity(&ObjectReference::new("2003::1")).await.unwrap_err();
    assert!(matches!(
        err,
        RdapError::KindMismatch { expected: ObjectKind::Entity, actual: ObjectKind::Ipv6, .. }
    ));
    assert_eq!(transport.fetch_count(), 0);
}

#[tokio::test]
async fn test_missing_object_is_transport_error() {
    let client = client(iana_snapshot());

    let err = client.query(&ObjectReference::new("AS34854")).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_shared_cache_is_per_transport() {
    let cache = Arc::new(RegistryCache::new());
    let first = iana_snapshot();
    let second = iana_snapshot();

    let a = client(first.clone()).with_cache(Arc::clone(&cache));
    let b = client(second.clone()).with_cache(Arc::clone(&cache));

    a.resolve_service(&ObjectReference::new("AS34854")).await.unwrap();
    b.resolve_service(&ObjectReference::new("AS34854")).await.unwrap();
    a.resolve_service(&ObjectReference::new("AS13335")).await.unwrap();

    assert_eq!(first.fetch_count(), 1);
    assert_eq!(second.fetch_count(), 1);
    assert!(cache.cached::<AsnRegistry>(first.id()).is_some());
    assert!(cache.cached::<AsnRegistry>(second.id()).is_some());
}

#[test]
fn test_config_defaults() {
    let config = ClientConfig::default();
    assert_eq!(config.bootstrap_base_url, IANA_BOOTSTRAP_URL);
    assert!(config.service_url.is_none());
    assert!(config.user_agent.starts_with("rdap-bootstrap/"));
}

#[test]
fn test_resolution_from_sync_code() {
    let client = client(iana_snapshot());
    let service = tokio_test::block_on(client.resolve_service(&ObjectReference::new("AS2043")))
        .unwrap();
    assert_eq!(service, "https://rdap.apnic.net/");
}
