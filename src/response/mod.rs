//! RDAP response structures (RFC 9083)
//!
//! Plain data carriers: unknown members are ignored and missing arrays
//! default to empty.

pub mod status;

pub use status::epp_status;

use crate::error::{RdapError, Result};
use crate::types::ObjectKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Members shared by every object class
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectCommon {
    #[serde(default)]
    pub object_class_name: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default)]
    pub remarks: Vec<Notice>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub port43: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub notices: Vec<Notice>,
    #[serde(default)]
    pub rdap_conformance: Vec<String>,
}

impl ObjectCommon {
    /// First directly attached entity carrying `role`
    pub fn entity_by_role(&self, role: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.roles.iter().any(|r| r == role))
    }

    pub fn registrant(&self) -> Option<&Entity> {
        self.entity_by_role("registrant")
    }

    pub fn registrar(&self) -> Option<&Entity> {
        self.entity_by_role("registrar")
    }

    pub fn technical_contact(&self) -> Option<&Entity> {
        self.entity_by_role("technical")
    }

    pub fn administrative_contact(&self) -> Option<&Entity> {
        self.entity_by_role("administrative")
    }

    pub fn abuse_contact(&self) -> Option<&Entity> {
        self.entity_by_role("abuse")
    }

    pub fn event(&self, action: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.event_action == action)
    }

    /// Status values translated to EPP; values without an EPP equivalent are dropped
    pub fn epp_status(&self) -> Vec<&'static str> {
        self.status.iter().filter_map(|s| epp_status(s)).collect()
    }
}

/// Autonomous system number range (`autnum`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Autnum {
    #[serde(flatten)]
    pub common: ObjectCommon,
    #[serde(default)]
    pub start_autnum: Option<u32>,
    #[serde(default)]
    pub end_autnum: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub autnum_type: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Domain name registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    #[serde(flatten)]
    pub common: ObjectCommon,
    #[serde(default)]
    pub ldh_name: Option<String>,
    #[serde(default)]
    pub unicode_name: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub nameservers: Vec<Nameserver>,
    #[serde(default, rename = "secureDNS")]
    pub secure_dns: Option<SecureDns>,
    #[serde(default)]
    pub network: Option<IpNetwork>,
}

impl Domain {
    pub fn registration_date(&self) -> Option<DateTime<Utc>> {
        self.common.event("registration").and_then(Event::date)
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.common.event("expiration").and_then(Event::date)
    }
}

/// Contact or organization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(flatten)]
    pub common: ObjectCommon,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub public_ids: Vec<PublicId>,
    #[serde(default)]
    pub vcard_array: Option<serde_json::Value>,
    #[serde(default)]
    pub as_event_actor: Vec<Event>,
    #[serde(default)]
    pub networks: Vec<IpNetwork>,
    #[serde(default)]
    pub autnums: Vec<Autnum>,
}

impl Entity {
    /// Text value of the first jCard property called `name` (RFC 7095)
    pub fn vcard_property(&self, name: &str) -> Option<&str> {
        self.vcard_array
            .as_ref()?
            .get(1)?
            .as_array()?
            .iter()
            .filter_map(|prop| prop.as_array())
            .find(|prop| prop.first().and_then(|n| n.as_str()) == Some(name))
            .and_then(|prop| prop.get(3))
            .and_then(|value| value.as_str())
    }

    /// The jCard `fn` (formatted name)
    pub fn full_name(&self) -> Option<&str> {
        self.vcard_property("fn")
    }

    pub fn email(&self) -> Option<&str> {
        self.vcard_property("email")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
}

/// IP address block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpNetwork {
    #[serde(flatten)]
    pub common: ObjectCommon,
    #[serde(default)]
    pub start_address: Option<String>,
    #[serde(default)]
    pub end_address: Option<String>,
    #[serde(default)]
    pub ip_version: Option<IpVersion>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub network_type: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub parent_handle: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nameserver {
    #[serde(flatten)]
    pub common: ObjectCommon,
    #[serde(default)]
    pub ldh_name: Option<String>,
    #[serde(default)]
    pub unicode_name: Option<String>,
    #[serde(default)]
    pub ip_addresses: Option<NameserverAddresses>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameserverAddresses {
    #[serde(default)]
    pub v4: Vec<String>,
    #[serde(default)]
    pub v6: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_action: String,
    #[serde(default)]
    pub event_actor: Option<String>,
    pub event_date: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Event {
    pub fn date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.event_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub rel: Option<String>,
    pub href: String,
    #[serde(default)]
    pub hreflang: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
}

/// Notice or remark
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notice {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub notice_type: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicId {
    #[serde(rename = "type")]
    pub id_type: String,
    pub identifier: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default)]
    pub relation: Vec<String>,
    #[serde(default)]
    pub idn_table: Option<String>,
    #[serde(default)]
    pub variant_names: Vec<VariantName>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantName {
    #[serde(default)]
    pub ldh_name: Option<String>,
    #[serde(default)]
    pub unicode_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureDns {
    #[serde(default)]
    pub zone_signed: Option<bool>,
    #[serde(default)]
    pub delegation_signed: Option<bool>,
    #[serde(default)]
    pub max_sig_life: Option<u64>,
    #[serde(default)]
    pub ds_data: Vec<DsData>,
    #[serde(default)]
    pub key_data: Vec<KeyData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsData {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest: String,
    pub digest_type: u8,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyData {
    pub flags: u16,
    pub protocol: u8,
    pub public_key: String,
    pub algorithm: u8,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Body of an RDAP error response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub notices: Vec<Notice>,
}

/// A deserialized RDAP object of any kind
#[derive(Debug, Clone)]
pub enum RdapObject {
    Autnum(Autnum),
    Domain(Domain),
    Entity(Entity),
    IpNetwork(IpNetwork),
}

impl RdapObject {
    /// Deserialize `body` as the object class served for `kind`
    pub fn from_json(kind: ObjectKind, body: &str) -> Result<Self> {
        let parsed = match kind {
            ObjectKind::Asn => serde_json::from_str(body).map(Self::Autnum),
            ObjectKind::Domain => serde_json::from_str(body).map(Self::Domain),
            ObjectKind::Entity => serde_json::from_str(body).map(Self::Entity),
            ObjectKind::Ipv4 | ObjectKind::Ipv6 => serde_json::from_str(body).map(Self::IpNetwork),
        };
        parsed.map_err(|e| RdapError::parse(e.to_string(), Some(body.to_string())))
    }

    pub fn common(&self) -> &ObjectCommon {
        match self {
            Self::Autnum(o) => &o.common,
            Self::Domain(o) => &o.common,
            Self::Entity(o) => &o.common,
            Self::IpNetwork(o) => &o.common,
        }
    }

    pub fn handle(&self) -> Option<&str> {
        self.common().handle.as_deref()
    }

    /// Human-readable name of the object, when the object class has one
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Autnum(o) => o.name.as_deref(),
            Self::Domain(o) => o.ldh_name.as_deref().or(o.unicode_name.as_deref()),
            Self::Entity(o) => o.full_name(),
            Self::IpNetwork(o) => o.name.as_deref(),
        }
    }
}
