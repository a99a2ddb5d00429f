//! Identifier classification

use crate::bootstrap::Ipv6Prefix;
use crate::error::{RdapError, Result};
use crate::types::ObjectKind;
use regex::Regex;

/// Determine the kind of object `identifier` refers to
///
/// An explicit kind always wins, even if the identifier looks like something
/// else. Otherwise ASNs, IPv4 and IPv6 addresses are recognized by shape, in
/// that order. Domains and entity handles cannot be told apart by shape and
/// must be passed explicitly.
pub fn classify(identifier: &str, explicit: Option<ObjectKind>) -> Result<ObjectKind> {
    if let Some(kind) = explicit {
        return Ok(kind);
    }

    if is_asn(identifier)? {
        return Ok(ObjectKind::Asn);
    }

    if is_ipv4(identifier)? {
        return Ok(ObjectKind::Ipv4);
    }

    if Ipv6Prefix::from_cidr(identifier).is_some() {
        return Ok(ObjectKind::Ipv6);
    }

    Err(RdapError::classification(identifier))
}

/// Identifier as used in lookups and query paths
///
/// ASNs lose their `ASN`/`AS` prefix; everything else is returned unchanged.
pub fn normalize(identifier: &str, kind: ObjectKind) -> &str {
    match kind {
        ObjectKind::Asn => identifier
            .strip_prefix("ASN")
            .or_else(|| identifier.strip_prefix("AS"))
            .unwrap_or(identifier),
        _ => identifier,
    }
}

fn is_asn(identifier: &str) -> Result<bool> {
    let asn = Regex::new(r"^(?:ASN?)?[0-9]+$").map_err(|e| RdapError::internal(e.to_string()))?;
    Ok(asn.is_match(identifier))
}

fn is_ipv4(identifier: &str) -> Result<bool> {
    let ipv4 = Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})(?:/([0-9]{1,2}))?$")
        .map_err(|e| RdapError::internal(e.to_string()))?;

    let Some(captures) = ipv4.captures(identifier) else {
        return Ok(false);
    };

    // zero-padded octets are ambiguous (octal in some parsers) and never resolve
    let octets_valid = (1..=4).all(|i| {
        captures.get(i).map(|octet| octet.as_str()).is_some_and(|octet| {
            !(octet.len() > 1 && octet.starts_with('0'))
                && octet.parse::<u16>().is_ok_and(|octet| octet <= 255)
        })
    });
    let prefix_valid = captures
        .get(5)
        .map_or(true, |len| len.as_str().parse::<u8>().is_ok_and(|len| len <= 32));

    Ok(octets_valid && prefix_valid)
}
