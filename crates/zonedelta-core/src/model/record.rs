// # Record sets
//
// A record set is the group of RDATA values bound to one (name, type) pair in
// a zone, sharing a single TTL. The change processor compares record sets
// structurally when deciding whether a mutation is redundant, applicable, or
// inconsistent, so the equivalence rules live here:
//
// - names compare case-insensitively, with a single trailing dot stripped
// - RDATA compares as a multiset (order never matters, duplicates do)
// - TTL differences are differences
// - domain names inside RDATA (CNAME targets, MX exchanges, ...) follow the
//   same name canonicalization as owner names

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4 address)
    A,
    /// AAAA record (IPv6 address)
    Aaaa,
    /// CNAME record (canonical name alias)
    Cname,
    /// MX record (mail exchange)
    Mx,
    /// NS record (name server delegation)
    Ns,
    /// PTR record (reverse pointer)
    Ptr,
    /// SOA record (start of authority)
    Soa,
    /// SRV record (service locator)
    Srv,
    /// TXT record (free-form text)
    Txt,
}

impl RecordType {
    /// Wire-format mnemonic for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "NS" => Ok(RecordType::Ns),
            "PTR" => Ok(RecordType::Ptr),
            "SOA" => Ok(RecordType::Soa),
            "SRV" => Ok(RecordType::Srv),
            "TXT" => Ok(RecordType::Txt),
            other => Err(format!("unsupported record type: {}", other)),
        }
    }
}

/// One RDATA value, tagged by record type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum RData {
    /// IPv4 address
    A { address: Ipv4Addr },
    /// IPv6 address
    Aaaa { address: Ipv6Addr },
    /// Alias target
    Cname { cname: String },
    /// Mail exchange with preference
    Mx { preference: u16, exchange: String },
    /// Delegated name server
    Ns { nsdname: String },
    /// Reverse pointer target
    Ptr { ptrdname: String },
    /// Start of authority
    Soa {
        mname: String,
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    /// Service locator
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    /// Text payload
    Txt { text: String },
}

impl RData {
    /// The record type this RDATA belongs to
    pub fn record_type(&self) -> RecordType {
        match self {
            RData::A { .. } => RecordType::A,
            RData::Aaaa { .. } => RecordType::Aaaa,
            RData::Cname { .. } => RecordType::Cname,
            RData::Mx { .. } => RecordType::Mx,
            RData::Ns { .. } => RecordType::Ns,
            RData::Ptr { .. } => RecordType::Ptr,
            RData::Soa { .. } => RecordType::Soa,
            RData::Srv { .. } => RecordType::Srv,
            RData::Txt { .. } => RecordType::Txt,
        }
    }

    /// Copy of this RDATA with all embedded domain names canonicalized
    ///
    /// Used for structural comparison only; stored and transmitted RDATA keeps
    /// the owner's original spelling.
    pub fn canonical(&self) -> RData {
        match self {
            RData::Cname { cname } => RData::Cname {
                cname: canonical_name(cname),
            },
            RData::Mx {
                preference,
                exchange,
            } => RData::Mx {
                preference: *preference,
                exchange: canonical_name(exchange),
            },
            RData::Ns { nsdname } => RData::Ns {
                nsdname: canonical_name(nsdname),
            },
            RData::Ptr { ptrdname } => RData::Ptr {
                ptrdname: canonical_name(ptrdname),
            },
            RData::Soa {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => RData::Soa {
                mname: canonical_name(mname),
                rname: canonical_name(rname),
                serial: *serial,
                refresh: *refresh,
                retry: *retry,
                expire: *expire,
                minimum: *minimum,
            },
            RData::Srv {
                priority,
                weight,
                port,
                target,
            } => RData::Srv {
                priority: *priority,
                weight: *weight,
                port: *port,
                target: canonical_name(target),
            },
            other => other.clone(),
        }
    }
}

/// Lifecycle status of a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSetStatus {
    /// A change for this record set is in flight
    Pending,
    /// The record set is live in the zone
    Active,
    /// The record set failed to apply or was removed
    Inactive,
}

/// Set of resource records bound to a (name, type) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Opaque record-set identifier
    pub id: String,

    /// Identifier of the owning zone
    pub zone_id: String,

    /// Owner name, relative or fully qualified
    pub name: String,

    /// Record type; all `records` must be of this type
    pub record_type: RecordType,

    /// Time-to-live shared by every record in the set, in seconds
    pub ttl: u32,

    /// RDATA values, in submission order
    pub records: Vec<RData>,

    /// Lifecycle status
    pub status: RecordSetStatus,
}

impl RecordSet {
    /// Create a pending record set
    pub fn new(
        id: impl Into<String>,
        zone_id: impl Into<String>,
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        records: Vec<RData>,
    ) -> Self {
        Self {
            id: id.into(),
            zone_id: zone_id.into(),
            name: name.into(),
            record_type,
            ttl,
            records,
            status: RecordSetStatus::Pending,
        }
    }

    /// Build a record set from a live DNS answer
    ///
    /// Resolved sets have no stored identity; they exist only to be compared
    /// against a desired post-state or pre-image.
    pub fn resolved(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        records: Vec<RData>,
    ) -> Self {
        Self {
            id: String::new(),
            zone_id: String::new(),
            name: name.into(),
            record_type,
            ttl,
            records,
            status: RecordSetStatus::Active,
        }
    }

    /// Structural equivalence against another record set
    ///
    /// Compares canonical owner name, type, TTL, and the RDATA multiset.
    /// Identity fields (`id`, `zone_id`) and status are intentionally ignored:
    /// a live answer has neither.
    pub fn matches(&self, other: &RecordSet) -> bool {
        canonical_name(&self.name) == canonical_name(&other.name)
            && self.record_type == other.record_type
            && self.ttl == other.ttl
            && same_records(&self.records, &other.records)
    }
}

/// Canonical form of a domain name for comparison
///
/// Lowercases and strips at most one trailing dot. Comparison-only; never use
/// the result on the wire.
pub fn canonical_name(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}

/// Multiset equality over two RDATA slices
///
/// Order is irrelevant, multiplicity is not. Domain names embedded in RDATA
/// compare canonically.
pub fn same_records(left: &[RData], right: &[RData]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    counted(left) == counted(right)
}

fn counted(records: &[RData]) -> HashMap<RData, usize> {
    let mut counts = HashMap::with_capacity(records.len());
    for rdata in records {
        *counts.entry(rdata.canonical()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aaaa(addr: &str) -> RData {
        RData::Aaaa {
            address: addr.parse().unwrap(),
        }
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("Host.Example.COM."), "host.example.com");
        assert_eq!(canonical_name("host.example.com"), "host.example.com");
        // Only a single trailing dot is stripped
        assert_eq!(canonical_name("host.."), "host.");
    }

    #[test]
    fn test_same_records_ignores_order() {
        let a = vec![aaaa("2001:db8::1"), aaaa("2001:db8::2")];
        let b = vec![aaaa("2001:db8::2"), aaaa("2001:db8::1")];
        assert!(same_records(&a, &b));
    }

    #[test]
    fn test_same_records_respects_multiplicity() {
        let a = vec![aaaa("2001:db8::1"), aaaa("2001:db8::1")];
        let b = vec![aaaa("2001:db8::1")];
        assert!(!same_records(&a, &b));
    }

    #[test]
    fn test_same_records_canonicalizes_names() {
        let a = vec![RData::Cname {
            cname: "Target.Example.Com.".to_string(),
        }];
        let b = vec![RData::Cname {
            cname: "target.example.com".to_string(),
        }];
        assert!(same_records(&a, &b));
    }

    #[test]
    fn test_record_set_matches() {
        let desired = RecordSet::new(
            "rs-1",
            "zone-1",
            "host.example.com.",
            RecordType::Aaaa,
            300,
            vec![aaaa("2001:db8::1")],
        );
        let live = RecordSet::resolved(
            "HOST.example.com",
            RecordType::Aaaa,
            300,
            vec![aaaa("2001:db8::1")],
        );
        assert!(desired.matches(&live));
    }

    #[test]
    fn test_record_set_ttl_mismatch_differs() {
        let desired = RecordSet::new(
            "rs-1",
            "zone-1",
            "host.example.com",
            RecordType::Aaaa,
            300,
            vec![aaaa("2001:db8::1")],
        );
        let mut live = desired.clone();
        live.ttl = 30;
        assert!(!desired.matches(&live));
    }

    #[test]
    fn test_record_type_round_trip() {
        for (s, t) in [
            ("A", RecordType::A),
            ("AAAA", RecordType::Aaaa),
            ("CNAME", RecordType::Cname),
            ("MX", RecordType::Mx),
            ("NS", RecordType::Ns),
            ("PTR", RecordType::Ptr),
            ("SOA", RecordType::Soa),
            ("SRV", RecordType::Srv),
            ("TXT", RecordType::Txt),
        ] {
            assert_eq!(s.parse::<RecordType>().unwrap(), t);
            assert_eq!(t.to_string(), s);
        }
        assert!("SPF".parse::<RecordType>().is_err());
    }
}
