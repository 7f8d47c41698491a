//! PowerDNS API payloads and RDATA content conversion
//!
//! PowerDNS serves rrsets as JSON with RDATA flattened into presentation
//! strings ("content"). This module maps between that form and the core's
//! typed [`RData`].

use serde::{Deserialize, Serialize};

use zonedelta_core::model::{RData, RecordType};

/// Zone answer, reduced to the parts the connector reads
#[derive(Debug, Deserialize)]
pub struct PdnsZone {
    #[serde(default)]
    pub rrsets: Vec<PdnsRrset>,
}

/// One rrset as served by the API
#[derive(Debug, Clone, Deserialize)]
pub struct PdnsRrset {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: String,
    pub ttl: u32,
    #[serde(default)]
    pub records: Vec<PdnsRecord>,
}

/// One record within an rrset
#[derive(Debug, Clone, Deserialize)]
pub struct PdnsRecord {
    pub content: String,
    #[serde(default)]
    pub disabled: bool,
}

/// One rrset mutation for a PATCH request
#[derive(Debug, Serialize)]
pub struct PdnsRrsetChange {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: String,
    pub ttl: u32,
    pub changetype: &'static str,
    pub records: Vec<PdnsRecordChange>,
}

/// One record within an rrset mutation
#[derive(Debug, Serialize)]
pub struct PdnsRecordChange {
    pub content: String,
    pub disabled: bool,
}

/// Fully qualified, dot-terminated form of a record name within a zone
pub fn fqdn(name: &str, zone_name: &str) -> String {
    let zone = zone_name.trim_end_matches('.');
    let name = name.trim_end_matches('.');
    if name == zone || name.ends_with(&format!(".{}", zone)) {
        format!("{}.", name)
    } else {
        format!("{}.{}.", name, zone)
    }
}

/// Parse a PowerDNS content string into typed RDATA
pub fn rdata_from_content(record_type: RecordType, content: &str) -> Result<RData, String> {
    let bad = |what: &str| format!("bad {} content {:?}: {}", record_type, content, what);

    match record_type {
        RecordType::A => content
            .parse()
            .map(|address| RData::A { address })
            .map_err(|_| bad("not an IPv4 address")),
        RecordType::Aaaa => content
            .parse()
            .map(|address| RData::Aaaa { address })
            .map_err(|_| bad("not an IPv6 address")),
        RecordType::Cname => Ok(RData::Cname {
            cname: content.to_string(),
        }),
        RecordType::Ns => Ok(RData::Ns {
            nsdname: content.to_string(),
        }),
        RecordType::Ptr => Ok(RData::Ptr {
            ptrdname: content.to_string(),
        }),
        RecordType::Txt => Ok(RData::Txt {
            // PowerDNS quotes TXT payloads in presentation format.
            text: content
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(content)
                .to_string(),
        }),
        RecordType::Mx => {
            let (preference, exchange) = content
                .split_once(' ')
                .ok_or_else(|| bad("expected \"preference exchange\""))?;
            Ok(RData::Mx {
                preference: preference.parse().map_err(|_| bad("bad preference"))?,
                exchange: exchange.trim().to_string(),
            })
        }
        RecordType::Srv => {
            let fields: Vec<&str> = content.split_whitespace().collect();
            match fields.as_slice() {
                [priority, weight, port, target] => Ok(RData::Srv {
                    priority: priority.parse().map_err(|_| bad("bad priority"))?,
                    weight: weight.parse().map_err(|_| bad("bad weight"))?,
                    port: port.parse().map_err(|_| bad("bad port"))?,
                    target: (*target).to_string(),
                }),
                _ => Err(bad("expected \"priority weight port target\"")),
            }
        }
        RecordType::Soa => {
            let fields: Vec<&str> = content.split_whitespace().collect();
            match fields.as_slice() {
                [mname, rname, serial, refresh, retry, expire, minimum] => Ok(RData::Soa {
                    mname: (*mname).to_string(),
                    rname: (*rname).to_string(),
                    serial: serial.parse().map_err(|_| bad("bad serial"))?,
                    refresh: refresh.parse().map_err(|_| bad("bad refresh"))?,
                    retry: retry.parse().map_err(|_| bad("bad retry"))?,
                    expire: expire.parse().map_err(|_| bad("bad expire"))?,
                    minimum: minimum.parse().map_err(|_| bad("bad minimum"))?,
                }),
                _ => Err(bad("expected 7 SOA fields")),
            }
        }
    }
}

/// Render typed RDATA as a PowerDNS content string
pub fn content_from_rdata(rdata: &RData) -> String {
    match rdata {
        RData::A { address } => address.to_string(),
        RData::Aaaa { address } => address.to_string(),
        RData::Cname { cname } => cname.clone(),
        RData::Ns { nsdname } => nsdname.clone(),
        RData::Ptr { ptrdname } => ptrdname.clone(),
        RData::Txt { text } => format!("\"{}\"", text),
        RData::Mx {
            preference,
            exchange,
        } => format!("{} {}", preference, exchange),
        RData::Srv {
            priority,
            weight,
            port,
            target,
        } => format!("{} {} {} {}", priority, weight, port, target),
        RData::Soa {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        } => format!(
            "{} {} {} {} {} {} {}",
            mname, rname, serial, refresh, retry, expire, minimum
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqdn_forms() {
        assert_eq!(fqdn("host", "example.com."), "host.example.com.");
        assert_eq!(fqdn("host.example.com.", "example.com."), "host.example.com.");
        assert_eq!(fqdn("host.example.com", "example.com"), "host.example.com.");
        assert_eq!(fqdn("example.com", "example.com."), "example.com.");
    }

    #[test]
    fn test_address_content() {
        assert_eq!(
            rdata_from_content(RecordType::A, "192.0.2.1").unwrap(),
            RData::A {
                address: "192.0.2.1".parse().unwrap()
            }
        );
        assert!(rdata_from_content(RecordType::A, "not-an-ip").is_err());
        assert_eq!(
            rdata_from_content(RecordType::Aaaa, "2001:db8::1").unwrap(),
            RData::Aaaa {
                address: "2001:db8::1".parse().unwrap()
            }
        );
    }

    #[test]
    fn test_txt_content_strips_quotes() {
        assert_eq!(
            rdata_from_content(RecordType::Txt, "\"v=spf1 -all\"").unwrap(),
            RData::Txt {
                text: "v=spf1 -all".to_string()
            }
        );
        let rendered = content_from_rdata(&RData::Txt {
            text: "v=spf1 -all".to_string(),
        });
        assert_eq!(rendered, "\"v=spf1 -all\"");
    }

    #[test]
    fn test_mx_and_srv_content() {
        let mx = rdata_from_content(RecordType::Mx, "10 mail.example.com.").unwrap();
        assert_eq!(
            mx,
            RData::Mx {
                preference: 10,
                exchange: "mail.example.com.".to_string()
            }
        );
        assert_eq!(content_from_rdata(&mx), "10 mail.example.com.");

        let srv = rdata_from_content(RecordType::Srv, "0 5 5060 sip.example.com.").unwrap();
        assert_eq!(content_from_rdata(&srv), "0 5 5060 sip.example.com.");
        assert!(rdata_from_content(RecordType::Srv, "0 5 5060").is_err());
    }

    #[test]
    fn test_soa_content() {
        let content = "ns1.example.com. admin.example.com. 2024010101 7200 900 1209600 300";
        let soa = rdata_from_content(RecordType::Soa, content).unwrap();
        assert_eq!(content_from_rdata(&soa), content);
        assert!(rdata_from_content(RecordType::Soa, "too few fields").is_err());
    }
}
