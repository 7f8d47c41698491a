// # PowerDNS Connector
//
// `DnsConnector` implementation against the PowerDNS Authoritative Server
// HTTP API.
//
// - Resolve: GET `/servers/:server/zones/:zone`, filtered to the target
//   rrset.
// - Update: PATCH `/servers/:server/zones/:zone` with a single rrset change
//   (`REPLACE` for create/update, `DELETE` for delete).
//
// ## Result channels
//
// API rejections (auth failures, unknown zones, unprocessable rrsets, server
// errors) are DNS-level outcomes and surface as `Ok(Err(DnsError))`; the
// processor turns them into terminal failed changes. Transport failures
// (connection refused, timeouts, undecodable bodies) are infrastructure
// errors and surface as `Err`.
//
// ## Single-shot contract
//
// One HTTP request per call, no internal retries or caching: bounded
// re-resolution belongs to the processor's verifier.
//
// ## Security
//
// The API key never appears in logs or in `Debug` output.

pub mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use zonedelta_core::config::ConnectorConfig;
use zonedelta_core::error::{Error, Result};
use zonedelta_core::model::{canonical_name, ChangeType, RecordSet, RecordSetChange, RecordType};
use zonedelta_core::registry::ConnectorRegistry;
use zonedelta_core::traits::{
    DnsConnector, DnsConnectorFactory, DnsError, DnsResponse, DnsResult,
};

use wire::{
    content_from_rdata, fqdn, rdata_from_content, PdnsRecordChange, PdnsRrsetChange, PdnsZone,
};

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// PowerDNS HTTP API connector
pub struct PdnsConnector {
    /// HTTP client for API requests
    http: reqwest::Client,

    /// API base URL, e.g. "http://127.0.0.1:8081/api/v1"
    base_url: String,

    /// API key; never log this value
    api_key: String,

    /// Server id, usually "localhost"
    server_id: String,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for PdnsConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdnsConnector")
            .field("base_url", &self.base_url)
            .field("api_key", &"<REDACTED>")
            .field("server_id", &self.server_id)
            .finish()
    }
}

impl PdnsConnector {
    /// Create a new PowerDNS connector
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        server_id: impl Into<String>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            server_id: server_id.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/servers/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.server_id,
            path.trim_start_matches('/')
        )
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-Key", &self.api_key)
    }

    async fn get_zone(&self, zone_name: &str) -> Result<DnsResult<PdnsZone>> {
        let url = self.url(&format!("zones/{}", zone_name.trim_end_matches('.')));
        let response = self
            .auth(self.http.get(&url))
            .send()
            .await
            .map_err(|e| Error::connector(format!("GET zone failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(Err(dns_error_for_status(status, &body)));
        }

        let zone = response
            .json::<PdnsZone>()
            .await
            .map_err(|e| Error::connector(format!("undecodable zone answer: {}", e)))?;
        Ok(Ok(zone))
    }
}

/// Map an API rejection onto the DNS-level error taxonomy
fn dns_error_for_status(status: StatusCode, body: &str) -> DnsError {
    let message = if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    };

    match status.as_u16() {
        401 | 403 => DnsError::NotAuthorized(message),
        404 => DnsError::NotZone(message),
        422 => DnsError::FormatError(message),
        500..=599 => DnsError::ServerFailure(message),
        _ => DnsError::Refused(message),
    }
}

#[async_trait]
impl DnsConnector for PdnsConnector {
    async fn dns_resolve(
        &self,
        name: &str,
        zone_name: &str,
        record_type: RecordType,
    ) -> Result<DnsResult<Vec<RecordSet>>> {
        let zone = match self.get_zone(zone_name).await? {
            Ok(zone) => zone,
            Err(dns_error) => return Ok(Err(dns_error)),
        };

        let wanted = canonical_name(&fqdn(name, zone_name));
        let mut found = Vec::new();
        for rrset in zone.rrsets {
            if rrset.rtype != record_type.as_str() || canonical_name(&rrset.name) != wanted {
                continue;
            }

            let mut records = Vec::with_capacity(rrset.records.len());
            for record in rrset.records.iter().filter(|r| !r.disabled) {
                match rdata_from_content(record_type, &record.content) {
                    Ok(rdata) => records.push(rdata),
                    Err(message) => return Ok(Err(DnsError::FormatError(message))),
                }
            }
            found.push(RecordSet::resolved(rrset.name, record_type, rrset.ttl, records));
        }

        debug!(
            record = %wanted,
            zone = %zone_name,
            rrsets = found.len(),
            "resolved against PowerDNS"
        );
        Ok(Ok(found))
    }

    async fn dns_update(&self, change: &RecordSetChange) -> Result<DnsResult<DnsResponse>> {
        let record_set = &change.record_set;
        let rrset = PdnsRrsetChange {
            name: fqdn(&record_set.name, &change.zone.name),
            rtype: record_set.record_type.as_str().to_string(),
            ttl: record_set.ttl,
            changetype: match change.change_type {
                ChangeType::Create | ChangeType::Update => "REPLACE",
                ChangeType::Delete => "DELETE",
            },
            records: match change.change_type {
                ChangeType::Delete => Vec::new(),
                _ => record_set
                    .records
                    .iter()
                    .map(|rdata| PdnsRecordChange {
                        content: content_from_rdata(rdata),
                        disabled: false,
                    })
                    .collect(),
            },
        };

        let url = self.url(&format!("zones/{}", change.zone.name.trim_end_matches('.')));
        let body = serde_json::json!({ "rrsets": [rrset] });
        let response = self
            .auth(self.http.patch(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::connector(format!("PATCH zone failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            debug!(change_id = %change.id, %status, "update accepted by PowerDNS");
            Ok(Ok(DnsResponse::NoError))
        } else {
            let body = response.text().await.unwrap_or_default();
            Ok(Err(dns_error_for_status(status, &body)))
        }
    }

    fn connector_name(&self) -> &'static str {
        "pdns"
    }
}

/// Factory for creating PowerDNS connectors
pub struct PdnsConnectorFactory;

impl DnsConnectorFactory for PdnsConnectorFactory {
    fn create(&self, config: &ConnectorConfig) -> Result<Box<dyn DnsConnector>> {
        match config {
            ConnectorConfig::Pdns {
                base_url,
                api_key,
                server_id,
            } => {
                if base_url.is_empty() {
                    return Err(Error::config("PowerDNS base URL is required"));
                }
                if api_key.is_empty() {
                    return Err(Error::config("PowerDNS API key is required"));
                }
                Ok(Box::new(PdnsConnector::new(base_url, api_key, server_id)))
            }
            _ => Err(Error::config("invalid config for PowerDNS connector")),
        }
    }
}

/// Register the PowerDNS connector with a registry
pub fn register(registry: &ConnectorRegistry) {
    registry.register_connector("pdns", Box::new(PdnsConnectorFactory));
}
