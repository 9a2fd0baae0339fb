pub mod cloudflare;

use serde::{Deserialize, Serialize};

/// Cloudflare error code for "zone already exists".
pub const ZONE_EXISTS_CODE: i64 = 1061;

pub type GatewayResult<T> = Result<T, ProviderError>;

/// The single error kind returned by every gateway call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Provider error code, when the API reported one.
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    #[must_use]
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// An error that never reached the API or whose response
    /// could not be read.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    /// Whether the provider rejected a create because the zone
    /// already exists.
    ///
    /// Checks the structured code first. Gateways that only
    /// carry a message fall back to the `"already exists"`
    /// substring the provider puts in its message text.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        self.code == Some(ZONE_EXISTS_CODE) || self.message.contains("already exists")
    }
}

/// A zone as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "type", default)]
    pub zone_type: Option<String>,
    #[serde(default)]
    pub created_on: Option<String>,
}

impl Zone {
    /// A zone carrying only a name, for reporting a domain that
    /// could not be created.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// A DNS record inside a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Payload for creating or updating a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub record_type: String,
    /// Fully-qualified record name.
    pub name: String,
    pub content: String,
}

impl NewRecord {
    #[must_use]
    pub fn new(record_type: &str, name: &str, content: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        }
    }
}

/// Zone and record API of a DNS hosting provider.
///
/// Calls are blocking. Implementations are reused across
/// sequential calls but are never shared between threads.
pub trait ZoneGateway {
    /// Find a zone by its domain name.
    fn lookup_zone(&self, name: &str) -> GatewayResult<Option<Zone>>;

    /// Create a zone for `name`.
    fn create_zone(&self, name: &str) -> GatewayResult<Zone>;

    /// Delete a zone by id.
    fn delete_zone(&self, zone_id: &str) -> GatewayResult<Zone>;

    /// Fetch one page of records, 1-based. A page shorter than
    /// `per_page` is the last one.
    fn list_records(&self, zone_id: &str, page: u32, per_page: u32)
    -> GatewayResult<Vec<DnsRecord>>;

    fn create_record(&self, zone_id: &str, record: &NewRecord) -> GatewayResult<DnsRecord>;

    fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &NewRecord,
    ) -> GatewayResult<DnsRecord>;

    /// Delete a record, returning what the provider echoes back.
    fn delete_record(&self, zone_id: &str, record_id: &str) -> GatewayResult<DnsRecord>;
}

/// Join a record label and a zone domain into a fully-qualified
/// name.
///
/// Example: `("foo", "example.com")` -> `"foo.example.com"`
///
/// An empty label names the zone apex.
#[must_use]
pub fn qualified_name(label: &str, domain: &str) -> String {
    if label.is_empty() {
        domain.to_string()
    } else {
        format!("{label}.{domain}")
    }
}
