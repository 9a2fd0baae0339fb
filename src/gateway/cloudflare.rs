use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cmd;
use crate::config::Settings;
use crate::gateway::{DnsRecord, GatewayResult, NewRecord, ProviderError, Zone, ZoneGateway};

/// TTL value meaning "automatic".
const AUTO_TTL: u32 = 1;

/// Cloudflare v4 gateway using the REST API via curl.
///
/// Credentials come from [`Settings`], usually
/// [`Settings::from_env`].
pub struct Cloudflare {
    settings: Settings,
    timeout_secs: u32,
}

impl Cloudflare {
    #[must_use]
    pub const fn new(settings: Settings) -> Self {
        Self {
            settings,
            timeout_secs: 30,
        }
    }

    /// Maximum time a single request may take, in seconds.
    #[must_use]
    pub const fn timeout(mut self, secs: u32) -> Self {
        self.timeout_secs = secs;
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Arguments for one curl invocation.
    #[must_use]
    pub fn curl_args(&self, method: &str, path: &str, body: Option<&str>) -> Vec<String> {
        let mut args = vec![
            "-sS".to_string(),
            "--max-time".to_string(),
            self.timeout_secs.to_string(),
            "-X".to_string(),
            method.to_string(),
        ];
        for header in self.settings.credentials.headers() {
            args.push("-H".to_string());
            args.push(header);
        }
        args.push("-H".to_string());
        args.push("Content-Type: application/json".to_string());

        if let Some(b) = body {
            args.push("--data".to_string());
            args.push(b.to_string());
        }
        args.push(format!("{}{path}", self.settings.api_base));
        args
    }

    /// Arguments for changing a record's content.
    ///
    /// Sent as a `PATCH` carrying only type, name and content, so
    /// the record keeps its TTL and proxy setting.
    pub fn update_record_args(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &NewRecord,
    ) -> GatewayResult<Vec<String>> {
        let body = to_json(&RecordBody::patch(record))?;
        let path = format!("/zones/{zone_id}/dns_records/{record_id}");
        Ok(self.curl_args("PATCH", &path, Some(&body)))
    }

    fn api_request<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<&str>,
    ) -> GatewayResult<T> {
        debug!("{method} {path}");
        execute(&self.curl_args(method, path, body))
    }
}

impl ZoneGateway for Cloudflare {
    fn lookup_zone(&self, name: &str) -> GatewayResult<Option<Zone>> {
        let zones: Vec<Zone> = self.api_request("GET", &zone_lookup_path(name), None)?;
        Ok(zones.into_iter().find(|z| z.name == name))
    }

    fn create_zone(&self, name: &str) -> GatewayResult<Zone> {
        let body = ZoneBody {
            name,
            account: self
                .settings
                .account_id
                .as_deref()
                .map(|id| AccountRef { id }),
        };
        self.api_request("POST", "/zones", Some(&to_json(&body)?))
    }

    fn delete_zone(&self, zone_id: &str) -> GatewayResult<Zone> {
        self.api_request("DELETE", &format!("/zones/{zone_id}"), None)
    }

    fn list_records(
        &self,
        zone_id: &str,
        page: u32,
        per_page: u32,
    ) -> GatewayResult<Vec<DnsRecord>> {
        let path = format!("/zones/{zone_id}/dns_records?page={page}&per_page={per_page}");
        self.api_request("GET", &path, None)
    }

    fn create_record(&self, zone_id: &str, record: &NewRecord) -> GatewayResult<DnsRecord> {
        let body = to_json(&RecordBody::create(record))?;
        self.api_request("POST", &format!("/zones/{zone_id}/dns_records"), Some(&body))
    }

    fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &NewRecord,
    ) -> GatewayResult<DnsRecord> {
        debug!("PATCH record {record_id} of zone {zone_id}");
        execute(&self.update_record_args(zone_id, record_id, record)?)
    }

    fn delete_record(&self, zone_id: &str, record_id: &str) -> GatewayResult<DnsRecord> {
        let path = format!("/zones/{zone_id}/dns_records/{record_id}");
        self.api_request("DELETE", &path, None)
    }
}

/// Path of the zone lookup for `name`, with the name
/// percent-encoded.
#[must_use]
pub fn zone_lookup_path(name: &str) -> String {
    format!("/zones?name={}", urlencoding::encode(name))
}

fn execute<T: DeserializeOwned>(args: &[String]) -> GatewayResult<T> {
    let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
    let response =
        cmd::run("curl", &args_ref).map_err(|e| ProviderError::transport(e.to_string()))?;
    parse_response(&response)
}

/// Unwrap a Cloudflare response envelope.
///
/// `success: false` becomes a [`ProviderError`] carrying the
/// first error code and every message joined with `"; "`.
pub fn parse_response<T: DeserializeOwned>(body: &str) -> GatewayResult<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| ProviderError::transport(format!("unreadable API response: {e}")))?;

    if !envelope.success {
        let code = envelope.errors.first().map(|e| e.code);
        let message = if envelope.errors.is_empty() {
            "request failed without error details".to_string()
        } else {
            envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        };
        return Err(ProviderError::new(code, message));
    }

    envelope
        .result
        .ok_or_else(|| ProviderError::transport("API response carried no result"))
}

fn to_json<T: Serialize>(body: &T) -> GatewayResult<String> {
    serde_json::to_string(body).map_err(|e| ProviderError::transport(e.to_string()))
}

#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Deserialize)]
struct ApiMessage {
    code: i64,
    message: String,
}

#[derive(Serialize)]
struct ZoneBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<AccountRef<'a>>,
}

#[derive(Serialize)]
struct AccountRef<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct RecordBody<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
}

impl<'a> RecordBody<'a> {
    fn create(record: &'a NewRecord) -> Self {
        Self {
            ttl: Some(AUTO_TTL),
            ..Self::patch(record)
        }
    }

    fn patch(record: &'a NewRecord) -> Self {
        Self {
            record_type: record.record_type.as_str(),
            name: record.name.as_str(),
            content: record.content.as_str(),
            ttl: None,
        }
    }
}
