#![allow(dead_code)]

use std::cell::RefCell;

use bulkdns::gateway::{DnsRecord, GatewayResult, NewRecord, ProviderError, Zone, ZoneGateway};

pub const ZONE_ID: &str = "ZONE ID";

/// A gateway call, as seen by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LookupZone(String),
    CreateZone(String),
    DeleteZone(String),
    ListRecords { zone_id: String, page: u32, per_page: u32 },
    CreateRecord(String, NewRecord),
    UpdateRecord(String, String, NewRecord),
    DeleteRecord(String, String),
}

/// In-memory gateway holding at most one zone. Records every
/// call it receives.
#[derive(Default)]
pub struct MockGateway {
    pub zone: Option<Zone>,
    pub records: Vec<DnsRecord>,
    pub lookup_error: Option<ProviderError>,
    pub create_zone_error: Option<ProviderError>,
    pub list_error: Option<ProviderError>,
    /// Page that fails with `list_error`, every page when unset.
    pub failing_page: Option<u32>,
    pub create_record_error: Option<ProviderError>,
    pub update_record_error: Option<ProviderError>,
    /// Record ids whose delete fails.
    pub failing_deletes: Vec<String>,
    pub calls: RefCell<Vec<Call>>,
}

impl MockGateway {
    /// A gateway whose single zone is `domain`.
    pub fn with_zone(domain: &str) -> Self {
        Self {
            zone: Some(Zone {
                id: ZONE_ID.to_string(),
                name: domain.to_string(),
                status: "active".to_string(),
                zone_type: Some("full".to_string()),
                created_on: Some("2016-08-26T15:34:31.817353Z".to_string()),
            }),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn records(mut self, records: Vec<DnsRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Pages requested through `list_records`, in order.
    pub fn pages_requested(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::ListRecords { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    /// Calls other than the zone lookup.
    pub fn record_calls(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, Call::LookupZone(_)))
            .cloned()
            .collect()
    }

    fn log(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl ZoneGateway for MockGateway {
    fn lookup_zone(&self, name: &str) -> GatewayResult<Option<Zone>> {
        self.log(Call::LookupZone(name.to_string()));
        if let Some(e) = &self.lookup_error {
            return Err(e.clone());
        }
        Ok(self.zone.clone().filter(|z| z.name == name))
    }

    fn create_zone(&self, name: &str) -> GatewayResult<Zone> {
        self.log(Call::CreateZone(name.to_string()));
        if let Some(e) = &self.create_zone_error {
            return Err(e.clone());
        }
        Ok(Zone {
            id: format!("ID {name}"),
            name: name.to_string(),
            status: "pending".to_string(),
            zone_type: Some("full".to_string()),
            created_on: Some("2016-08-26T15:34:31.817353Z".to_string()),
        })
    }

    fn delete_zone(&self, zone_id: &str) -> GatewayResult<Zone> {
        self.log(Call::DeleteZone(zone_id.to_string()));
        Ok(Zone {
            id: zone_id.to_string(),
            ..Zone::default()
        })
    }

    fn list_records(
        &self,
        zone_id: &str,
        page: u32,
        per_page: u32,
    ) -> GatewayResult<Vec<DnsRecord>> {
        self.log(Call::ListRecords {
            zone_id: zone_id.to_string(),
            page,
            per_page,
        });
        let fails = self.failing_page.is_none_or(|p| p == page);
        if let Some(e) = self.list_error.as_ref().filter(|_| fails) {
            return Err(e.clone());
        }
        let start = ((page - 1) * per_page) as usize;
        Ok(self
            .records
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    fn create_record(&self, zone_id: &str, record: &NewRecord) -> GatewayResult<DnsRecord> {
        self.log(Call::CreateRecord(zone_id.to_string(), record.clone()));
        if let Some(e) = &self.create_record_error {
            return Err(e.clone());
        }
        Ok(DnsRecord {
            id: "DNS RECORD ID 345".to_string(),
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            content: record.content.clone(),
        })
    }

    fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &NewRecord,
    ) -> GatewayResult<DnsRecord> {
        self.log(Call::UpdateRecord(
            zone_id.to_string(),
            record_id.to_string(),
            record.clone(),
        ));
        if let Some(e) = &self.update_record_error {
            return Err(e.clone());
        }
        Ok(DnsRecord {
            id: record_id.to_string(),
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            content: record.content.clone(),
        })
    }

    fn delete_record(&self, zone_id: &str, record_id: &str) -> GatewayResult<DnsRecord> {
        self.log(Call::DeleteRecord(zone_id.to_string(), record_id.to_string()));
        if self.failing_deletes.iter().any(|id| id == record_id) {
            return Err(ProviderError::new(Some(81044), "Record does not exist."));
        }
        // Cloudflare echoes only the id
        Ok(DnsRecord {
            id: record_id.to_string(),
            ..DnsRecord::default()
        })
    }
}

pub fn record(id: &str, record_type: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        record_type: record_type.to_string(),
        name: name.to_string(),
        content: content.to_string(),
    }
}

/// `count` TXT records with ids `DNS RECORD ID 1..=count`.
pub fn numbered_records(count: usize, domain: &str) -> Vec<DnsRecord> {
    (1..=count)
        .map(|i| {
            record(
                &format!("DNS RECORD ID {i}"),
                "TXT",
                &format!("foo{i}.{domain}"),
                &format!("bar{i}"),
            )
        })
        .collect()
}
