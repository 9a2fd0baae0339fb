use std::num::NonZeroU32;

use log::debug;

use crate::gateway::{DnsRecord, GatewayResult, ZoneGateway};

/// Records per page when none is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(20).unwrap();

/// Walks a zone's records one page at a time, starting at
/// page 1.
///
/// Yields each non-empty page. Stops after a page shorter than
/// the page size, after an empty page, or after the first
/// error.
pub struct RecordPages<'a> {
    gateway: &'a dyn ZoneGateway,
    zone_id: &'a str,
    page_size: u32,
    next_page: u32,
    done: bool,
}

impl<'a> RecordPages<'a> {
    #[must_use]
    pub fn new(gateway: &'a dyn ZoneGateway, zone_id: &'a str, page_size: NonZeroU32) -> Self {
        Self {
            gateway,
            zone_id,
            page_size: page_size.get(),
            next_page: 1,
            done: false,
        }
    }
}

impl Iterator for RecordPages<'_> {
    type Item = GatewayResult<Vec<DnsRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let page = self.next_page;
        debug!("listing records of zone {} (page {page})", self.zone_id);
        match self.gateway.list_records(self.zone_id, page, self.page_size) {
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(records) if records.is_empty() => {
                self.done = true;
                None
            }
            Ok(records) => {
                if records.len() < self.page_size as usize {
                    self.done = true;
                } else {
                    self.next_page += 1;
                }
                Some(Ok(records))
            }
        }
    }
}

/// What [`find_record`] looks for. All three fields must match
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordQuery<'a> {
    pub record_type: &'a str,
    /// Fully-qualified record name.
    pub name: &'a str,
    pub content: &'a str,
}

impl RecordQuery<'_> {
    #[must_use]
    pub fn matches(&self, record: &DnsRecord) -> bool {
        record.record_type == self.record_type
            && record.name == self.name
            && record.content == self.content
    }
}

/// Find the first record in `zone_id` matching `query`.
///
/// Scans pages in provider order and stops requesting pages as
/// soon as a match is found. Returns `Ok(None)` when the records
/// run out without a match.
pub fn find_record(
    gateway: &dyn ZoneGateway,
    zone_id: &str,
    query: &RecordQuery<'_>,
    page_size: NonZeroU32,
) -> GatewayResult<Option<DnsRecord>> {
    for page in RecordPages::new(gateway, zone_id, page_size) {
        if let Some(found) = page?.into_iter().find(|r| query.matches(r)) {
            debug!("matched record {} in zone {zone_id}", found.id);
            return Ok(Some(found));
        }
    }
    Ok(None)
}
