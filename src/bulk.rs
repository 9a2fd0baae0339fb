use std::num::NonZeroU32;

use log::{info, warn};

use crate::error::{BulkError, BulkResult};
use crate::gateway::{self, DnsRecord, NewRecord, ProviderError, Zone, ZoneGateway};
use crate::locator::{self, DEFAULT_PAGE_SIZE, RecordPages, RecordQuery};
use crate::outcome::{OperationError, Outcome, OutcomeSink};

/// What to do with a provider error that is not an expected
/// domain condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Report it as a failure outcome and carry on.
    #[default]
    Report,
    /// Abort the run, except for record create and update
    /// errors, which are always reported.
    Strict,
}

/// Record to add to every zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    pub record_type: String,
    /// Label under the zone, empty for the apex.
    pub label: String,
    pub content: String,
}

/// Content change applied to one record in every zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEdit {
    pub record_type: String,
    /// Label under the zone, empty for the apex.
    pub label: String,
    pub old_content: String,
    pub new_content: String,
}

/// Runs bulk operations against one domain at a time.
///
/// Every operation reports through an [`OutcomeSink`] and never
/// prints or writes files. `Err` from an operation is fatal for
/// the whole run; everything else is an outcome.
pub struct Executor<'g> {
    gateway: &'g dyn ZoneGateway,
    page_size: NonZeroU32,
    policy: ErrorPolicy,
}

impl<'g> Executor<'g> {
    #[must_use]
    pub const fn new(gateway: &'g dyn ZoneGateway) -> Self {
        Self {
            gateway,
            page_size: DEFAULT_PAGE_SIZE,
            policy: ErrorPolicy::Report,
        }
    }

    #[must_use]
    pub const fn page_size(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub const fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create a zone for `domain`.
    ///
    /// A zone that already exists is reported as a failure
    /// carrying a placeholder zone with the domain name.
    pub fn create_zone(&self, domain: &str, sink: &mut dyn OutcomeSink<Zone>) -> BulkResult<()> {
        info!("creating zone {domain}");
        match self.gateway.create_zone(domain) {
            Ok(zone) => sink.accept(domain, Outcome::Success(zone)),
            Err(e) if e.is_already_exists() => {
                warn!("zone {domain} already exists");
                sink.accept(
                    domain,
                    Outcome::Failure {
                        error: OperationError::ZoneAlreadyExists(e),
                        partial: Some(Zone::named(domain)),
                    },
                )
            }
            Err(e) => self.escalate(domain, sink, e),
        }
    }

    /// Delete every record of the zone, one outcome per record.
    ///
    /// All pages are read before the first delete so that
    /// deletions cannot shift records between pages.
    pub fn delete_all_records(
        &self,
        domain: &str,
        sink: &mut dyn OutcomeSink<DnsRecord>,
    ) -> BulkResult<()> {
        info!("deleting all records of {domain}");
        let Some(zone) = self.zone_for(domain, sink)? else {
            return Ok(());
        };

        let mut records = Vec::new();
        for page in RecordPages::new(self.gateway, &zone.id, self.page_size) {
            match page {
                Ok(page) => records.extend(page),
                Err(e) => return self.escalate(domain, sink, e),
            }
        }

        for record in records {
            match self.gateway.delete_record(&zone.id, &record.id) {
                Ok(echoed) => sink.accept(domain, Outcome::Success(fill_from(echoed, record)))?,
                Err(e) => self.escalate(domain, sink, e)?,
            }
        }
        Ok(())
    }

    /// Add `spec` to the zone. Create errors are always
    /// reported, never fatal.
    pub fn add_record(
        &self,
        domain: &str,
        spec: &RecordSpec,
        sink: &mut dyn OutcomeSink<DnsRecord>,
    ) -> BulkResult<()> {
        info!("adding {} record {:?} to {domain}", spec.record_type, spec.label);
        let Some(zone) = self.zone_for(domain, sink)? else {
            return Ok(());
        };

        let name = gateway::qualified_name(&spec.label, domain);
        let record = NewRecord::new(&spec.record_type, &name, &spec.content);
        match self.gateway.create_record(&zone.id, &record) {
            Ok(created) => sink.accept(domain, Outcome::Success(created)),
            Err(e) => Self::report(domain, sink, OperationError::Provider(e)),
        }
    }

    /// Replace the content of the first record matching the
    /// type, name and old content. Update errors are always
    /// reported, never fatal.
    pub fn edit_record(
        &self,
        domain: &str,
        edit: &RecordEdit,
        sink: &mut dyn OutcomeSink<DnsRecord>,
    ) -> BulkResult<()> {
        info!("editing {} record {:?} of {domain}", edit.record_type, edit.label);
        let Some(zone) = self.zone_for(domain, sink)? else {
            return Ok(());
        };

        let name = gateway::qualified_name(&edit.label, domain);
        let query = RecordQuery {
            record_type: &edit.record_type,
            name: &name,
            content: &edit.old_content,
        };
        let existing = match locator::find_record(self.gateway, &zone.id, &query, self.page_size) {
            Ok(Some(record)) => record,
            Ok(None) => return Self::report(domain, sink, OperationError::RecordNotFound),
            Err(e) => return self.escalate(domain, sink, e),
        };

        let record = NewRecord::new(&edit.record_type, &name, &edit.new_content);
        match self.gateway.update_record(&zone.id, &existing.id, &record) {
            Ok(updated) => sink.accept(domain, Outcome::Success(updated)),
            Err(e) => Self::report(domain, sink, OperationError::Provider(e)),
        }
    }

    /// Report every record of the zone, one outcome per record.
    pub fn list_records(
        &self,
        domain: &str,
        sink: &mut dyn OutcomeSink<DnsRecord>,
    ) -> BulkResult<()> {
        info!("listing records of {domain}");
        let Some(zone) = self.zone_for(domain, sink)? else {
            return Ok(());
        };

        for page in RecordPages::new(self.gateway, &zone.id, self.page_size) {
            match page {
                Ok(page) => {
                    for record in page {
                        sink.accept(domain, Outcome::Success(record))?;
                    }
                }
                Err(e) => return self.escalate(domain, sink, e),
            }
        }
        Ok(())
    }

    /// Delete the zone itself.
    pub fn delete_zone(&self, domain: &str, sink: &mut dyn OutcomeSink<Zone>) -> BulkResult<()> {
        info!("deleting zone {domain}");
        let Some(zone) = self.zone_for(domain, sink)? else {
            return Ok(());
        };

        match self.gateway.delete_zone(&zone.id) {
            Ok(echoed) => sink.accept(
                domain,
                Outcome::Success(Zone {
                    id: echoed.id,
                    ..zone
                }),
            ),
            Err(e) => self.escalate(domain, sink, e),
        }
    }

    /// Look up the zone for `domain`, reporting its absence.
    fn zone_for<T>(&self, domain: &str, sink: &mut dyn OutcomeSink<T>) -> BulkResult<Option<Zone>> {
        match self.gateway.lookup_zone(domain) {
            Ok(Some(zone)) => Ok(Some(zone)),
            Ok(None) => {
                Self::report(domain, sink, OperationError::ZoneNotFound(domain.to_string()))?;
                Ok(None)
            }
            Err(e) => {
                self.escalate(domain, sink, e)?;
                Ok(None)
            }
        }
    }

    fn escalate<T>(
        &self,
        domain: &str,
        sink: &mut dyn OutcomeSink<T>,
        error: ProviderError,
    ) -> BulkResult<()> {
        match self.policy {
            ErrorPolicy::Report => Self::report(domain, sink, OperationError::Provider(error)),
            ErrorPolicy::Strict => Err(BulkError::Provider(error)),
        }
    }

    fn report<T>(
        domain: &str,
        sink: &mut dyn OutcomeSink<T>,
        error: OperationError,
    ) -> BulkResult<()> {
        warn!("{domain}: {error}");
        sink.accept(domain, Outcome::failed(error))
    }
}

/// Complete a delete echo, which may carry only the id, with
/// the fields of the listed record.
fn fill_from(echoed: DnsRecord, listed: DnsRecord) -> DnsRecord {
    let pick = |echo: String, list: String| if echo.is_empty() { list } else { echo };
    DnsRecord {
        id: pick(echoed.id, listed.id),
        record_type: pick(echoed.record_type, listed.record_type),
        name: pick(echoed.name, listed.name),
        content: pick(echoed.content, listed.content),
    }
}
