//! CSV audit trail and numbered console lines for bulk runs.
//!
//! [`Report`] is an [`OutcomeSink`] for both zone and record
//! outcomes. Each outcome becomes one CSV row and one console
//! line, numbered from 1 in the order outcomes arrive.

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::Path;

use crate::error::{BulkError, BulkResult};
use crate::gateway::{DnsRecord, Zone};
use crate::outcome::{Outcome, OutcomeSink};

/// The bulk operation a report is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddDomains,
    DeleteAllRecords,
    AddRecords,
    EditRecords,
    ListRecords,
    DeleteDomains,
}

impl Operation {
    /// Name used on the command line and in default file names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::AddDomains => "add-domains",
            Self::DeleteAllRecords => "delete-all-records",
            Self::AddRecords => "add-records",
            Self::EditRecords => "edit-records",
            Self::ListRecords => "list-records",
            Self::DeleteDomains => "delete-domains",
        }
    }

    /// Word reported for a successful unit.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::AddDomains | Self::AddRecords => "added",
            Self::DeleteAllRecords | Self::DeleteDomains => "deleted",
            Self::EditRecords => "edited",
            Self::ListRecords => "listed",
        }
    }

    #[must_use]
    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::AddDomains => &["name", "status", "id", "type", "created_on"],
            Self::DeleteAllRecords => &["zone name", "record id", "status"],
            Self::AddRecords | Self::EditRecords => &["zone name", "status", "record id"],
            Self::ListRecords => &["zone name", "record id", "type", "name", "content", "status"],
            Self::DeleteDomains => &["zone name", "zone id", "status"],
        }
    }
}

fn status<T>(operation: Operation, outcome: &Outcome<T>) -> String {
    outcome
        .error()
        .map_or_else(|| operation.verb().to_string(), |e| format!("failed: {e}"))
}

/// CSV columns for a zone outcome.
#[must_use]
pub fn zone_row(operation: Operation, domain: &str, outcome: &Outcome<Zone>) -> Vec<String> {
    let zone = outcome.payload();
    let id = zone.map(|z| z.id.clone()).unwrap_or_default();

    match operation {
        Operation::AddDomains => {
            let name = zone
                .map(|z| z.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| domain.to_string());
            let state = match (outcome, zone) {
                (Outcome::Success(_), Some(z)) if !z.status.is_empty() => z.status.clone(),
                _ => status(operation, outcome),
            };
            vec![
                name,
                state,
                id,
                zone.and_then(|z| z.zone_type.clone()).unwrap_or_default(),
                zone.and_then(|z| z.created_on.clone()).unwrap_or_default(),
            ]
        }
        _ => vec![domain.to_string(), id, status(operation, outcome)],
    }
}

/// CSV columns for a record outcome.
#[must_use]
pub fn record_row(operation: Operation, domain: &str, outcome: &Outcome<DnsRecord>) -> Vec<String> {
    let record = outcome.payload().cloned().unwrap_or_default();
    let status = status(operation, outcome);

    match operation {
        Operation::AddRecords | Operation::EditRecords => {
            vec![domain.to_string(), status, record.id]
        }
        Operation::ListRecords => vec![
            domain.to_string(),
            record.id,
            record.record_type,
            record.name,
            record.content,
            status,
        ],
        _ => vec![domain.to_string(), record.id, status],
    }
}

/// Human-readable line for the `seq`-th outcome.
#[must_use]
pub fn console_line<T>(
    operation: Operation,
    seq: usize,
    domain: &str,
    outcome: &Outcome<T>,
    detail: &str,
) -> String {
    match outcome.error() {
        None if detail.is_empty() => format!("{} [{seq}]: {domain}", operation.verb()),
        None => format!("{} [{seq}]: {domain} {detail}", operation.verb()),
        Some(e) => format!("failed [{seq}]: {domain}: {e}"),
    }
}

/// Writes outcomes as CSV rows to `W` and console lines to `C`.
pub struct Report<W: Write, C: Write> {
    operation: Operation,
    csv: csv::Writer<W>,
    console: C,
    count: usize,
}

impl Report<File, Stdout> {
    /// Create a report file at `path`, echoing lines to stdout.
    pub fn create(operation: Operation, path: &Path) -> BulkResult<Self> {
        let file = File::create(path)?;
        Self::new(operation, file, io::stdout())
    }
}

impl<W: Write, C: Write> Report<W, C> {
    /// Start a report, writing the header row immediately.
    pub fn new(operation: Operation, out: W, console: C) -> BulkResult<Self> {
        let mut csv = csv::Writer::from_writer(out);
        csv.write_record(operation.headers())?;
        Ok(Self {
            operation,
            csv,
            console,
            count: 0,
        })
    }

    /// Number of outcomes written so far.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Flush and return the underlying writers.
    pub fn finish(mut self) -> BulkResult<(W, C)> {
        self.csv.flush()?;
        self.console.flush()?;
        let out = self
            .csv
            .into_inner()
            .map_err(|e| BulkError::Io(e.into_error()))?;
        Ok((out, self.console))
    }

    fn write<T>(
        &mut self,
        domain: &str,
        outcome: &Outcome<T>,
        row: &[String],
        detail: &str,
    ) -> BulkResult<()> {
        self.count += 1;
        self.csv.write_record(row)?;
        // Rows written before a fatal error must reach the file.
        self.csv.flush()?;
        let line = console_line(self.operation, self.count, domain, outcome, detail);
        writeln!(self.console, "{line}")?;
        Ok(())
    }
}

impl<W: Write, C: Write> OutcomeSink<Zone> for Report<W, C> {
    fn accept(&mut self, domain: &str, outcome: Outcome<Zone>) -> BulkResult<()> {
        let row = zone_row(self.operation, domain, &outcome);
        let detail = outcome.payload().map(|z| z.id.clone()).unwrap_or_default();
        self.write(domain, &outcome, &row, &detail)
    }
}

impl<W: Write, C: Write> OutcomeSink<DnsRecord> for Report<W, C> {
    fn accept(&mut self, domain: &str, outcome: Outcome<DnsRecord>) -> BulkResult<()> {
        let row = record_row(self.operation, domain, &outcome);
        let detail = match (&outcome, self.operation) {
            (Outcome::Success(r), Operation::ListRecords) => {
                format!("{} {} {} {}", r.id, r.record_type, r.name, r.content)
            }
            (Outcome::Success(r), _) => r.id.clone(),
            _ => String::new(),
        };
        self.write(domain, &outcome, &row, &detail)
    }
}
