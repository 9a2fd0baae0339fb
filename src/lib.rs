//! Bulk zone and DNS record operations for Cloudflare.
//!
//! `bulkdns` reads a list of domain names and applies one
//! operation to each of them, strictly one domain at a time,
//! writing a CSV row for every zone or record it touches.
//!
//! # Overview
//!
//! A run wires together:
//!
//! - A [`ZoneGateway`](gateway::ZoneGateway) for the provider API
//!   (e.g. [`Cloudflare`])
//! - An [`Executor`] that drives each domain through one of the
//!   bulk operations
//! - An [`OutcomeSink`](outcome::OutcomeSink) that receives one
//!   [`Outcome`] per unit of work (e.g. [`Report`], which writes
//!   CSV)
//!
//! # Operations
//!
//! | Command | Executor method | Outcomes |
//! |---|---|---|
//! | `add-domains` | [`Executor::create_zone`] | one per domain |
//! | `delete-all-records` | [`Executor::delete_all_records`] | one per record |
//! | `add-records` | [`Executor::add_record`] | one per domain |
//! | `edit-records` | [`Executor::edit_record`] | one per domain |
//! | `list-records` | [`Executor::list_records`] | one per record |
//! | `delete-domains` | [`Executor::delete_zone`] | one per domain |
//!
//! Operations that need an existing zone report a single
//! "zone not found" failure when the lookup comes back empty and
//! make no record calls.
//!
//! # Pagination
//!
//! Records are read through [`RecordPages`](locator::RecordPages),
//! page 1 first, until a page comes back shorter than the page
//! size (20 by default). Editing uses
//! [`find_record`](locator::find_record), which stops at the first
//! record whose type, name and content match.
//!
//! # Errors
//!
//! Expected conditions (zone already exists, zone not found,
//! record not found) are always outcomes. Other provider errors
//! follow the [`ErrorPolicy`]: reported by default, fatal under
//! [`ErrorPolicy::Strict`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use bulkdns::{Cloudflare, Executor, Outcome, Settings, Zone};
//!
//! fn main() -> anyhow::Result<()> {
//!     let gateway = Cloudflare::new(Settings::from_env()?);
//!     let executor = Executor::new(&gateway);
//!
//!     let mut outcomes: Vec<Outcome<Zone>> = Vec::new();
//!     for domain in ["example.com", "example.org"] {
//!         executor.create_zone(domain, &mut outcomes)?;
//!     }
//!
//!     for outcome in &outcomes {
//!         match outcome {
//!             Outcome::Success(zone) => println!("{} {}", zone.name, zone.status),
//!             Outcome::Failure { error, .. } => println!("failed: {error}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Allow noisy pedantic lints that don't add value for a
// command-line tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod bulk;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod gateway;
pub mod locator;
pub mod outcome;
pub mod report;

pub use bulk::{ErrorPolicy, Executor, RecordEdit, RecordSpec};
pub use cli::Cli;
pub use config::{Credentials, Settings};
pub use error::{BulkError, BulkResult};
pub use gateway::cloudflare::Cloudflare;
pub use gateway::{DnsRecord, NewRecord, ProviderError, Zone, ZoneGateway};
pub use locator::{RecordPages, RecordQuery, find_record};
pub use outcome::{OperationError, Outcome, OutcomeSink};
pub use report::{Operation, Report};
