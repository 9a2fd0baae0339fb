use std::io::Write;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use log::info;

use crate::bulk::{ErrorPolicy, Executor, RecordEdit, RecordSpec};
use crate::cmd;
use crate::config::Settings;
use crate::error::{BulkError, BulkResult};
use crate::gateway::ZoneGateway;
use crate::gateway::cloudflare::Cloudflare;
use crate::report::{Operation, Report};

#[derive(Parser, Debug)]
#[command(name = "bulkdns")]
#[command(about = "Bulk zone and DNS record operations with a CSV audit trail")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Records requested per page
    #[arg(long, global = true, default_value = "20")]
    pub page_size: NonZeroU32,

    /// CSV file to write (default: <command>-<timestamp>.csv)
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Abort the run on unexpected provider errors instead of
    /// reporting them
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u32,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a zone for every domain
    AddDomains {
        /// File with one domain per line
        domains: PathBuf,
    },

    /// Delete every DNS record of every domain
    DeleteAllRecords {
        /// File with one domain per line
        domains: PathBuf,
    },

    /// Add one DNS record to every domain
    AddRecords {
        /// Record type (A, TXT, ...)
        #[arg(long = "type")]
        record_type: String,

        /// Record label, empty for the zone apex
        #[arg(long, default_value = "")]
        name: String,

        /// Record content
        #[arg(long)]
        content: String,

        /// File with one domain per line
        domains: PathBuf,
    },

    /// Change the content of one DNS record in every domain
    EditRecords {
        /// Record type (A, TXT, ...)
        #[arg(long = "type")]
        record_type: String,

        /// Record label, empty for the zone apex
        #[arg(long, default_value = "")]
        name: String,

        /// Content the record has now
        #[arg(long)]
        old_content: String,

        /// Content to set
        #[arg(long)]
        new_content: String,

        /// File with one domain per line
        domains: PathBuf,
    },

    /// List every DNS record of every domain
    ListRecords {
        /// File with one domain per line
        domains: PathBuf,
    },

    /// Delete the zone of every domain
    DeleteDomains {
        /// File with one domain per line
        domains: PathBuf,
    },
}

impl Command {
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::AddDomains { .. } => Operation::AddDomains,
            Self::DeleteAllRecords { .. } => Operation::DeleteAllRecords,
            Self::AddRecords { .. } => Operation::AddRecords,
            Self::EditRecords { .. } => Operation::EditRecords,
            Self::ListRecords { .. } => Operation::ListRecords,
            Self::DeleteDomains { .. } => Operation::DeleteDomains,
        }
    }

    #[must_use]
    pub fn domains_file(&self) -> &Path {
        match self {
            Self::AddDomains { domains }
            | Self::DeleteAllRecords { domains }
            | Self::AddRecords { domains, .. }
            | Self::EditRecords { domains, .. }
            | Self::ListRecords { domains }
            | Self::DeleteDomains { domains } => domains,
        }
    }
}

impl Cli {
    #[must_use]
    pub const fn policy(&self) -> ErrorPolicy {
        if self.strict {
            ErrorPolicy::Strict
        } else {
            ErrorPolicy::Report
        }
    }

    /// Where the CSV report goes.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            PathBuf::from(format!("{}-{secs}.csv", self.command.operation().slug()))
        })
    }

    /// Run the command against Cloudflare with settings from the
    /// environment. Returns the path of the CSV report.
    pub fn run(&self) -> BulkResult<PathBuf> {
        if !cmd::command_exists("curl") {
            return Err(BulkError::CommandNotFound("curl".into()));
        }
        let settings = Settings::from_env()?;
        let gateway = Cloudflare::new(settings).timeout(self.timeout);
        let domains = read_domains(self.command.domains_file())?;

        let path = self.output_path();
        let mut report = Report::create(self.command.operation(), &path)?;
        let executor = Executor::new(&gateway)
            .page_size(self.page_size)
            .policy(self.policy());

        let result = run_batch(&self.command, &executor, &domains, &mut report);
        let written = report.count();
        report.finish()?;
        result?;

        info!("{written} outcome(s) written to {}", path.display());
        Ok(path)
    }
}

/// Apply `command` to each domain in order.
///
/// Stops at the first fatal error. Outcomes reported before it
/// stay in `report`.
pub fn run_batch<W: Write, C: Write>(
    command: &Command,
    executor: &Executor<'_>,
    domains: &[String],
    report: &mut Report<W, C>,
) -> BulkResult<()> {
    for domain in domains {
        match command {
            Command::AddDomains { .. } => executor.create_zone(domain, report)?,
            Command::DeleteAllRecords { .. } => executor.delete_all_records(domain, report)?,
            Command::AddRecords {
                record_type,
                name,
                content,
                ..
            } => {
                let spec = RecordSpec {
                    record_type: record_type.clone(),
                    label: name.clone(),
                    content: content.clone(),
                };
                executor.add_record(domain, &spec, report)?;
            }
            Command::EditRecords {
                record_type,
                name,
                old_content,
                new_content,
                ..
            } => {
                let edit = RecordEdit {
                    record_type: record_type.clone(),
                    label: name.clone(),
                    old_content: old_content.clone(),
                    new_content: new_content.clone(),
                };
                executor.edit_record(domain, &edit, report)?;
            }
            Command::ListRecords { .. } => executor.list_records(domain, report)?,
            Command::DeleteDomains { .. } => executor.delete_zone(domain, report)?,
        }
    }
    Ok(())
}

/// Run `command` over `domains` with any gateway, writing the
/// report to in-memory or custom writers.
pub fn run_with<W: Write, C: Write>(
    cli: &Cli,
    gateway: &dyn ZoneGateway,
    domains: &[String],
    out: W,
    console: C,
) -> BulkResult<(W, C)> {
    let mut report = Report::new(cli.command.operation(), out, console)?;
    let executor = Executor::new(gateway)
        .page_size(cli.page_size)
        .policy(cli.policy());
    run_batch(&cli.command, &executor, domains, &mut report)?;
    report.finish()
}

/// Read a domain list file.
pub fn read_domains(path: &Path) -> BulkResult<Vec<String>> {
    if !path.exists() {
        return Err(BulkError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(parse_domains(&content))
}

/// One domain per line, in file order. Blank lines and lines
/// starting with `#` are skipped.
#[must_use]
pub fn parse_domains(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}
