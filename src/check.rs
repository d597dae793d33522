//! One freshness check from resolved settings to a printable report.
use crate::collect::collect_sources;
use crate::config::Settings;
use crate::freshness::{self, Verdict};
use crate::gateway::PackageGateway;
use anyhow::Result;
use std::path::Path;

pub const EXIT_UP_TO_DATE: u8 = 0;
pub const EXIT_STALE: u8 = 1;
pub const EXIT_INTERNAL_ERROR: u8 = 255;

/// Check the binary first so a missing one never costs a `go list` round-trip.
pub fn run_check<G>(settings: &Settings, gateway: &G) -> Result<Verdict>
where
    G: PackageGateway + ?Sized,
{
    if !freshness::binary_exists(&settings.binary)? {
        tracing::debug!(binary = %settings.binary.display(), "binary missing");
        return Ok(Verdict::BinaryAbsent);
    }
    let sources = collect_sources(
        gateway,
        &settings.package,
        &settings.boundary,
        &settings.source_root,
        settings.jobs,
    )?;
    freshness::evaluate(&sources, &settings.binary)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub message: String,
    pub exit_code: u8,
}

impl Report {
    pub fn new(binary: &Path, verdict: &Verdict) -> Self {
        let binary = binary.display();
        let message = match verdict {
            Verdict::BinaryAbsent => format!("{binary} is out of date because it does not exist"),
            Verdict::NoSources => {
                format!("{binary} is out of date because no source files were found")
            }
            Verdict::UpToDate => format!("{binary} is up to date"),
            Verdict::OutOfDate { newest } => {
                format!("{binary} is out of date with {}", newest.display())
            }
        };
        let exit_code = if verdict.is_up_to_date() {
            EXIT_UP_TO_DATE
        } else {
            EXIT_STALE
        };
        Self { message, exit_code }
    }
}

/// Outermost context on the first line, the underlying cause chain on the second.
pub fn render_error(err: &anyhow::Error) -> String {
    let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
    if causes.is_empty() {
        err.to_string()
    } else {
        format!("{err}\n{}", causes.join(": "))
    }
}
