//! Package metadata queries against the Go toolchain.
//!
//! Every query spawns one `go list` process. There are no retries: a failed
//! query is surfaced with the tool's own output as the diagnostic.
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

const IMPORTS_TEMPLATE: &str = r#"{{join .Imports "\n"}}"#;
const DEPS_TEMPLATE: &str = r#"{{join .Deps "\n"}}"#;
const GO_FILES_TEMPLATE: &str = r#"{{join .GoFiles "\n"}}"#;

/// Source of per-package metadata.
///
/// Implementations are shared across collector worker threads.
pub trait PackageGateway: Sync {
    /// Import identifiers of `package`, in the order the tool reports them.
    fn direct_imports(&self, package: &str) -> Result<Vec<String>>;

    /// Bare file names of the sources that make up `package` itself.
    fn own_source_files(&self, package: &str) -> Result<Vec<String>>;
}

/// Which import list the imports query reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportScope {
    /// Imports named directly by the package (`.Imports`).
    #[default]
    Direct,
    /// Every package in the dependency closure (`.Deps`).
    Transitive,
}

impl ImportScope {
    fn template(self) -> &'static str {
        match self {
            ImportScope::Direct => IMPORTS_TEMPLATE,
            ImportScope::Transitive => DEPS_TEMPLATE,
        }
    }
}

/// Resolved invocation prefix for the Go tool, e.g. `go` or `nix run nixpkgs#go --`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Gateway backed by `go list -f <template> <package>`.
#[derive(Clone, Debug)]
pub struct GoListGateway {
    command: GoCommand,
    scope: ImportScope,
}

impl GoListGateway {
    pub fn new(command: GoCommand, scope: ImportScope) -> Self {
        Self { command, scope }
    }

    fn list(&self, query: &str, template: &str, package: &str) -> Result<String> {
        let start = Instant::now();
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .args(["list", "-f", template, package])
            .output()
            .with_context(|| {
                format!(
                    "spawn {} to list {query} for {package}",
                    self.command.program.display()
                )
            })?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::debug!(
            elapsed_ms,
            package,
            query,
            stdout_bytes = output.stdout.len(),
            "go list complete"
        );

        if !output.status.success() {
            let mut combined = output.stdout;
            combined.extend_from_slice(&output.stderr);
            let diagnostic = String::from_utf8_lossy(&combined).trim().to_string();
            let diagnostic = if diagnostic.is_empty() {
                format!("go list produced no output ({})", output.status)
            } else {
                diagnostic
            };
            return Err(anyhow!(diagnostic).context(format!(
                "go list {query} for {package} failed with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PackageGateway for GoListGateway {
    fn direct_imports(&self, package: &str) -> Result<Vec<String>> {
        let raw = self.list("imports", self.scope.template(), package)?;
        Ok(parse_import_list(&raw))
    }

    fn own_source_files(&self, package: &str) -> Result<Vec<String>> {
        let raw = self.list("sources", GO_FILES_TEMPLATE, package)?;
        Ok(parse_source_list(&raw))
    }
}

pub(crate) fn parse_import_list(raw: &str) -> Vec<String> {
    split_entries(raw.trim())
}

/// Source listings may arrive wrapped in a single pair of quote characters,
/// depending on how the template argument was quoted by the caller.
pub(crate) fn parse_source_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('\'').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('\'').unwrap_or(trimmed);
    split_entries(trimmed)
}

fn split_entries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
