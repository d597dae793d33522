//! Freshness verdict for a compiled binary against its collected sources.
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    BinaryAbsent,
    /// Nothing was collected, so there is no evidence the binary is current.
    NoSources,
    UpToDate,
    OutOfDate { newest: PathBuf },
}

impl Verdict {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Verdict::UpToDate)
    }
}

/// Most recently modified source and its timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewestSource {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Whether `binary` exists. Only not-found counts as absent.
pub fn binary_exists(binary: &Path) -> Result<bool> {
    Ok(modified_if_exists(binary)?.is_some())
}

/// Find the newest source. Every source must be statable.
///
/// On ties the first path seen wins.
pub fn newest_source(sources: &[PathBuf]) -> Result<Option<NewestSource>> {
    let mut newest: Option<NewestSource> = None;
    for path in sources {
        let modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .with_context(|| format!("cannot get file info for {}", path.display()))?;
        let replace = match &newest {
            Some(current) => modified > current.modified,
            None => true,
        };
        if replace {
            newest = Some(NewestSource {
                path: path.clone(),
                modified,
            });
        }
    }
    Ok(newest)
}

pub fn evaluate(sources: &[PathBuf], binary: &Path) -> Result<Verdict> {
    let Some(binary_modified) = modified_if_exists(binary)? else {
        return Ok(Verdict::BinaryAbsent);
    };
    let Some(newest) = newest_source(sources)? else {
        return Ok(Verdict::NoSources);
    };
    tracing::debug!(
        newest = %newest.path.display(),
        sources = sources.len(),
        "newest source found"
    );
    Ok(compare(binary_modified, newest))
}

/// The binary is current only when strictly newer than every source.
pub(crate) fn compare(binary_modified: SystemTime, newest: NewestSource) -> Verdict {
    if binary_modified > newest.modified {
        Verdict::UpToDate
    } else {
        Verdict::OutOfDate {
            newest: newest.path,
        }
    }
}

fn modified_if_exists(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path).and_then(|meta| meta.modified()) {
        Ok(modified) => Ok(Some(modified)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("cannot get file info for {}", path.display()))
        }
    }
}
