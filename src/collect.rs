//! Source discovery for a package and its project-owned imports.
//!
//! Imported packages are queried on a bounded set of scoped worker threads
//! that pull from a shared cursor and append into one mutex-guarded list.
//! The first failure stops workers from taking new packages; queries already
//! in flight finish before the error is returned.
use crate::boundary::ProjectBoundary;
use crate::gateway::PackageGateway;
use anyhow::Result;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Instant;

/// Collect absolute paths of every source contributing to `root`.
///
/// The root package is never boundary-filtered. Order is unspecified and
/// duplicates are possible.
pub fn collect_sources<G>(
    gateway: &G,
    root: &str,
    boundary: &ProjectBoundary,
    source_root: &Path,
    jobs: NonZeroUsize,
) -> Result<Vec<PathBuf>>
where
    G: PackageGateway + ?Sized,
{
    let start = Instant::now();
    let mut sources = package_sources(gateway, source_root, root)?;
    let imports = gateway.direct_imports(root)?;
    let internal: Vec<&str> = imports
        .iter()
        .map(String::as_str)
        .filter(|package| boundary.contains(package))
        .collect();

    tracing::debug!(
        package = root,
        imports = imports.len(),
        internal = internal.len(),
        prefix = boundary.prefix(),
        "filtered imports"
    );

    sources.extend(collect_parallel(gateway, source_root, &internal, jobs)?);

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis(),
        packages = internal.len() + 1,
        files = sources.len(),
        "sources collected"
    );
    Ok(sources)
}

fn collect_parallel<G>(
    gateway: &G,
    source_root: &Path,
    packages: &[&str],
    jobs: NonZeroUsize,
) -> Result<Vec<PathBuf>>
where
    G: PackageGateway + ?Sized,
{
    if packages.is_empty() {
        return Ok(Vec::new());
    }
    let workers = jobs.get().min(packages.len());
    let cursor = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let collected: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
    let failure: Mutex<Option<anyhow::Error>> = Mutex::new(None);

    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| {
                while !stop.load(Ordering::Acquire) {
                    let idx = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(package) = packages.get(idx) else {
                        break;
                    };
                    match package_sources(gateway, source_root, package) {
                        Ok(paths) => lock(&collected).extend(paths),
                        Err(err) => {
                            stop.store(true, Ordering::Release);
                            lock(&failure).get_or_insert(err);
                        }
                    }
                }
            });
        }
    });

    if let Some(err) = failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
        return Err(err);
    }
    Ok(collected
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner))
}

fn package_sources<G>(gateway: &G, source_root: &Path, package: &str) -> Result<Vec<PathBuf>>
where
    G: PackageGateway + ?Sized,
{
    let files = gateway.own_source_files(package)?;
    Ok(files
        .iter()
        .map(|file| source_path(source_root, package, file))
        .collect())
}

/// `<source_root>/<package>/<file>`, the GOPATH layout for package sources.
pub(crate) fn source_path(source_root: &Path, package: &str, file: &str) -> PathBuf {
    source_root.join(package).join(file)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "collect_tests.rs"]
mod tests;
