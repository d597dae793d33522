//! Resolve CLI flags and environment into explicit settings.
//!
//! This is the only place the process environment is read; everything
//! downstream receives concrete values.
use crate::boundary::ProjectBoundary;
use crate::cli::RootArgs;
use crate::gateway::{GoCommand, ImportScope};
use anyhow::{anyhow, Context, Result};
use std::env;
use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;

pub const GO_COMMAND_ENV: &str = "BINFRESH_GO";
const DEFAULT_GO_COMMAND: &str = "go";

#[derive(Clone, Debug)]
pub struct Settings {
    pub package: String,
    pub binary: PathBuf,
    pub boundary: ProjectBoundary,
    pub source_root: PathBuf,
    pub go_command: GoCommand,
    pub import_scope: ImportScope,
    pub jobs: NonZeroUsize,
}

/// The two flags every check needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequiredInputs {
    pub package: String,
    pub binary: PathBuf,
}

/// Collect every missing required flag. Empty values count as missing.
pub fn required_inputs(args: &RootArgs) -> Result<RequiredInputs, Vec<&'static str>> {
    let package = args.command.clone().filter(|value| !value.is_empty());
    let binary = args
        .generates
        .clone()
        .filter(|value| !value.as_os_str().is_empty());
    match (package, binary) {
        (Some(package), Some(binary)) => Ok(RequiredInputs { package, binary }),
        (package, binary) => {
            let mut missing = Vec::new();
            if package.is_none() {
                missing.push("-c flag is not set");
            }
            if binary.is_none() {
                missing.push("-g flag is not set");
            }
            Err(missing)
        }
    }
}

impl Settings {
    pub fn resolve(args: &RootArgs, required: RequiredInputs) -> Result<Self> {
        Self::resolve_with_env(args, required, process_env)
    }

    pub fn resolve_with_env<F>(
        args: &RootArgs,
        required: RequiredInputs,
        env_lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let prefix = args
            .project_prefix
            .clone()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| required.package.clone());
        let source_root = match &args.source_root {
            Some(dir) => dir.clone(),
            None => default_source_root(&env_lookup)?,
        };
        let command_line = match &args.go {
            Some(command) => command.clone(),
            None => env_lookup(GO_COMMAND_ENV)
                .map(|value| value.to_string_lossy().into_owned())
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GO_COMMAND.to_string()),
        };
        let go_command = resolve_go_command(&command_line)?;
        let jobs = args.jobs.unwrap_or_else(default_jobs);
        let import_scope = if args.deps {
            ImportScope::Transitive
        } else {
            ImportScope::Direct
        };

        tracing::debug!(
            package = %required.package,
            prefix = %prefix,
            source_root = %source_root.display(),
            go = %go_command.program.display(),
            jobs = jobs.get(),
            "settings resolved"
        );

        Ok(Self {
            package: required.package,
            binary: required.binary,
            boundary: ProjectBoundary::new(prefix, args.boundary),
            source_root,
            go_command,
            import_scope,
            jobs,
        })
    }
}

/// `$GOPATH/src` using the first GOPATH entry, else the toolchain default `~/go/src`.
fn default_source_root<F>(env_lookup: &F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let gopath = env_lookup("GOPATH")
        .and_then(|value| env::split_paths(&value).find(|entry| !entry.as_os_str().is_empty()));
    let gopath = match gopath {
        Some(path) => path,
        None => dirs::home_dir()
            .map(|home| home.join("go"))
            .ok_or_else(|| anyhow!("GOPATH is not set and no home directory was found"))?,
    };
    Ok(gopath.join("src"))
}

fn resolve_go_command(command_line: &str) -> Result<GoCommand> {
    let mut parts = shell_words::split(command_line)
        .with_context(|| format!("parse go command: {command_line}"))?
        .into_iter();
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("go command is empty"))?;
    let program =
        which::which(&program).with_context(|| format!("locate go command {program}"))?;
    Ok(GoCommand {
        program,
        args: parts.collect(),
    })
}

fn process_env(key: &str) -> Option<OsString> {
    env::var_os(key)
}

fn default_jobs() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
