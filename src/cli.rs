//! CLI argument parsing.
//!
//! Required flags are declared optional so missing ones can be reported
//! together instead of one at a time.
use crate::boundary::BoundaryMode;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "binfresh",
    version,
    about = "Exit 0 when a compiled Go command is newer than every source it is built from",
    after_help = "Exit status:\n  0    binary is up to date\n  1    binary is missing or out of date, or required flags are missing\n  255  internal error (file metadata or go list failure)\n\nExamples:\n  binfresh -c github.com/acme/tool/cmd/tool -g bin/tool\n  binfresh -c github.com/acme/tool/cmd/tool -g bin/tool -p github.com/acme/tool"
)]
pub struct RootArgs {
    /// (required) fully qualified Go package of the target command
    #[arg(short = 'c', long = "command", value_name = "PKG")]
    pub command: Option<String>,

    /// (required) path to the compiled command binary (does not need to exist)
    #[arg(short = 'g', long = "generates", value_name = "PATH")]
    pub generates: Option<PathBuf>,

    /// Project base package; imports not matching it are ignored. Defaults to -c
    #[arg(short = 'p', long = "project-prefix", value_name = "PREFIX")]
    pub project_prefix: Option<String>,

    /// How imports are matched against the project prefix
    #[arg(long, value_enum, default_value_t = BoundaryMode::Substring)]
    pub boundary: BoundaryMode,

    /// Directory package sources live under [default: $GOPATH/src]
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Go tool invocation, split like a shell command [env: BINFRESH_GO] [default: go]
    #[arg(long = "go", value_name = "CMD")]
    pub go: Option<String>,

    /// Maximum concurrent package queries [default: available parallelism]
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Check every transitive dependency instead of direct imports only
    #[arg(long)]
    pub deps: bool,

    /// Emit debug logs on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
