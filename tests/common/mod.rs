//! Shared test infrastructure for integration tests.
//!
//! A `GoWorkspace` is a scratch GOPATH plus a fake `go` script that answers
//! `go list -f <template> <pkg>` from files under `meta/<pkg>/`.

use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const FAKE_GO: &str = r#"meta="$(dirname "$0")/meta/$4"
case "$3" in
  *GoFiles*) kind=sources ;;
  *) kind=imports ;;
esac
if [ -f "$meta/$kind.err" ]; then
  cat "$meta/$kind.err"
  exit 1
fi
if [ -f "$meta/$kind" ]; then
  cat "$meta/$kind"
  exit 0
fi
echo "can't load package: package $4: cannot find package" >&2
exit 1
"#;

/// Output of one binfresh invocation.
#[derive(Debug)]
pub struct RunResult {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl RunResult {
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

pub struct GoWorkspace {
    pub dir: TempDir,
}

impl GoWorkspace {
    pub fn new() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("go.sh"), FAKE_GO)?;
        Ok(Self { dir })
    }

    pub fn gopath(&self) -> &Path {
        self.dir.path()
    }

    pub fn binary_path(&self) -> PathBuf {
        self.dir.path().join("out").join("app")
    }

    /// Register a package: its import list and its sources with their mtimes.
    ///
    /// The source listing is wrapped in quotes the way `go list` echoes a
    /// quoted template.
    pub fn package(
        &self,
        package: &str,
        imports: &[&str],
        sources: &[(&str, i64)],
    ) -> anyhow::Result<Vec<PathBuf>> {
        let meta = self.meta_dir(package)?;
        fs::write(meta.join("imports"), format!("{}\n", imports.join("\n")))?;
        let names: Vec<&str> = sources.iter().map(|(name, _)| *name).collect();
        fs::write(meta.join("sources"), format!("'{}'\n", names.join("\n")))?;

        let package_dir = self.gopath().join("src").join(package);
        fs::create_dir_all(&package_dir)?;
        let mut paths = Vec::new();
        for (name, secs) in sources {
            let path = package_dir.join(name);
            fs::write(&path, format!("package {name}\n"))?;
            set_file_mtime(&path, FileTime::from_unix_time(*secs, 0))?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Make one query for `package` fail with `diagnostic` on stdout.
    pub fn fail_query(&self, package: &str, kind: &str, diagnostic: &str) -> anyhow::Result<()> {
        let meta = self.meta_dir(package)?;
        fs::write(meta.join(format!("{kind}.err")), format!("{diagnostic}\n"))?;
        Ok(())
    }

    pub fn write_binary(&self, secs: i64) -> anyhow::Result<PathBuf> {
        let path = self.binary_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, b"\x7fELF")?;
        set_file_mtime(&path, FileTime::from_unix_time(secs, 0))?;
        Ok(path)
    }

    /// Run binfresh with the fake go tool and this workspace as GOPATH.
    pub fn run(&self, args: &[&str]) -> anyhow::Result<RunResult> {
        let go = format!(
            "sh {}",
            shell_words::quote(&self.gopath().join("go.sh").display().to_string())
        );
        let mut command = self.command(args);
        command
            .env("BINFRESH_GO", go)
            .env("GOPATH", self.gopath());
        run_command(&mut command)
    }

    /// Run binfresh with no go tool reachable and no GOPATH or HOME.
    pub fn run_without_toolchain(&self, args: &[&str]) -> anyhow::Result<RunResult> {
        let empty_path = self.gopath().join("empty-path");
        fs::create_dir_all(&empty_path)?;
        let mut command = self.command(args);
        command
            .env_remove("BINFRESH_GO")
            .env_remove("GOPATH")
            .env_remove("HOME")
            .env("PATH", &empty_path);
        run_command(&mut command)
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_binfresh"));
        command.args(args).env_remove("BINFRESH_LOG");
        command
    }

    fn meta_dir(&self, package: &str) -> anyhow::Result<PathBuf> {
        let meta = self.gopath().join("meta").join(package);
        fs::create_dir_all(&meta)?;
        Ok(meta)
    }
}

fn run_command(command: &mut Command) -> anyhow::Result<RunResult> {
    let output = command.output()?;
    Ok(RunResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        code: output.status.code(),
    })
}
