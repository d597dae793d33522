//! Project boundary used to tell project-owned packages apart from the
//! standard library and third-party imports.
use clap::ValueEnum;

/// How a package identifier is tested against the project prefix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BoundaryMode {
    /// The prefix may appear anywhere in the identifier.
    #[default]
    Substring,
    /// The identifier must start with the prefix at a `/` segment boundary.
    Path,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectBoundary {
    prefix: String,
    mode: BoundaryMode,
}

impl ProjectBoundary {
    pub fn new(prefix: impl Into<String>, mode: BoundaryMode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `package` belongs to the project. Blank identifiers never do.
    pub fn contains(&self, package: &str) -> bool {
        let package = package.trim();
        if package.is_empty() {
            return false;
        }
        match self.mode {
            BoundaryMode::Substring => package.contains(self.prefix.as_str()),
            BoundaryMode::Path => {
                let prefix = self.prefix.trim_end_matches('/');
                match package.strip_prefix(prefix) {
                    Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.is_empty(),
                    None => false,
                }
            }
        }
    }
}
