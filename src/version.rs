//! Build and version metadata, embedded by `vergen` at compile time.

use std::fmt;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

const UNKNOWN: &str = "unknown";

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => UNKNOWN,
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => UNKNOWN,
};

/// RFC 3339 build timestamp, or "unknown" if unavailable.
pub const BUILD_TIMESTAMP: &str = match option_env!("VERGEN_BUILD_TIMESTAMP") {
    Some(ts) => ts,
    None => UNKNOWN,
};

/// Everything known about the running build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    pub sha: &'static str,
    pub dirty: bool,
    pub built_at: &'static str,
}

impl BuildInfo {
    /// Metadata of this binary.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            branch: GIT_BRANCH,
            sha: GIT_SHA,
            dirty: option_env!("VERGEN_GIT_DIRTY") == Some("true"),
            built_at: BUILD_TIMESTAMP,
        }
    }

    /// Commit SHA shortened to 7 characters.
    pub fn short_sha(&self) -> &'static str {
        self.sha.get(..7).unwrap_or(self.sha)
    }
}

/// `{version}+{branch}.{sha}`, with a `.dirty` suffix for modified trees.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}.{}", self.version, self.branch, self.short_sha())?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// Full version string of this binary, e.g. `0.1.0+main.abc1234`.
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}
