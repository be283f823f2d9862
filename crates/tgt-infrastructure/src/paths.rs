//! Unified path management for TGT files.
//!
//! All on-disk state lives under one config directory and one data
//! directory. Both can be redirected by setting `TGT_HOME`, which tests and
//! the CLI's `--home` flag use to keep state out of the user's profile.

use std::path::PathBuf;

/// Environment variable that relocates every TGT path.
pub const HOME_ENV: &str = "TGT_HOME";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for tgt_core::TgtError {
    fn from(err: PathError) -> Self {
        tgt_core::TgtError::config(err.to_string())
    }
}

/// Files and directories managed by TGT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// `config.toml`
    Config,
    /// Last-known session snapshot
    Snapshot,
    /// Local profile document store
    Profiles,
    /// Local identity provider accounts
    Accounts,
    /// Log directory
    Logs,
}

/// Directory layout:
///
/// ```text
/// ~/.config/tgt/               # Config directory
/// └── config.toml
///
/// ~/.local/share/tgt/          # Data directory
/// ├── session.json             # Session snapshot
/// ├── users.json               # Local profile documents
/// ├── accounts.json            # Local identity provider
/// └── logs/
///     └── tgt.log.YYYY-MM-DD
/// ```
///
/// With `TGT_HOME` (or an explicit base) both directories collapse into
/// `<base>/config` and `<base>/data`.
#[derive(Debug, Clone, Default)]
pub struct TgtPaths {
    base: Option<PathBuf>,
    data_override: Option<PathBuf>,
}

impl TgtPaths {
    /// Creates a resolver rooted at `base`, or at `TGT_HOME`, or at the
    /// platform directories.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.or_else(|| std::env::var_os(HOME_ENV).map(PathBuf::from));
        Self {
            base,
            data_override: None,
        }
    }

    /// Uses `dir` as the data directory regardless of the base.
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.data_override = dir;
        self
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|d| d.join("tgt"))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(dir) = &self.data_override {
            return Ok(dir.clone());
        }
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|d| d.join("tgt"))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Resolves the path for a managed file or directory.
    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        Ok(match service {
            ServiceType::Config => self.config_dir()?.join("config.toml"),
            ServiceType::Snapshot => self.data_dir()?.join("session.json"),
            ServiceType::Profiles => self.data_dir()?.join("users.json"),
            ServiceType::Accounts => self.data_dir()?.join("accounts.json"),
            ServiceType::Logs => self.data_dir()?.join("logs"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base() {
        let paths = TgtPaths::new(Some(PathBuf::from("/tmp/tgt-home")));
        assert_eq!(
            paths.get_path(ServiceType::Config).unwrap(),
            PathBuf::from("/tmp/tgt-home/config/config.toml")
        );
        assert_eq!(
            paths.get_path(ServiceType::Snapshot).unwrap(),
            PathBuf::from("/tmp/tgt-home/data/session.json")
        );
        assert_eq!(
            paths.get_path(ServiceType::Logs).unwrap(),
            PathBuf::from("/tmp/tgt-home/data/logs")
        );
    }

    #[test]
    fn test_data_dir_override() {
        let paths = TgtPaths::new(Some(PathBuf::from("/tmp/tgt-home")))
            .with_data_dir(Some(PathBuf::from("/srv/tgt")));
        assert_eq!(
            paths.get_path(ServiceType::Profiles).unwrap(),
            PathBuf::from("/srv/tgt/users.json")
        );
        // Config stays under the base
        assert_eq!(
            paths.config_dir().unwrap(),
            PathBuf::from("/tmp/tgt-home/config")
        );
    }
}
