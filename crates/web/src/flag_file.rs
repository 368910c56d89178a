//! File-backed advisory auth flag and refresh token for native builds.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;

use justifai_auth::{AuthFlagCache, AuthFlagError};

use crate::token_store::{RefreshTokenStore, TokenStoreError};

const FLAG_VALUE: &str = "true";
const TOKEN_FILE_NAME: &str = "refresh-token";

/// Stores the flag as a small file; a missing file means `false`.
#[derive(Debug, Clone)]
pub struct FileAuthFlag {
    path: PathBuf,
}

impl FileAuthFlag {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `path` if given, else the platform default location.
    pub fn open(path: Option<PathBuf>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Ok(Self::new(Self::default_path()?)),
        }
    }

    /// `{app_data_dir}/justifai/auth-flag`.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let mut dir = dirs::data_dir()
            .or_else(|| {
                dirs::home_dir().map(|mut h| {
                    h.push(".local");
                    h.push("share");
                    h
                })
            })
            .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

        dir.push("justifai");
        dir.push("auth-flag");
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuthFlagCache for FileAuthFlag {
    fn write(&self, authenticated: bool) -> Result<(), AuthFlagError> {
        if !authenticated {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, FLAG_VALUE)?;
        Ok(())
    }

    fn read(&self) -> Result<bool, AuthFlagError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.trim() == FLAG_VALUE),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Refresh token kept in a file; a missing file means no saved session.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `refresh-token` in the same directory as the auth flag.
    pub fn beside(flag: &FileAuthFlag) -> Self {
        Self::new(flag.path().with_file_name(TOKEN_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RefreshTokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: Option<&str>) -> Result<(), TokenStoreError> {
        let Some(token) = token else {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}
