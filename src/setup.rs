//! First-run setup: probe for a runtime prerequisite, install it when absent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config;
use crate::error::GatewayError;

/// Outcome of an [`ensure_installed`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyPresent,
    Installed,
}

/// A runtime prerequisite that can be probed and installed.
pub trait Installer {
    fn is_present(&self) -> Result<bool, GatewayError>;
    fn install(&self) -> Result<(), GatewayError>;
}

/// Run the installer only when the prerequisite is absent.
///
/// Installation failures are fatal to the caller.
pub fn ensure_installed<I: Installer>(installer: &I) -> Result<InstallOutcome, GatewayError> {
    if installer.is_present()? {
        return Ok(InstallOutcome::AlreadyPresent);
    }

    installer.install()?;
    Ok(InstallOutcome::Installed)
}

/// Creates the default `config.toml` on first run.
pub struct ConfigFileInstaller {
    path: PathBuf,
}

impl ConfigFileInstaller {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn install_error(&self, source: io::Error) -> GatewayError {
        GatewayError::Install {
            message: format!("Failed to create {}", self.path.display()),
            source,
        }
    }
}

impl Installer for ConfigFileInstaller {
    fn is_present(&self) -> Result<bool, GatewayError> {
        Ok(self.path.exists())
    }

    fn install(&self) -> Result<(), GatewayError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.install_error(e))?;
        }
        fs::write(&self.path, config::default_config_toml())
            .map_err(|e| self.install_error(e))?;

        info!(path = %self.path.display(), "Wrote default configuration");
        Ok(())
    }
}
