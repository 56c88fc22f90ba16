//! Loading of the project manifest, the APM config and the build-tool
//! network config from disk.
//!
//! # Network config format
//!
//! ```toml
//! [networks.development]
//! host = "localhost"
//! port = 8545
//!
//! [networks.rinkeby]
//! provider = { type = "http", url = "https://rinkeby.eth.aragon.network" }
//! network_id = 4
//! ```

use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::environment::{ApmConfig, Manifest};
use crate::error::Error;
use crate::network::{NetworksConfig, NetworksSource};

/// Conventional manifest file name.
pub const MANIFEST_FILE: &str = "arapp.json";

/// Default build-tool network config file name.
pub const NETWORKS_FILE: &str = "truffle.toml";

fn read(path: &Path, what: &str) -> Result<String, Error> {
    fs::read_to_string(path)
        .map_err(|e| Error::config_with(format!("failed to read {what} '{}'", path.display()), e))
}

fn parse_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, Error> {
    let content = read(path, what)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::config_with(format!("failed to parse {what} '{}'", path.display()), e))
}

/// Loads the project manifest at `path`.
///
/// A missing file is not an error: invocations outside a project resolve
/// against the built-in catalogs.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_manifest(path: &Path) -> Result<Option<Manifest>, Error> {
    match fs::metadata(path) {
        Ok(_) => parse_json(path, "manifest").map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no manifest found");
            Ok(None)
        }
        Err(e) => Err(Error::config_with(
            format!("failed to access manifest '{}'", path.display()),
            e,
        )),
    }
}

/// Loads an APM config (JSON) from `path`.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file cannot be read or parsed.
pub fn load_apm_config(path: &Path) -> Result<ApmConfig, Error> {
    parse_json(path, "apm config")
}

/// Build-tool network config read from a TOML file on first use.
#[derive(Debug, Clone)]
pub struct NetworksFile {
    path: PathBuf,
}

impl NetworksFile {
    /// Network config at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NetworksSource for NetworksFile {
    fn load(&self) -> Result<Cow<'_, NetworksConfig>, Error> {
        let content = read(&self.path, "network config")?;
        let config: NetworksConfig = toml::from_str(&content).map_err(|e| {
            Error::config_with(
                format!("failed to parse network config '{}'", self.path.display()),
                e,
            )
        })?;
        tracing::debug!(
            path = %self.path.display(),
            networks = config.networks.len(),
            "loaded network config"
        );
        Ok(Cow::Owned(config))
    }
}
