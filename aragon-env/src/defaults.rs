//! Named defaults and the built-in environment and network catalogs.
//!
//! The catalogs ship with the tool as TOML documents embedded at compile
//! time. [`DefaultCatalogs::builtin`] parses them once at startup; the result
//! is passed to the resolver so tests can substitute their own.

use std::fmt;

use serde::Deserialize;
use serde::de::{MapAccess, Visitor};

use crate::environment::Environment;
use crate::error::Error;
use crate::network::NetworksConfig;

/// Local Frame relay endpoint.
pub const FRAME_ENDPOINT: &str = "ws://localhost:1248";

/// `origin` header sent to the Frame relay.
pub const FRAME_ORIGIN: &str = "AragonCLI";

/// Fallback endpoint for networks that declare neither a provider nor a host.
pub const LOCAL_HTTP_ENDPOINT: &str = "http://localhost:8545";

/// Host of the Aragon IPFS gateway.
pub const ARAGON_GATEWAY_HOST: &str = "ipfs.eth.aragon.network";

/// Protocol of the Aragon IPFS gateway.
pub const ARAGON_GATEWAY_PROTOCOL: &str = "https";

const ENVIRONMENTS_TOML: &str = include_str!("../config/environments.default.toml");
const NETWORKS_TOML: &str = include_str!("../config/networks.default.toml");

/// Implicit names used when a flag is absent, one per resolution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedDefaults {
    /// Network for a manifest without `environments`.
    pub legacy_network: &'static str,
    /// Environment for a manifest with `environments`.
    pub declared_environment: &'static str,
    /// Environment when there is no manifest.
    pub catalog_environment: &'static str,
}

/// The defaults table consulted by every resolution path.
pub const DEFAULTS: NamedDefaults = NamedDefaults {
    legacy_network: "development",
    declared_environment: "default",
    catalog_environment: "aragon:local",
};

/// Ordered mapping from environment name to [`Environment`].
///
/// Keeps document order so the names can be listed back to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentCatalog(Vec<(String, Environment)>);

impl EnvironmentCatalog {
    /// Builds a catalog from `(name, environment)` pairs.
    pub fn new(entries: impl IntoIterator<Item = (String, Environment)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Looks up an environment by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, env)| env)
    }

    /// Environment names in catalog order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|(name, _)| name.clone()).collect()
    }
}

impl<'de> Deserialize<'de> for EnvironmentCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = EnvironmentCatalog;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of environment names to environments")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, Environment>()? {
                    entries.push(entry);
                }
                Ok(EnvironmentCatalog(entries))
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Built-in environments plus the networks they refer to.
#[derive(Debug, Clone, Default)]
pub struct DefaultCatalogs {
    /// Environments keyed by `aragon:<network>`.
    pub environments: EnvironmentCatalog,
    /// Networks referenced by [`Self::environments`].
    pub networks: NetworksConfig,
}

impl DefaultCatalogs {
    /// Parses the catalogs shipped with the tool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if an embedded document is malformed.
    pub fn builtin() -> Result<Self, Error> {
        Self::from_toml(ENVIRONMENTS_TOML, NETWORKS_TOML)
    }

    /// Parses catalogs from TOML documents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either document is malformed.
    pub fn from_toml(environments: &str, networks: &str) -> Result<Self, Error> {
        let environments = toml::from_str(environments)
            .map_err(|e| Error::config_with("invalid default environments", e))?;
        let networks = NetworksConfig::from_toml(networks)?;
        Ok(Self {
            environments,
            networks,
        })
    }
}
