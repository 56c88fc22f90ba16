//! Build-tool network configuration types and their TOML deserialisation.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::provider::Provider;
use crate::error::Error;

/// Zero-argument constructor for a [`Provider`].
///
/// Invoked once per resolution; the result is never cached so each
/// resolution gets a fresh transport.
#[derive(Clone)]
pub struct ProviderFactory(Arc<dyn Fn() -> Provider + Send + Sync>);

impl ProviderFactory {
    /// Wraps a closure as a provider factory.
    pub fn new(factory: impl Fn() -> Provider + Send + Sync + 'static) -> Self {
        Self(Arc::new(factory))
    }

    /// Builds a new provider.
    #[must_use]
    pub fn build(&self) -> Provider {
        (self.0)()
    }
}

impl fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProviderFactory(..)")
    }
}

/// The `provider` field of a [`NetworkEntry`].
#[derive(Debug, Clone)]
pub enum ProviderSource {
    /// A ready provider description, used as-is.
    Instance(Provider),
    /// A factory invoked to obtain the provider.
    Factory(ProviderFactory),
}

impl ProviderSource {
    /// Returns the concrete provider, invoking the factory if there is one.
    #[must_use]
    pub fn materialize(&self) -> Provider {
        match self {
            Self::Instance(provider) => provider.clone(),
            Self::Factory(factory) => factory.build(),
        }
    }
}

impl From<Provider> for ProviderSource {
    fn from(provider: Provider) -> Self {
        Self::Instance(provider)
    }
}

impl From<ProviderFactory> for ProviderSource {
    fn from(factory: ProviderFactory) -> Self {
        Self::Factory(factory)
    }
}

impl<'de> Deserialize<'de> for ProviderSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Provider::deserialize(deserializer).map(Self::Instance)
    }
}

/// One named network of the build-tool config.
///
/// Keys other than `provider`, `host` and `port` (e.g. `network_id`, `gas`)
/// are kept in `extra` and carried into the resolved descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkEntry {
    /// Explicit provider, or a factory producing one.
    #[serde(default)]
    pub provider: Option<ProviderSource>,
    /// Node host for a `WebSocket` connection.
    #[serde(default)]
    pub host: Option<String>,
    /// Node port for a `WebSocket` connection.
    #[serde(default)]
    pub port: Option<u16>,
    /// Remaining keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NetworkEntry {
    /// Entry that connects to `host:port` over `WebSocket`.
    #[must_use]
    pub fn with_host(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
            ..Self::default()
        }
    }

    /// Entry with an explicit provider source.
    #[must_use]
    pub fn with_provider(provider: impl Into<ProviderSource>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Self::default()
        }
    }

    /// Returns `host` and `port` when both are set and non-empty.
    #[must_use]
    pub fn host_port(&self) -> Option<(&str, u16)> {
        let host = self.host.as_deref().filter(|h| !h.is_empty())?;
        let port = self.port.filter(|p| *p != 0)?;
        Some((host, port))
    }
}

/// Mapping from network name to [`NetworkEntry`].
///
/// Deserialised from a document with a `[networks.<name>]` table per network.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworksConfig {
    /// Declared networks.
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkEntry>,
}

impl NetworksConfig {
    /// Looks up a network by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NetworkEntry> {
        self.networks.get(name)
    }

    /// Adds or replaces a network entry.
    #[must_use]
    pub fn with_network(mut self, name: impl Into<String>, entry: NetworkEntry) -> Self {
        self.networks.insert(name.into(), entry);
        self
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is not valid TOML or does not
    /// match the expected shape.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::config_with("invalid network config", e))
    }
}

/// Source of the build-tool network configuration.
///
/// Loading is deferred until a resolution path actually needs a named
/// network, so commands that skip resolution never touch the file.
pub trait NetworksSource {
    /// Returns the network configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    fn load(&self) -> Result<Cow<'_, NetworksConfig>, Error>;
}

impl NetworksSource for NetworksConfig {
    fn load(&self) -> Result<Cow<'_, NetworksConfig>, Error> {
        Ok(Cow::Borrowed(self))
    }
}
