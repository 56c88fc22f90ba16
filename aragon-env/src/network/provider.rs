//! Provider descriptors and the provider resolution policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::config::NetworksSource;
use crate::args::InvocationArgs;
use crate::defaults::{FRAME_ENDPOINT, FRAME_ORIGIN, LOCAL_HTTP_ENDPOINT};
use crate::error::Error;
use crate::gate::should_skip_network_resolution;

/// Description of a transport to build.
///
/// Nothing is connected here; the caller owns the connection lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Provider {
    /// JSON-RPC over HTTP(S).
    Http {
        /// Endpoint URL.
        url: Url,
    },
    /// JSON-RPC over `WebSocket`.
    #[serde(rename = "ws")]
    WebSocket {
        /// Endpoint URL.
        url: Url,
        /// Extra handshake headers.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
}

impl Provider {
    /// HTTP transport to `url`.
    #[must_use]
    pub const fn http(url: Url) -> Self {
        Self::Http { url }
    }

    /// `WebSocket` transport to `url` without extra headers.
    #[must_use]
    pub const fn websocket(url: Url) -> Self {
        Self::WebSocket {
            url,
            headers: BTreeMap::new(),
        }
    }

    /// Parses `url` and builds a `WebSocket` transport to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `url` is not a valid URL.
    pub fn websocket_from_str(url: &str) -> Result<Self, Error> {
        let url = Url::parse(url)
            .map_err(|e| Error::config_with(format!("invalid WebSocket URL '{url}'"), e))?;
        Ok(Self::websocket(url))
    }

    /// HTTP transport to the local node fallback.
    ///
    /// # Panics
    ///
    /// Never in practice: the fallback endpoint is a valid URL literal.
    #[must_use]
    pub fn local_http() -> Self {
        Self::http(Url::parse(LOCAL_HTTP_ENDPOINT).expect("valid local endpoint"))
    }

    /// `WebSocket` transport to the local Frame relay.
    ///
    /// # Panics
    ///
    /// Never in practice: the relay endpoint is a valid URL literal.
    #[must_use]
    pub fn frame() -> Self {
        Self::WebSocket {
            url: Url::parse(FRAME_ENDPOINT).expect("valid frame endpoint"),
            headers: BTreeMap::from([("origin".to_owned(), FRAME_ORIGIN.to_owned())]),
        }
    }

    /// Endpoint URL of the transport.
    #[must_use]
    pub const fn url(&self) -> &Url {
        match self {
            Self::Http { url } | Self::WebSocket { url, .. } => url,
        }
    }
}

/// Descriptor returned when resolution does not apply. Serialises as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Skipped {}

/// Named provider that is not backed by a build-tool config entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedProvider {
    /// Descriptor name (e.g. `frame-mainnet`).
    pub name: String,
    /// Transport to build.
    pub provider: Provider,
}

/// Build-tool network entry annotated with its resolved provider and name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNetwork {
    /// Network name the entry was declared under.
    pub name: String,
    /// Resolved transport.
    pub provider: Provider,
    /// Host copied from the entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port copied from the entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Remaining entry keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Result of provider resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderDescriptor {
    /// Resolution was skipped for this command.
    Skipped(Skipped),
    /// Signing is proxied through the local Frame relay.
    Frame(NamedProvider),
    /// Provider derived from a declared network.
    Network(ResolvedNetwork),
}

impl ProviderDescriptor {
    /// Returns `true` for the empty descriptor.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Descriptor name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Skipped(_) => None,
            Self::Frame(named) => Some(&named.name),
            Self::Network(network) => Some(&network.name),
        }
    }

    /// Resolved transport, if any.
    #[must_use]
    pub const fn provider(&self) -> Option<&Provider> {
        match self {
            Self::Skipped(_) => None,
            Self::Frame(named) => Some(&named.provider),
            Self::Network(network) => Some(&network.provider),
        }
    }
}

/// Resolves the provider for `network` (the `configureNetwork` step).
///
/// Precedence, first match wins:
/// 1. the command does not need a network: [`ProviderDescriptor::Skipped`];
/// 2. `--use-frame`: a `frame-<network>` descriptor for the local relay;
/// 3. the entry's own `provider`, invoking it when it is a factory;
/// 4. `host` + `port`: `WebSocket` to `ws://host:port`;
/// 5. HTTP to the local node.
///
/// The config source is only loaded for steps 3 to 5. The entry itself is
/// left untouched; the returned [`ResolvedNetwork`] is an annotated copy.
///
/// # Errors
///
/// Returns [`Error::UnknownNetwork`] if the source does not declare
/// `network`, or any error raised while loading the source.
pub fn resolve_provider(
    args: &InvocationArgs,
    network: &str,
    source: &dyn NetworksSource,
) -> Result<ProviderDescriptor, Error> {
    if should_skip_network_resolution(&args.commands) {
        return Ok(ProviderDescriptor::Skipped(Skipped {}));
    }

    if args.use_frame {
        return Ok(ProviderDescriptor::Frame(NamedProvider {
            name: format!("frame-{network}"),
            provider: Provider::frame(),
        }));
    }

    let config = source.load()?;
    let entry = config.get(network).ok_or_else(|| Error::UnknownNetwork {
        name: network.to_owned(),
    })?;

    let provider = if let Some(source) = &entry.provider {
        source.materialize()
    } else if let Some((host, port)) = entry.host_port() {
        let url = if host.contains(':') && !host.starts_with('[') {
            format!("ws://[{host}]:{port}")
        } else {
            format!("ws://{host}:{port}")
        };
        Provider::websocket_from_str(&url)?
    } else {
        Provider::local_http()
    };

    tracing::debug!(network, url = %provider.url(), "resolved network provider");

    Ok(ProviderDescriptor::Network(ResolvedNetwork {
        name: network.to_owned(),
        provider,
        host: entry.host.clone(),
        port: entry.port,
        extra: entry.extra.clone(),
    }))
}
