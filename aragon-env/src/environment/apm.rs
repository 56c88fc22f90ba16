//! APM configuration touched by environment selection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults::{ARAGON_GATEWAY_HOST, ARAGON_GATEWAY_PROTOCOL};

/// IPFS RPC endpoint of the APM config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpfsRpc {
    /// URL scheme.
    pub protocol: String,
    /// Host name.
    pub host: String,
    /// Port, `null` for the scheme default.
    #[serde(default)]
    pub port: Option<u16>,
    /// Marker set by the CLI when the endpoint is its built-in default.
    ///
    /// Only its truthiness matters here.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default: bool,
}

impl Default for IpfsRpc {
    fn default() -> Self {
        Self {
            protocol: "http".to_owned(),
            host: "localhost".to_owned(),
            port: Some(5001),
            default: true,
        }
    }
}

impl IpfsRpc {
    /// The Aragon IPFS gateway.
    #[must_use]
    pub fn aragon_gateway() -> Self {
        Self {
            protocol: ARAGON_GATEWAY_PROTOCOL.to_owned(),
            host: ARAGON_GATEWAY_HOST.to_owned(),
            port: None,
            default: false,
        }
    }
}

/// IPFS section of the APM config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpfsConfig {
    /// RPC endpoint.
    #[serde(default)]
    pub rpc: IpfsRpc,
    /// Remaining keys (e.g. `gateway`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// APM configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApmConfig {
    /// ENS registry address.
    #[serde(rename = "ens-registry", default, skip_serializing_if = "Option::is_none")]
    pub ens_registry: Option<String>,
    /// IPFS settings.
    #[serde(default)]
    pub ipfs: IpfsConfig,
    /// Remaining keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApmConfig {
    /// Points the config at `registry`.
    ///
    /// An IPFS RPC still on the CLI default is swapped for the Aragon
    /// gateway; a user-provided one is kept.
    #[must_use]
    pub fn with_registry(mut self, registry: &str) -> Self {
        self.ens_registry = Some(registry.to_owned());
        if self.ipfs.rpc.default {
            self.ipfs.rpc = IpfsRpc::aragon_gateway();
        }
        self
    }
}
