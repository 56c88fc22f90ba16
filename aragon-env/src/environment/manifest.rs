//! Project manifest (`arapp.json`) and its declared environments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One named deployment target declared by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Network name looked up in the network config.
    pub network: String,
    /// App name to use for this environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// ENS registry address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    /// Dedicated `WebSocket` RPC endpoint.
    #[serde(default, rename = "wsRPC", skip_serializing_if = "Option::is_none")]
    pub ws_rpc: Option<String>,
    /// Remaining keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Environment {
    /// Environment on `network` with no other settings.
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            app_name: None,
            registry: None,
            ws_rpc: None,
            extra: Map::new(),
        }
    }

    /// Sets the ENS registry.
    #[must_use]
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Sets the app name.
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Sets the `WebSocket` RPC endpoint.
    #[must_use]
    pub fn with_ws_rpc(mut self, ws_rpc: impl Into<String>) -> Self {
        self.ws_rpc = Some(ws_rpc.into());
        self
    }
}

/// Project manifest.
///
/// `environments` distinguishes "absent" (legacy `--network` projects) from
/// "declared", even when declared empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// App ENS name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// Declared environments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environments: Option<BTreeMap<String, Environment>>,
    /// Remaining keys (`roles`, `path`, ...), preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Adds a declared environment.
    #[must_use]
    pub fn with_environment(mut self, name: impl Into<String>, env: Environment) -> Self {
        self.environments
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), env);
        self
    }

    /// Copy of the manifest keeping only environment `name`, with `appName`
    /// taken from that environment.
    ///
    /// The environment's `appName` replaces the manifest's even when it is
    /// unset.
    #[must_use]
    pub fn narrowed(&self, name: &str, env: &Environment) -> Self {
        Self {
            app_name: env.app_name.clone(),
            environments: Some(BTreeMap::from([(name.to_owned(), env.clone())])),
            extra: self.extra.clone(),
        }
    }
}
