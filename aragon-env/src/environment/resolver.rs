//! Environment selection.
//!
//! Picks one of three resolution paths from the CLI flags and the manifest:
//!
//! 1. **Legacy**: a manifest without `environments`; `--network` names the
//!    network directly (default `development`).
//! 2. **Declared**: a manifest with `environments`; `--environment` selects
//!    one of them (default `default`).
//! 3. **Catalog**: no manifest; `--environment` selects a built-in
//!    environment (default `aragon:local`).
//!
//! `init` never resolves a network, and `--network` with `--environment` is
//! rejected up front unless the command forwards to the build tool.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::instrument;

use super::apm::ApmConfig;
use super::manifest::{Environment, Manifest};
use crate::args::InvocationArgs;
use crate::defaults::{DEFAULTS, DefaultCatalogs};
use crate::error::Error;
use crate::gate::{is_build_tool_forward, runs_in_cwd};
use crate::network::{NetworksSource, Provider, ProviderDescriptor, resolve_provider};
use crate::reporter::Reporter;

/// Normalised configuration handed to downstream commands.
///
/// An all-empty result means network resolution did not apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// Provider descriptor for the selected network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<ProviderDescriptor>,
    /// Manifest narrowed to the selected environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<Manifest>,
    /// ENS registry of the selected environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apm_ens_registry: Option<String>,
    /// Dedicated `WebSocket` transport of the selected environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws_provider: Option<Provider>,
    /// APM config updated for the selected registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apm: Option<ApmConfig>,
}

impl ResolutionResult {
    /// Returns `true` when nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Resolves the active environment and network for one invocation.
#[allow(missing_debug_implementations)]
pub struct EnvironmentResolver<'a> {
    catalogs: &'a DefaultCatalogs,
    networks: &'a dyn NetworksSource,
    reporter: &'a dyn Reporter,
}

impl<'a> EnvironmentResolver<'a> {
    /// Creates a resolver.
    ///
    /// `networks` is the build-tool network config used by manifest projects;
    /// `catalogs` serves invocations without a manifest.
    pub const fn new(
        catalogs: &'a DefaultCatalogs,
        networks: &'a dyn NetworksSource,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            catalogs,
            networks,
            reporter,
        }
    }

    /// Resolves `args` into a [`ResolutionResult`].
    ///
    /// Neither `args` nor the config sources are modified; the narrowed
    /// manifest and updated APM config are returned as copies.
    ///
    /// # Errors
    ///
    /// Conflicting or unsupported flags and unknown environments are passed
    /// to the reporter and returned. Unknown networks and config loading
    /// failures are returned as-is.
    #[instrument(skip_all, fields(command = ?args.commands))]
    pub fn resolve(&self, args: &InvocationArgs) -> Result<ResolutionResult, Error> {
        let forwarding = is_build_tool_forward(&args.commands);

        if args.environment.is_some() && args.network.is_some() && !forwarding {
            return Err(self.fail(Error::MutuallyExclusive));
        }

        if runs_in_cwd(&args.commands) {
            tracing::debug!("project is being created, skipping network resolution");
            return Ok(ResolutionResult::default());
        }

        match &args.module {
            Some(module) => match &module.environments {
                None => self.resolve_legacy(args),
                Some(environments) => self.resolve_declared(args, module, environments, forwarding),
            },
            None => self.resolve_catalog(args),
        }
    }

    fn resolve_legacy(&self, args: &InvocationArgs) -> Result<ResolutionResult, Error> {
        if args.environment.is_some() {
            return Err(self.fail(Error::EnvironmentsUnsupported));
        }

        let network = args.network.as_deref().unwrap_or(DEFAULTS.legacy_network);
        tracing::debug!(network, "manifest declares no environments, using network");

        Ok(ResolutionResult {
            network: Some(resolve_provider(args, network, self.networks)?),
            ..ResolutionResult::default()
        })
    }

    fn resolve_declared(
        &self,
        args: &InvocationArgs,
        module: &Manifest,
        environments: &BTreeMap<String, Environment>,
        forwarding: bool,
    ) -> Result<ResolutionResult, Error> {
        if args.network.is_some() && !forwarding {
            return Err(self.fail(Error::NetworkDeprecated));
        }

        let name = args
            .environment
            .as_deref()
            .unwrap_or(DEFAULTS.declared_environment);
        let Some(env) = environments.get(name) else {
            return Err(self.fail(Error::UnknownEnvironment {
                name: name.to_owned(),
                choices: None,
            }));
        };
        tracing::debug!(environment = name, network = %env.network, "selected declared environment");

        let mut result = ResolutionResult {
            module: Some(module.narrowed(name, env)),
            network: Some(resolve_provider(args, &env.network, self.networks)?),
            ..ResolutionResult::default()
        };
        apply_environment(&mut result, env, args.apm.as_ref())?;
        Ok(result)
    }

    fn resolve_catalog(&self, args: &InvocationArgs) -> Result<ResolutionResult, Error> {
        let name = args
            .environment
            .as_deref()
            .unwrap_or(DEFAULTS.catalog_environment);
        let Some(env) = self.catalogs.environments.get(name) else {
            return Err(self.fail(Error::UnknownEnvironment {
                name: name.to_owned(),
                choices: Some(self.catalogs.environments.names()),
            }));
        };

        self.reporter.debug(&format!(
            "Could not find 'arapp.json'. Using the default configuration to connect to {}.",
            env.network
        ));

        let mut result = ResolutionResult {
            network: Some(resolve_provider(args, &env.network, &self.catalogs.networks)?),
            ..ResolutionResult::default()
        };
        apply_environment(&mut result, env, args.apm.as_ref())?;
        Ok(result)
    }

    fn fail(&self, err: Error) -> Error {
        self.reporter.error(&err.to_string());
        err
    }
}

/// Attaches the environment's registry and `WebSocket` endpoint to `result`.
fn apply_environment(
    result: &mut ResolutionResult,
    env: &Environment,
    apm: Option<&ApmConfig>,
) -> Result<(), Error> {
    if let Some(registry) = env.registry.as_deref().filter(|r| !r.is_empty()) {
        result.apm_ens_registry = Some(registry.to_owned());
        result.apm = apm.cloned().map(|apm| apm.with_registry(registry));
    }
    if let Some(ws_rpc) = env.ws_rpc.as_deref().filter(|u| !u.is_empty()) {
        result.ws_provider = Some(Provider::websocket_from_str(ws_rpc)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::IpfsRpc;
    use crate::network::{NetworkEntry, NetworksConfig};
    use crate::reporter::RecordingReporter;

    fn networks() -> NetworksConfig {
        NetworksConfig::default()
            .with_network("development", NetworkEntry::with_host("localhost", 8545))
            .with_network("rinkeby", NetworkEntry::with_host("rinkeby.node", 8546))
    }

    fn manifest() -> Manifest {
        Manifest {
            app_name: Some("app.aragonpm.eth".to_owned()),
            ..Manifest::default()
        }
        .with_environment("default", Environment::new("rinkeby").with_registry("R"))
        .with_environment(
            "staging",
            Environment::new("development")
                .with_app_name("app.open.aragonpm.eth")
                .with_ws_rpc("wss://staging.node/ws"),
        )
    }

    fn resolve(args: &InvocationArgs) -> (Result<ResolutionResult, Error>, RecordingReporter) {
        let catalogs = DefaultCatalogs::builtin().unwrap();
        let networks = networks();
        let reporter = RecordingReporter::new();
        let result = EnvironmentResolver::new(&catalogs, &networks, &reporter).resolve(args);
        (result, reporter)
    }

    #[test]
    fn flags_are_mutually_exclusive() {
        let args = InvocationArgs::new(["dao", "acl"])
            .with_environment("default")
            .with_network("rinkeby")
            .with_module(manifest());
        let (result, reporter) = resolve(&args);
        assert!(matches!(result, Err(Error::MutuallyExclusive)));
        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.errors()[0].contains("mutually exclusive"));
    }

    #[test]
    fn exclusivity_applies_without_manifest() {
        let args = InvocationArgs::new(["dao"])
            .with_environment("aragon:local")
            .with_network("rpc");
        assert!(matches!(resolve(&args).0, Err(Error::MutuallyExclusive)));
    }

    #[test]
    fn forwarding_command_accepts_both_flags() {
        let args = InvocationArgs::new(["contracts", "migrate"])
            .with_environment("default")
            .with_network("rinkeby")
            .with_module(manifest());
        let (result, reporter) = resolve(&args);
        let result = result.unwrap();
        assert!(result.network.unwrap().is_skipped());
        assert_eq!(result.apm_ens_registry.as_deref(), Some("R"));
        assert!(reporter.errors().is_empty());
    }

    #[test]
    fn init_returns_empty_result() {
        let args = InvocationArgs::new(["init", "foo.aragonpm.eth"]).with_module(manifest());
        assert!(resolve(&args).0.unwrap().is_empty());

        let args = InvocationArgs::new(["init"]).with_environment("nope");
        assert!(resolve(&args).0.unwrap().is_empty());
    }

    #[test]
    fn legacy_manifest_defaults_to_development() {
        let args = InvocationArgs::new(["apm", "publish"]).with_module(Manifest::default());
        let result = resolve(&args).0.unwrap();
        let network = result.network.unwrap();
        assert_eq!(network.name(), Some("development"));
        assert_eq!(
            network.provider().unwrap().url().as_str(),
            "ws://localhost:8545/"
        );
        assert_eq!(result.module, None);
    }

    #[test]
    fn legacy_manifest_uses_network_flag() {
        let args = InvocationArgs::new(["apm", "publish"])
            .with_network("rinkeby")
            .with_module(Manifest::default());
        let result = resolve(&args).0.unwrap();
        assert_eq!(result.network.unwrap().name(), Some("rinkeby"));
    }

    #[test]
    fn legacy_manifest_rejects_environment_flag() {
        let args = InvocationArgs::new(["apm", "publish"])
            .with_environment("default")
            .with_module(Manifest::default());
        let (result, reporter) = resolve(&args);
        assert!(matches!(result, Err(Error::EnvironmentsUnsupported)));
        assert_eq!(reporter.errors().len(), 1);
    }

    #[test]
    fn legacy_manifest_with_unknown_network_fails() {
        let args = InvocationArgs::new(["apm", "publish"])
            .with_network("kovan")
            .with_module(Manifest::default());
        let (result, reporter) = resolve(&args);
        assert!(matches!(result, Err(Error::UnknownNetwork { .. })));
        assert!(reporter.errors().is_empty());
    }

    #[test]
    fn declared_environments_reject_network_flag() {
        let args = InvocationArgs::new(["apm", "publish"])
            .with_network("rinkeby")
            .with_module(manifest());
        let (result, reporter) = resolve(&args);
        assert!(matches!(result, Err(Error::NetworkDeprecated)));
        assert!(reporter.errors()[0].contains("`environments` property"));
    }

    #[test]
    fn declared_default_environment_is_selected_and_narrowed() {
        let args = InvocationArgs::new(["apm", "publish"]).with_module(manifest());
        let result = resolve(&args).0.unwrap();

        let module = result.module.unwrap();
        let envs = module.environments.unwrap();
        assert_eq!(envs.len(), 1);
        assert!(envs.contains_key("default"));
        assert_eq!(result.apm_ens_registry.as_deref(), Some("R"));
        assert_eq!(result.network.unwrap().name(), Some("rinkeby"));
        assert_eq!(result.ws_provider, None);
    }

    #[test]
    fn declared_environment_overrides_app_name_and_builds_ws_provider() {
        let args = InvocationArgs::new(["apm", "publish"])
            .with_environment("staging")
            .with_module(manifest());
        let result = resolve(&args).0.unwrap();

        let module = result.module.unwrap();
        assert_eq!(module.app_name.as_deref(), Some("app.open.aragonpm.eth"));
        assert_eq!(
            result.ws_provider.unwrap().url().as_str(),
            "wss://staging.node/ws"
        );
        assert_eq!(result.apm_ens_registry, None);
        assert_eq!(result.apm, None);
    }

    #[test]
    fn undeclared_environment_fails_without_choices() {
        let args = InvocationArgs::new(["apm", "publish"])
            .with_environment("production")
            .with_module(manifest());
        let (result, reporter) = resolve(&args);
        match result {
            Err(Error::UnknownEnvironment { name, choices }) => {
                assert_eq!(name, "production");
                assert_eq!(choices, None);
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(
            reporter.errors(),
            ["production environment was not defined in your arapp.json."]
        );
    }

    #[test]
    fn declared_registry_updates_apm_config() {
        let args = InvocationArgs::new(["apm", "publish"])
            .with_module(manifest())
            .with_apm(ApmConfig::default());
        let apm = resolve(&args).0.unwrap().apm.unwrap();
        assert_eq!(apm.ens_registry.as_deref(), Some("R"));
        assert_eq!(apm.ipfs.rpc, IpfsRpc::aragon_gateway());
    }

    #[test]
    fn empty_registry_and_ws_rpc_are_ignored() {
        let module = Manifest::default().with_environment(
            "default",
            Environment::new("rinkeby").with_registry("").with_ws_rpc(""),
        );
        let args = InvocationArgs::new(["apm", "publish"])
            .with_module(module)
            .with_apm(ApmConfig::default());
        let (result, reporter) = resolve(&args);
        let result = result.unwrap();

        assert_eq!(result.network.unwrap().name(), Some("rinkeby"));
        assert_eq!(result.apm_ens_registry, None);
        assert_eq!(result.ws_provider, None);
        assert_eq!(result.apm, None);
        assert!(reporter.errors().is_empty());
    }

    #[test]
    fn resolving_twice_is_stable() {
        let module = manifest();
        let args = InvocationArgs::new(["apm", "publish"]).with_module(module.clone());
        let first = resolve(&args).0.unwrap();
        let second = resolve(&args).0.unwrap();
        assert_eq!(first.network, second.network);
        assert_eq!(first.apm_ens_registry, second.apm_ens_registry);
        assert_eq!(args.module, Some(module));
    }

    #[test]
    fn version_subcommand_skips_network_but_keeps_environment() {
        let args = InvocationArgs::new(["apm", "version", "major"]).with_module(manifest());
        let result = resolve(&args).0.unwrap();
        assert!(result.network.unwrap().is_skipped());
        assert_eq!(result.apm_ens_registry.as_deref(), Some("R"));
    }

    #[test]
    fn no_manifest_defaults_to_local_catalog() {
        let args = InvocationArgs::new(["dao", "acl"]);
        let (result, reporter) = resolve(&args);
        let result = result.unwrap();

        let network = result.network.unwrap();
        assert_eq!(network.name(), Some("rpc"));
        assert_eq!(
            network.provider().unwrap().url().as_str(),
            "ws://localhost:8545/"
        );
        assert_eq!(
            result.apm_ens_registry.as_deref(),
            Some("0x5f6f7e8cc7346a11ca2def8f827b7a0b612c56a1")
        );
        assert_eq!(result.ws_provider, None);
        assert!(reporter.errors().is_empty());
        assert_eq!(
            reporter.debugs(),
            ["Could not find 'arapp.json'. Using the default configuration to connect to rpc."]
        );
    }

    #[test]
    fn no_manifest_explicit_local_matches_catalog() {
        let args = InvocationArgs::new(["dao", "acl"]).with_environment("aragon:local");
        let (result, reporter) = resolve(&args);
        assert_eq!(result.unwrap().network.unwrap().name(), Some("rpc"));
        assert!(reporter.errors().is_empty());
    }

    #[test]
    fn no_manifest_remote_environment_uses_catalog_networks() {
        let args = InvocationArgs::new(["dao", "apps"])
            .with_environment("aragon:rinkeby")
            .with_apm(ApmConfig::default());
        let result = resolve(&args).0.unwrap();

        let network = result.network.unwrap();
        assert_eq!(network.name(), Some("rinkeby"));
        assert_eq!(
            network.provider().unwrap().url().as_str(),
            "https://rinkeby.eth.aragon.network/"
        );
        assert_eq!(
            result.ws_provider.unwrap().url().as_str(),
            "wss://rinkeby.eth.aragon.network/ws"
        );
        let apm = result.apm.unwrap();
        assert_eq!(
            apm.ens_registry.as_deref(),
            Some("0x98df287b6c145399aaa709692c8d308357bc085d")
        );
        assert_eq!(apm.ipfs.rpc, IpfsRpc::aragon_gateway());
    }

    #[test]
    fn no_manifest_unknown_environment_lists_defaults() {
        let args = InvocationArgs::new(["dao", "acl"]).with_environment("unknown-env");
        let (result, reporter) = resolve(&args);
        assert!(matches!(result, Err(Error::UnknownEnvironment { .. })));
        let errors = reporter.errors();
        assert_eq!(errors.len(), 1);
        for name in ["aragon:local", "aragon:rinkeby", "aragon:mainnet"] {
            assert!(errors[0].contains(name), "{}", errors[0]);
        }
        assert!(reporter.debugs().is_empty());
    }

    #[test]
    fn no_manifest_with_frame_names_frame_network() {
        let args = InvocationArgs::new(["dao", "acl"])
            .with_environment("aragon:mainnet")
            .with_frame(true);
        let result = resolve(&args).0.unwrap();
        assert_eq!(result.network.unwrap().name(), Some("frame-mainnet"));
    }

    #[test]
    fn substituted_catalog_is_used() {
        let catalogs = DefaultCatalogs::from_toml(
            "[\"aragon:local\"]\nnetwork = \"bare\"\n",
            "[networks.bare]\n",
        )
        .unwrap();
        let empty = NetworksConfig::default();
        let reporter = RecordingReporter::new();
        let result = EnvironmentResolver::new(&catalogs, &empty, &reporter)
            .resolve(&InvocationArgs::new(["dao"]))
            .unwrap();

        assert_eq!(
            result.network.unwrap().provider(),
            Some(&Provider::local_http())
        );
        assert_eq!(result.apm_ens_registry, None);
    }
}
