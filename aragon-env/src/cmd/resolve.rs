//! `aragon-env <command...>`: resolve and print the network configuration.

use std::io::{self, Write};

use crate::args::InvocationArgs;
use crate::cmd::Cli;
use crate::defaults::DefaultCatalogs;
use crate::environment::{EnvironmentResolver, ResolutionResult};
use crate::error::Error;
use crate::loader::{NetworksFile, load_apm_config, load_manifest};
use crate::reporter::TracingReporter;

/// Builds [`InvocationArgs`] from the command line, loading the manifest and
/// APM config it points at.
///
/// # Errors
///
/// Returns an error if an existing manifest or the APM config cannot be
/// loaded.
pub fn invocation_args(cli: &Cli) -> Result<InvocationArgs, Error> {
    let mut args = InvocationArgs::new(cli.command.iter().cloned()).with_frame(cli.use_frame);
    if let Some(environment) = &cli.environment {
        args = args.with_environment(environment.clone());
    }
    if let Some(network) = &cli.network {
        args = args.with_network(network.clone());
    }
    if let Some(module) = load_manifest(&cli.manifest)? {
        args = args.with_module(module);
    }
    if let Some(path) = &cli.apm_config {
        args = args.with_apm(load_apm_config(path)?);
    }
    Ok(args)
}

/// Resolves the invocation described by `cli`.
///
/// # Errors
///
/// Returns any loading or resolution error.
pub fn resolve(cli: &Cli) -> Result<ResolutionResult, Error> {
    let catalogs = DefaultCatalogs::builtin()?;
    let networks = NetworksFile::new(&cli.networks_config);
    let args = invocation_args(cli)?;
    EnvironmentResolver::new(&catalogs, &networks, &TracingReporter).resolve(&args)
}

/// Execute the resolution and write the result as JSON to stdout.
///
/// # Errors
///
/// Returns any loading or resolution error, or a failure to write stdout.
pub fn run(cli: &Cli) -> Result<(), Error> {
    let result = resolve(cli)?;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| Error::config_with("failed to serialise result", e))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
