//! CLI definitions and command implementations.

use std::path::PathBuf;

use clap::Parser;

use crate::loader::{MANIFEST_FILE, NETWORKS_FILE};

pub mod resolve;

/// Resolve the network and environment an Aragon CLI command runs against.
///
/// Prints the resolved configuration as JSON on stdout.
#[derive(Debug, Parser)]
#[command(name = "aragon-env")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Command tokens of the invocation, e.g. `apm publish major`.
    pub command: Vec<String>,

    /// Environment declared in the manifest, or a built-in `aragon:*` one.
    #[arg(long)]
    pub environment: Option<String>,

    /// Network from the build-tool config (deprecated, use --environment).
    #[arg(long)]
    pub network: Option<String>,

    /// Proxy signing through the local Frame relay.
    #[arg(long, default_value_t = false)]
    pub use_frame: bool,

    /// Path to the project manifest.
    #[arg(long, env = "ARAGON_MANIFEST", default_value = MANIFEST_FILE)]
    pub manifest: PathBuf,

    /// Path to the build-tool network config (TOML).
    #[arg(long, env = "ARAGON_NETWORKS_CONFIG", default_value = NETWORKS_FILE)]
    pub networks_config: PathBuf,

    /// Path to an APM config (JSON) to update for the selected registry.
    #[arg(long, env = "ARAGON_APM_CONFIG")]
    pub apm_config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
