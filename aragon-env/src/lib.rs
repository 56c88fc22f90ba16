//! Network and environment resolution for the Aragon CLI.
//!
//! Decides, once per invocation, which network a command talks to and how
//! its provider is built, from the command line, the project manifest
//! (`arapp.json`) and the build-tool network config:
//!
//! ```text
//! aragon-env apm publish major --environment rinkeby
//! aragon-env dao acl 0xdead --environment aragon:mainnet --use-frame
//! ```
//!
//! No connection is opened; the result only describes what to build.

pub mod args;
pub mod cmd;
pub mod defaults;
pub mod environment;
pub mod error;
pub mod gate;
pub mod loader;
pub mod network;
pub mod reporter;
pub mod telemetry;

pub use args::InvocationArgs;
pub use defaults::DefaultCatalogs;
pub use environment::{EnvironmentResolver, ResolutionResult};
pub use error::Error;
pub use network::{Provider, ProviderDescriptor, resolve_provider};
