//! Parsed invocation arguments consumed by the resolver.

use crate::environment::{ApmConfig, Manifest};

/// The CLI input relevant to network resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationArgs {
    /// Positional command tokens, e.g. `["apm", "publish"]`.
    pub commands: Vec<String>,
    /// `--environment` flag.
    pub environment: Option<String>,
    /// Deprecated `--network` flag.
    pub network: Option<String>,
    /// `--use-frame` flag.
    pub use_frame: bool,
    /// Project manifest, when one was found.
    pub module: Option<Manifest>,
    /// APM configuration, when one was supplied.
    pub apm: Option<ApmConfig>,
}

impl InvocationArgs {
    /// Arguments for the given command tokens and no flags.
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets `--environment`; an empty name counts as unset.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = non_empty(environment.into());
        self
    }

    /// Sets `--network`; an empty name counts as unset.
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = non_empty(network.into());
        self
    }

    /// Sets `--use-frame`.
    #[must_use]
    pub const fn with_frame(mut self, use_frame: bool) -> Self {
        self.use_frame = use_frame;
        self
    }

    /// Attaches the project manifest.
    #[must_use]
    pub fn with_module(mut self, module: Manifest) -> Self {
        self.module = Some(module);
        self
    }

    /// Attaches the APM configuration.
    #[must_use]
    pub fn with_apm(mut self, apm: ApmConfig) -> Self {
        self.apm = Some(apm);
        self
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
