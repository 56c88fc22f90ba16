//! Unified error types for network and environment resolution.

use thiserror::Error;

/// Top-level error type for the resolver.
///
/// The resolution variants carry the user-facing messages reported before the
/// CLI exits; [`Error::Config`] and [`Error::Io`] cover the loaders.
#[derive(Debug, Error)]
pub enum Error {
    /// `--network` and `--environment` were both given.
    #[error(
        "Arguments '--network' and '--environment' are mutually exclusive. Using '--network' has been deprecated and '--environment' should be used instead."
    )]
    MutuallyExclusive,

    /// `--network` was given but the manifest declares `environments`.
    #[error(
        "Your arapp.json contains an `environments` property. The use of '--network' is deprecated and '--environment' should be used instead."
    )]
    NetworkDeprecated,

    /// `--environment` was given but the manifest declares no `environments`.
    #[error(
        "Your arapp.json does not contain an `environments` property. The use of '--environment' is not supported."
    )]
    EnvironmentsUnsupported,

    /// The requested environment is not known.
    ///
    /// `choices` is only set when the catalog is closed (built-in defaults).
    #[error("{}", unknown_environment_message(.name, .choices.as_deref()))]
    UnknownEnvironment {
        /// Requested environment name.
        name: String,
        /// Valid environment names, if they can be listed.
        choices: Option<Vec<String>>,
    },

    /// The requested network is missing from the build-tool network config.
    #[error(
        "aragon <command> requires a network '{name}' in your truffle config. For an example, see http://truffleframework.com/docs/advanced/configuration"
    )]
    UnknownNetwork {
        /// Requested network name.
        name: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("config: {0}")]
    Config(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds an [`Error::Config`] from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Builds an [`Error::Config`] from a message and its underlying cause.
    pub fn config_with(message: impl AsRef<str>, source: impl std::fmt::Display) -> Self {
        Self::Config(format!("{}: {source}", message.as_ref()))
    }

    /// Returns `true` for the validation failures that the resolver has
    /// already passed to its reporter.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(
            self,
            Self::MutuallyExclusive
                | Self::NetworkDeprecated
                | Self::EnvironmentsUnsupported
                | Self::UnknownEnvironment { .. }
        )
    }
}

fn unknown_environment_message(name: &str, choices: Option<&[String]>) -> String {
    match choices {
        None => format!("{name} environment was not defined in your arapp.json."),
        Some(choices) => format!(
            "Could not find the {name} environment. Try using {}.",
            join_choices(choices)
        ),
    }
}

/// Joins names as `a, b or c`.
fn join_choices(choices: &[String]) -> String {
    match choices {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} or {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_catalog_omits_choices() {
        let err = Error::UnknownEnvironment {
            name: "staging".to_owned(),
            choices: None,
        };
        assert_eq!(
            err.to_string(),
            "staging environment was not defined in your arapp.json."
        );
    }

    #[test]
    fn closed_catalog_lists_choices() {
        let err = Error::UnknownEnvironment {
            name: "unknown-env".to_owned(),
            choices: Some(vec![
                "aragon:local".to_owned(),
                "aragon:rinkeby".to_owned(),
                "aragon:mainnet".to_owned(),
            ]),
        };
        assert_eq!(
            err.to_string(),
            "Could not find the unknown-env environment. Try using aragon:local, aragon:rinkeby or aragon:mainnet."
        );
    }

    #[test]
    fn single_choice_has_no_separator() {
        assert_eq!(join_choices(&["only".to_owned()]), "only");
    }

    #[test]
    fn exclusivity_message_is_single_spaced() {
        let message = Error::MutuallyExclusive.to_string();
        assert!(message.starts_with(
            "Arguments '--network' and '--environment' are mutually exclusive."
        ));
        assert!(!message.contains("  "));
    }

    #[test]
    fn unknown_network_mentions_name() {
        let err = Error::UnknownNetwork {
            name: "kovan".to_owned(),
        };
        assert!(err.to_string().contains("network 'kovan'"));
    }

    #[test]
    fn only_validation_errors_are_reported() {
        assert!(Error::MutuallyExclusive.is_reported());
        assert!(!Error::config("bad").is_reported());
        assert!(
            !Error::UnknownNetwork {
                name: "x".to_owned()
            }
            .is_reported()
        );
    }
}
