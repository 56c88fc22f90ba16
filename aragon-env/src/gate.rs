//! Command gate: decides whether an invocation needs network resolution.

/// Subcommands (second token) that never need a network, e.g. `apm version`.
const SKIP_SUBCOMMANDS: &[&str] = &["version"];

/// Commands (first token) that bootstrap a project, manage local services, or
/// hand network handling to the build tool.
const SKIP_COMMANDS: &[&str] = &["init", "devchain", "ipfs", "contracts"];

/// Command that creates a project in the working directory.
pub const INIT_COMMAND: &str = "init";

/// Command that forwards to the build tool's own network handling.
pub const BUILD_TOOL_COMMAND: &str = "contracts";

/// Returns `true` if no network descriptor should be produced for `commands`.
#[must_use]
pub fn should_skip_network_resolution<S: AsRef<str>>(commands: &[S]) -> bool {
    if commands
        .get(1)
        .is_some_and(|sub| SKIP_SUBCOMMANDS.contains(&sub.as_ref()))
    {
        return true;
    }
    commands
        .first()
        .is_some_and(|cmd| SKIP_COMMANDS.contains(&cmd.as_ref()))
}

/// Returns `true` when the invocation creates a new project (`init`).
#[must_use]
pub fn runs_in_cwd<S: AsRef<str>>(commands: &[S]) -> bool {
    commands.first().is_some_and(|cmd| cmd.as_ref() == INIT_COMMAND)
}

/// Returns `true` when the invocation forwards to the build tool (`contracts`).
#[must_use]
pub fn is_build_tool_forward<S: AsRef<str>>(commands: &[S]) -> bool {
    commands
        .first()
        .is_some_and(|cmd| cmd.as_ref() == BUILD_TOOL_COMMAND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_version_subcommand() {
        assert!(should_skip_network_resolution(&["apm", "version"]));
        assert!(should_skip_network_resolution(&["dao", "version", "extra"]));
    }

    #[test]
    fn skips_fixed_commands() {
        for cmd in SKIP_COMMANDS {
            assert!(should_skip_network_resolution(&[*cmd]), "{cmd}");
            assert!(should_skip_network_resolution(&[*cmd, "anything"]), "{cmd}");
        }
    }

    #[test]
    fn version_as_first_token_is_not_skipped() {
        assert!(!should_skip_network_resolution(&["version"]));
    }

    #[test]
    fn network_commands_are_not_skipped() {
        assert!(!should_skip_network_resolution(&["apm", "publish"]));
        assert!(!should_skip_network_resolution(&["dao", "acl"]));
        assert!(!should_skip_network_resolution::<&str>(&[]));
    }

    #[test]
    fn recognizes_init_and_forwarding() {
        assert!(runs_in_cwd(&["init", "foo.aragonpm.eth"]));
        assert!(!runs_in_cwd(&["apm", "init"]));
        assert!(is_build_tool_forward(&["contracts", "compile"]));
        assert!(!is_build_tool_forward::<String>(&[]));
    }
}
