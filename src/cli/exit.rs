use crate::error::FATAL_EXIT_CODE;
use anyhow::Result;
use clap::error::ErrorKind;

/// Process exit code for a finished run: the command's own code, or 1 on any error
pub fn exit_code(outcome: &Result<i32>) -> i32 {
    match outcome {
        Ok(code) => *code,
        Err(_) => FATAL_EXIT_CODE,
    }
}

/// Exit code when clap stops before a command runs.
///
/// Help and version output, including the help printed for a bare `is`, is a
/// normal run. Anything else clap rejects is a usage error.
pub fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => FATAL_EXIT_CODE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::error::PreconditionError;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse_code(args: &[&str]) -> i32 {
        let err = Cli::try_parse_from(args.iter().copied()).unwrap_err();
        parse_exit_code(&err)
    }

    #[test]
    fn test_command_codes_pass_through() {
        assert_eq!(exit_code(&Ok(0)), 0);
        assert_eq!(exit_code(&Ok(7)), 7);
    }

    #[test]
    fn test_precondition_errors_exit_one() {
        let invalid_root: Result<i32> = Err(PreconditionError::InvalidProjectRoot {
            root: PathBuf::from("/tmp/nowhere"),
            marker: PathBuf::from("docker"),
            project: "in-spiritus".into(),
        }
        .into());
        assert_eq!(exit_code(&invalid_root), 1);

        let missing_name: Result<i32> = Err(PreconditionError::MissingArgument {
            argument: "name",
            command: "restore",
        }
        .into());
        assert_eq!(exit_code(&missing_name), 1);

        let spawn_failure: Result<i32> = Err(anyhow::anyhow!("docker-compose not found"));
        assert_eq!(exit_code(&spawn_failure), 1);
    }

    #[test]
    fn test_no_arguments_exits_zero() {
        assert_eq!(parse_code(&["is"]), 0);
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        assert_eq!(parse_code(&["is", "--help"]), 0);
        assert_eq!(parse_code(&["is", "--version"]), 0);
        assert_eq!(parse_code(&["is", "tail", "--help"]), 0);
    }

    #[test]
    fn test_usage_errors_exit_one() {
        assert_eq!(parse_code(&["is", "frobnicate"]), 1);
        assert_eq!(parse_code(&["is", "rake", "--trace"]), 1);
    }
}
