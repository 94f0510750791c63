use std::path::PathBuf;
use thiserror::Error;

/// Conditions the user has to fix before anything is spawned. Always exit code 1.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error(
        "There are no docker-compose files to run in {root:?} (missing {marker:?}). Are you in the right directory?"
    )]
    InvalidProjectRoot {
        root: PathBuf,
        marker: PathBuf,
        project: String,
    },

    #[error("You must specify a {argument} for `{command}`")]
    MissingArgument {
        argument: &'static str,
        command: &'static str,
    },
}

impl PreconditionError {
    /// Follow-up line telling the user how to fix it
    pub fn remedy(&self) -> String {
        match self {
            Self::InvalidProjectRoot { project, .. } => {
                format!("You must run this from the {project} project root.")
            }
            Self::MissingArgument { command, .. } => {
                format!("Run `is {command} --help` for usage.")
            }
        }
    }
}

/// Exit code for any error that reaches `main`
pub const FATAL_EXIT_CODE: i32 = 1;
