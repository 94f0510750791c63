pub mod cli;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use cli::{App, Cli, Command};
pub use domain::{ChildProcess, ContainerRuntime, Invocation, Tool};
pub use error::PreconditionError;
pub use infra::{DockerAdapter, Settings};
pub use services::{CommandCatalogue, Dispatch, PreconditionChecker, ServeSession, ServeState};
