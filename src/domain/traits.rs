use super::Invocation;
use anyhow::Result;
use std::fmt::Debug;

/// Trait for the external tools every subcommand ends up calling
pub trait ContainerRuntime: Send + Sync + Debug {
    /// Identifier of the running container whose name matches `name`, if any
    fn container_id(&self, name: &str) -> Result<Option<String>>;

    /// Spawn the invocation attached to the terminal (inherited stdio)
    fn spawn(&self, invocation: &Invocation) -> Result<Box<dyn ChildProcess>>;
}

/// Handle to a spawned tool. Owned by exactly one command and reaped by it.
pub trait ChildProcess: Send + Debug {
    fn id(&self) -> u32;

    /// Non-blocking check. `Some(code)` once the child has exited,
    /// where `code` is `None` if it was killed by a signal.
    fn try_wait(&mut self) -> Result<Option<Option<i32>>>;

    /// Block until the child exits and return its exit code
    fn wait(&mut self) -> Result<Option<i32>>;

    /// Ask the child to shut down gracefully (SIGINT)
    fn interrupt(&mut self) -> Result<()>;
}
