mod invocation;
pub mod snapshot;
pub mod traits;

pub use invocation::{Invocation, Tool};
pub use traits::{ChildProcess, ContainerRuntime};
