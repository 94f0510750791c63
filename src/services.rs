pub mod catalogue;
pub mod preconditions;
pub mod supervisor;

pub use catalogue::CommandCatalogue;
pub use preconditions::{Dispatch, PreconditionChecker};
pub use supervisor::{ServeReport, ServeSession, ServeState, ShutdownTrigger};
