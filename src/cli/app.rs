use crate::cli::Command;
use crate::cli::guidance;
use crate::domain::{ContainerRuntime, Invocation};
use crate::infra::{DockerAdapter, Settings};
use crate::services::{
    CommandCatalogue, Dispatch, PreconditionChecker, ServeSession, ShutdownTrigger,
};
use anyhow::Result;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use tracing::warn;

/// Exit status of a child killed by a signal
const SIGNALED_EXIT_CODE: i32 = 1;

/// Outcome of one dispatched invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The child ran and exited with this code
    Exited(i32),
    /// The target container was down; guidance was printed
    Unavailable,
}

impl Completion {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Exited(code) => code,
            Self::Unavailable => 0,
        }
    }

    fn succeeded(self) -> bool {
        self == Self::Exited(0)
    }
}

pub struct App {
    settings: Settings,
    checker: PreconditionChecker,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let runtime = Arc::new(DockerAdapter::new(&settings));
        Self::with_runtime(settings, runtime)
    }

    pub fn with_runtime(settings: Settings, runtime: Arc<dyn ContainerRuntime>) -> Self {
        let checker = PreconditionChecker::new(runtime, &settings);
        Self { settings, checker }
    }

    pub fn catalogue(&self) -> CommandCatalogue<'_> {
        CommandCatalogue::new(&self.settings)
    }

    /// Runs one subcommand and returns the process exit code
    pub fn run(&self, command: Command, shutdown: &Receiver<ShutdownTrigger>) -> Result<i32> {
        let catalogue = self.catalogue();

        let completion = match command {
            Command::Serve { no_sync } => {
                let report = ServeSession::new(&self.checker, catalogue).run(!no_sync, shutdown)?;
                return Ok(report.exit_code);
            }
            Command::Kill => self.dispatch(&catalogue.kill())?,
            Command::Console => self.dispatch(&catalogue.console())?,
            Command::Pry => self.pry()?,
            Command::Bash { container } => self.dispatch(&catalogue.bash(container.as_deref()))?,
            Command::Tail {
                log,
                container,
                path,
            } => self.dispatch(&catalogue.tail(
                log.as_deref(),
                container.as_deref(),
                path.as_deref(),
            ))?,
            Command::Psql => self.dispatch(&catalogue.psql())?,
            Command::Redis => self.dispatch(&catalogue.redis())?,
            Command::Migrate => self.dispatch(&catalogue.migrate())?,
            Command::Reset => self.dispatch(&catalogue.reset())?,
            Command::Wipe => self.dispatch(&catalogue.wipe())?,
            Command::Rails { args } => self.dispatch(&catalogue.rails(&args))?,
            Command::Rake { args } => self.dispatch(&catalogue.rake(&args))?,
            Command::Zeus { args } => self.dispatch(&catalogue.zeus(&args))?,
            Command::Stellar { args } => self.dispatch(&catalogue.stellar(&args))?,
            Command::Snapshot { name } => self.snapshot(name.as_deref())?,
            Command::Restore { name } => self.restore(name.as_deref())?,
            Command::Test => self.dispatch(&catalogue.test())?,
        };

        Ok(completion.exit_code())
    }

    /// Checks preconditions, spawns, and waits for the child to finish
    pub fn dispatch(&self, invocation: &Invocation) -> Result<Completion> {
        complete(self.checker.resolve_and_dispatch(invocation)?)
    }

    fn pry(&self) -> Result<Completion> {
        let catalogue = self.catalogue();
        let dispatch = self
            .checker
            .dispatch_with_id(&self.settings.containers.app, |id| catalogue.pry(id))?;
        complete(dispatch)
    }

    fn snapshot(&self, name: Option<&str>) -> Result<Completion> {
        let catalogue = self.catalogue();
        let name = catalogue.snapshot_name(name);

        let completion = self.dispatch(&catalogue.snapshot(&name))?;
        if completion.succeeded() {
            guidance::print_snapshot_created(&name);
        } else if completion != Completion::Unavailable {
            warn!("snapshot {name} did not complete ({completion:?})");
        }
        Ok(completion)
    }

    fn restore(&self, name: Option<&str>) -> Result<Completion> {
        let invocation = self.catalogue().restore(name)?;
        self.checker.ensure_project_root()?;

        let name = invocation.last_arg().unwrap_or_default().to_string();
        let database = &self.settings.database_name;

        guidance::print_restore_started(database, &name);
        let completion = self.dispatch(&invocation)?;
        if completion.succeeded() {
            guidance::print_restore_done(database, &name);
        }
        Ok(completion)
    }
}

fn complete(dispatch: Dispatch) -> Result<Completion> {
    match dispatch {
        Dispatch::Spawned(mut child) => {
            let code = child.wait()?.unwrap_or(SIGNALED_EXIT_CODE);
            Ok(Completion::Exited(code))
        }
        Dispatch::Unavailable { container } => {
            guidance::print_unavailable(&container);
            Ok(Completion::Unavailable)
        }
    }
}
