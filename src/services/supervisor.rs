use crate::domain::ChildProcess;
use crate::services::catalogue::CommandCatalogue;
use crate::services::preconditions::{Dispatch, PreconditionChecker};
use anyhow::{Context, Result, bail};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Exit status after an interrupt-driven shutdown
pub const SHUTDOWN_EXIT_CODE: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Why a running session moved to `Stopping`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownTrigger {
    /// Ctrl+C / SIGTERM / SIGHUP delivered to this process
    Interrupt,
    /// `up` returned on its own; this process is about to exit
    ChildExited(Option<i32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeReport {
    pub trigger: ShutdownTrigger,
    pub exit_code: i32,
    pub transitions: Vec<ServeState>,
}

/// Owns the one `compose up` child of a `serve` invocation
#[derive(Debug)]
pub struct ServeSession<'a> {
    checker: &'a PreconditionChecker,
    catalogue: CommandCatalogue<'a>,
    state: ServeState,
    transitions: Vec<ServeState>,
    child: Option<Box<dyn ChildProcess>>,
}

impl<'a> ServeSession<'a> {
    pub fn new(checker: &'a PreconditionChecker, catalogue: CommandCatalogue<'a>) -> Self {
        Self {
            checker,
            catalogue,
            state: ServeState::Starting,
            transitions: vec![ServeState::Starting],
            child: None,
        }
    }

    pub fn state(&self) -> ServeState {
        self.state
    }

    fn transition(&mut self, next: ServeState) {
        debug!("serve: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.transitions.push(next);
    }

    /// Starting -> Running. Spawns `compose -f <file> up` attached to the terminal.
    pub fn start(&mut self, sync: bool) -> Result<()> {
        if self.state != ServeState::Starting {
            bail!("serve session already started ({:?})", self.state);
        }

        if sync {
            info!("Starting services with sync enabled");
        } else {
            info!("Starting services with sync disabled");
        }

        let invocation = self.catalogue.serve_up(sync);
        let child = match self.checker.resolve_and_dispatch(&invocation)? {
            Dispatch::Spawned(child) => child,
            // `up` never requires a running container
            Dispatch::Unavailable { container } => {
                bail!("compose up was refused: {container} unavailable")
            }
        };

        debug!("compose up running as pid {}", child.id());
        self.child = Some(child);
        self.transition(ServeState::Running);
        Ok(())
    }

    /// Running -> Stopping. Blocks until a shutdown request arrives or `up` exits.
    pub fn await_shutdown(
        &mut self,
        shutdown: &Receiver<ShutdownTrigger>,
    ) -> Result<ShutdownTrigger> {
        let Some(child) = self.child.as_mut() else {
            bail!("serve session is not running ({:?})", self.state);
        };

        let trigger = loop {
            match shutdown.recv_timeout(POLL_INTERVAL) {
                Ok(trigger) => break trigger,
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(code) = child.try_wait()? {
                        break ShutdownTrigger::ChildExited(code);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("shutdown channel closed, waiting for compose up");
                    break ShutdownTrigger::ChildExited(child.wait()?);
                }
            }
        };

        self.transition(ServeState::Stopping);
        Ok(trigger)
    }

    /// Stopping -> Stopped. Issues `compose stop` and waits for `up` to close.
    pub fn stop(&mut self, trigger: ShutdownTrigger) -> Result<i32> {
        if self.state != ServeState::Stopping {
            bail!("serve session is not stopping ({:?})", self.state);
        }

        info!("Waiting for containers to shutdown gracefully...");

        if let Err(err) = self.request_stop() {
            warn!("compose stop failed: {err:#}");
            if let Some(child) = self.child.as_mut() {
                child.interrupt().context("interrupting compose up")?;
            }
        }

        let child_code = match self.child.take() {
            Some(mut child) => child.wait().context("waiting for compose up to exit")?,
            None => None,
        };

        self.transition(ServeState::Stopped);
        info!("All containers shutdown");

        Ok(match trigger {
            ShutdownTrigger::Interrupt => SHUTDOWN_EXIT_CODE,
            ShutdownTrigger::ChildExited(code) => code.or(child_code).unwrap_or(1),
        })
    }

    fn request_stop(&self) -> Result<()> {
        match self.checker.resolve_and_dispatch(&self.catalogue.serve_stop())? {
            Dispatch::Spawned(mut stop) => {
                let code = stop.wait()?;
                if code != Some(0) {
                    bail!("compose stop exited with {code:?}");
                }
                Ok(())
            }
            Dispatch::Unavailable { container } => bail!("{container} unavailable"),
        }
    }

    /// The whole lifecycle, Starting through Stopped
    pub fn run(mut self, sync: bool, shutdown: &Receiver<ShutdownTrigger>) -> Result<ServeReport> {
        self.start(sync)?;
        let trigger = self.await_shutdown(shutdown)?;
        let exit_code = self.stop(trigger)?;

        Ok(ServeReport {
            trigger,
            exit_code,
            transitions: std::mem::take(&mut self.transitions),
        })
    }
}

impl Drop for ServeSession<'_> {
    /// Never leave `compose up` behind, even on an error path
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                warn!("serve session dropped while compose up was running");
                let _ = child.interrupt();
            }
            let _ = child.wait();
        }
    }
}
