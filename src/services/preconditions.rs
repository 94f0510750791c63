use crate::domain::{ChildProcess, ContainerRuntime, Invocation};
use crate::error::PreconditionError;
use crate::infra::Settings;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a dispatch that got past the project-root check
#[derive(Debug)]
pub enum Dispatch {
    Spawned(Box<dyn ChildProcess>),
    /// The target container is down; nothing was spawned
    Unavailable { container: String },
}

/// Project-root and container-running checks in front of every spawn
#[derive(Debug)]
pub struct PreconditionChecker {
    runtime: Arc<dyn ContainerRuntime>,
    project_root: PathBuf,
    marker_dir: PathBuf,
    project_name: String,
}

impl PreconditionChecker {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, settings: &Settings) -> Self {
        Self {
            runtime,
            project_root: settings.project_root.clone(),
            marker_dir: settings.marker_dir.clone(),
            project_name: settings.project_name.clone(),
        }
    }

    pub fn is_valid_project_root(&self) -> bool {
        self.project_root.join(&self.marker_dir).is_dir()
    }

    pub fn container_id(&self, name: &str) -> Result<Option<String>> {
        self.runtime.container_id(name)
    }

    /// Advisory only: the container may stop right after this returns
    pub fn is_container_running(&self, name: &str) -> Result<bool> {
        Ok(self.container_id(name)?.is_some())
    }

    pub fn ensure_project_root(&self) -> Result<(), PreconditionError> {
        if self.is_valid_project_root() {
            return Ok(());
        }

        Err(PreconditionError::InvalidProjectRoot {
            root: self.project_root.clone(),
            marker: self.marker_dir.clone(),
            project: self.project_name.clone(),
        })
    }

    /// Root check, then running check, then spawn. In that order, always.
    pub fn resolve_and_dispatch(&self, invocation: &Invocation) -> Result<Dispatch> {
        self.ensure_project_root()?;

        let running = match invocation.container.as_deref() {
            Some(name) => self.is_container_running(name)?,
            None => false,
        };

        if !running && invocation.require_running {
            let container = invocation.container.clone().unwrap_or_default();
            debug!("{container} is not running, nothing spawned");
            return Ok(Dispatch::Unavailable { container });
        }

        if running {
            if let Some(name) = invocation.container.as_deref() {
                info!("Executing on {name}");
            }
        }

        let child = self.runtime.spawn(invocation)?;
        Ok(Dispatch::Spawned(child))
    }

    /// Same order as `resolve_and_dispatch`, for invocations that need the
    /// running container's id. `build` gets the id from the one `ps` query.
    pub fn dispatch_with_id<F>(&self, container: &str, build: F) -> Result<Dispatch>
    where
        F: FnOnce(&str) -> Invocation,
    {
        self.ensure_project_root()?;

        let Some(id) = self.container_id(container)? else {
            debug!("{container} is not running, nothing spawned");
            return Ok(Dispatch::Unavailable {
                container: container.to_string(),
            });
        };

        info!("Executing on {container}");
        let child = self.runtime.spawn(&build(&id))?;
        Ok(Dispatch::Spawned(child))
    }
}
