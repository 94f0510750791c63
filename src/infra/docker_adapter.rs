use crate::domain::{ChildProcess, ContainerRuntime, Invocation, Tool};
use crate::infra::config::Settings;
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::debug;

/// Runs docker / docker-compose as real subprocesses from the project root
#[derive(Debug)]
pub struct DockerAdapter {
    workdir: PathBuf,
    compose_program: String,
    docker_program: String,
}

impl DockerAdapter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            workdir: settings.project_root.clone(),
            compose_program: settings.compose_program.clone(),
            docker_program: settings.docker_program.clone(),
        }
    }

    fn program(&self, tool: Tool) -> &str {
        match tool {
            Tool::Compose => &self.compose_program,
            Tool::Docker => &self.docker_program,
        }
    }

    /// `program` may carry leading arguments, e.g. `docker compose`
    fn command(&self, tool: Tool) -> Result<Command> {
        let mut parts = self.program(tool).split_whitespace();
        let Some(program) = parts.next() else {
            bail!("no program configured for {tool}");
        };

        let mut cmd = Command::new(program);
        cmd.args(parts).current_dir(&self.workdir);
        Ok(cmd)
    }
}

impl ContainerRuntime for DockerAdapter {
    fn container_id(&self, name: &str) -> Result<Option<String>> {
        let filter = format!("name={name}");
        let output = self
            .command(Tool::Docker)?
            .args(["ps", "-q", "-f", &filter])
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("checking whether container {name} is running"))?;

        if !output.status.success() {
            bail!(
                "{} ps returned status {:?} while looking up {name}",
                self.docker_program,
                output.status
            );
        }

        Ok(first_id(&String::from_utf8_lossy(&output.stdout)))
    }

    fn spawn(&self, invocation: &Invocation) -> Result<Box<dyn ChildProcess>> {
        let program = self.program(invocation.tool);
        debug!("spawning {}", invocation.describe(program));

        let child = self
            .command(invocation.tool)?
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("starting {}", invocation.describe(program)))?;

        Ok(Box::new(ProcessChild { child }))
    }
}

/// `docker ps -q` prints one id per line; several names can match the filter
fn first_id(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[derive(Debug)]
pub struct ProcessChild {
    child: Child,
}

impl ChildProcess for ProcessChild {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn try_wait(&mut self) -> Result<Option<Option<i32>>> {
        let status = self
            .child
            .try_wait()
            .with_context(|| format!("polling process {}", self.child.id()))?;
        Ok(status.map(|s| s.code()))
    }

    fn wait(&mut self) -> Result<Option<i32>> {
        let status = self
            .child
            .wait()
            .with_context(|| format!("waiting for process {}", self.child.id()))?;
        Ok(status.code())
    }

    #[cfg(unix)]
    fn interrupt(&mut self) -> Result<()> {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;

        // Already reaped: nothing left to signal
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }

        kill(Pid::from_raw(self.child.id() as i32), Signal::SIGINT)
            .with_context(|| format!("sending SIGINT to process {}", self.child.id()))
    }

    #[cfg(not(unix))]
    fn interrupt(&mut self) -> Result<()> {
        // No SIGINT outside unix; terminate instead
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }
        self.child
            .kill()
            .with_context(|| format!("terminating process {}", self.child.id()))
    }
}
