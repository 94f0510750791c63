use std::fmt;

/// External program an invocation is handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// The compose orchestrator (`docker-compose`)
    Compose,
    /// The container runtime itself (`docker`)
    Docker,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compose => write!(f, "compose"),
            Self::Docker => write!(f, "docker"),
        }
    }
}

/// One external command: argv for a tool plus the container it targets.
///
/// Built fresh per subcommand call and consumed by the precondition checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    pub args: Vec<String>,
    pub container: Option<String>,
    pub require_running: bool,
}

impl Invocation {
    /// A compose call that does not depend on any container being up
    pub fn compose<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool: Tool::Compose,
            args: args.into_iter().map(Into::into).collect(),
            container: None,
            require_running: false,
        }
    }

    /// A docker call against a container that must already be running
    pub fn docker<I, S>(args: I, container: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool: Tool::Docker,
            args: args.into_iter().map(Into::into).collect(),
            container: Some(container.to_string()),
            require_running: true,
        }
    }

    /// Targets `container` and requires it to be running before spawning
    pub fn on(mut self, container: &str) -> Self {
        self.container = Some(container.to_string());
        self.require_running = true;
        self
    }

    /// Appends trailing arguments verbatim and in order
    pub fn with_args<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn last_arg(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    /// Human readable argv, used for logs and the mock runtime's journal
    pub fn describe(&self, program: &str) -> String {
        let mut line = program.to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
