use crate::domain::{ChildProcess, ContainerRuntime, Invocation, Tool};
use anyhow::{Result, bail};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Shared view of one fake child, so the runtime can end it from outside
#[derive(Debug, Default)]
pub struct MockChildState {
    pub exit: Option<Option<i32>>,
    pub interrupted: bool,
    pub waited: bool,
}

#[derive(Debug)]
pub struct MockChild {
    id: u32,
    state: Arc<Mutex<MockChildState>>,
    /// Exit code handed out by a blocking `wait` on a child nobody ended
    default_exit: Option<i32>,
}

impl ChildProcess for MockChild {
    fn id(&self) -> u32 {
        self.id
    }

    fn try_wait(&mut self) -> Result<Option<Option<i32>>> {
        Ok(self.state.lock().unwrap().exit)
    }

    fn wait(&mut self) -> Result<Option<i32>> {
        let mut state = self.state.lock().unwrap();
        state.waited = true;
        Ok(*state.exit.get_or_insert(self.default_exit))
    }

    fn interrupt(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.interrupted = true;
        state.exit.get_or_insert(None);
        Ok(())
    }
}

/// Recording stand-in for docker / docker-compose.
///
/// Journal entries look like `ps:web` and `spawn:compose -f ... up`.
/// Long-running compose `up` children stay alive until a compose `stop`
/// or `kill` is spawned, or until `finish_long_running` is called.
pub struct MockRuntime {
    running: RwLock<HashMap<String, String>>,
    commands: RwLock<Vec<String>>,
    children: RwLock<Vec<Arc<Mutex<MockChildState>>>>,
    fail_on: RwLock<Option<String>>,
    exit_code: RwLock<Option<i32>>,
    next_id: AtomicU32,
}

impl std::fmt::Debug for MockRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRuntime")
            .field("commands", &self.get_commands())
            .finish()
    }
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            running: RwLock::new(HashMap::new()),
            commands: RwLock::new(Vec::new()),
            children: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
            exit_code: RwLock::new(Some(0)),
            next_id: AtomicU32::new(1000),
        }
    }

    /// Marks `name` as running under the given container id
    pub fn add_running(&self, name: &str, id: &str) {
        self.running
            .write()
            .unwrap()
            .insert(name.to_string(), id.to_string());
    }

    /// Fails any operation whose journal entry contains `needle`
    pub fn set_fail_on(&self, needle: &str) {
        *self.fail_on.write().unwrap() = Some(needle.to_string());
    }

    /// Exit code short-lived children report when waited on
    pub fn set_exit_code(&self, code: Option<i32>) {
        *self.exit_code.write().unwrap() = code;
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    pub fn spawned(&self) -> Vec<String> {
        self.get_commands()
            .into_iter()
            .filter_map(|c| c.strip_prefix("spawn:").map(str::to_string))
            .collect()
    }

    pub fn children(&self) -> Vec<Arc<Mutex<MockChildState>>> {
        self.children.read().unwrap().clone()
    }

    /// Ends every long-running child that is still alive, as if `up` returned
    pub fn finish_long_running(&self, code: Option<i32>) {
        for child in self.children.read().unwrap().iter() {
            child.lock().unwrap().exit.get_or_insert(code);
        }
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, entry: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if entry.contains(fail_on.as_str()) {
                bail!("Mock failure on: {}", entry);
            }
        }
        Ok(())
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

fn is_compose_verb(invocation: &Invocation, verb: &str) -> bool {
    invocation.tool == Tool::Compose && invocation.last_arg() == Some(verb)
}

impl ContainerRuntime for MockRuntime {
    fn container_id(&self, name: &str) -> Result<Option<String>> {
        let entry = format!("ps:{}", name);
        self.record_command(&entry);
        self.check_fail(&entry)?;

        Ok(self.running.read().unwrap().get(name).cloned())
    }

    fn spawn(&self, invocation: &Invocation) -> Result<Box<dyn ChildProcess>> {
        let entry = format!("spawn:{}", invocation.describe(&invocation.tool.to_string()));
        self.record_command(&entry);
        self.check_fail(&entry)?;

        if is_compose_verb(invocation, "stop") || is_compose_verb(invocation, "kill") {
            self.finish_long_running(Some(0));
        }

        let state = Arc::new(Mutex::new(MockChildState::default()));

        if is_compose_verb(invocation, "up") {
            self.children.write().unwrap().push(state.clone());
        }

        Ok(Box::new(MockChild {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            state,
            default_exit: *self.exit_code.read().unwrap(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_id_records_query() -> Result<()> {
        let mock = MockRuntime::new();
        mock.add_running("web", "abc123");

        assert_eq!(mock.container_id("web")?, Some("abc123".to_string()));
        assert_eq!(mock.container_id("db")?, None);
        assert_eq!(mock.get_commands(), vec!["ps:web", "ps:db"]);
        Ok(())
    }

    #[test]
    fn test_stop_ends_up_children() -> Result<()> {
        let mock = MockRuntime::new();
        let mut up = mock.spawn(&Invocation::compose(["-f", "x.yml", "up"]))?;
        assert_eq!(up.try_wait()?, None);

        mock.spawn(&Invocation::compose(["-f", "x.yml", "stop"]))?;
        assert_eq!(up.try_wait()?, Some(Some(0)));
        Ok(())
    }

    #[test]
    fn test_fail_on() {
        let mock = MockRuntime::new();
        mock.set_fail_on("up");

        assert!(mock.spawn(&Invocation::compose(["up"])).is_err());
        assert_eq!(mock.spawned(), vec!["compose up"]);
    }
}
