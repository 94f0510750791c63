use crate::domain::Invocation;
use crate::domain::snapshot::default_snapshot_name;
use crate::error::PreconditionError;
use crate::infra::Settings;

/// Turns subcommands into compose/docker invocations for one project
#[derive(Debug, Clone, Copy)]
pub struct CommandCatalogue<'a> {
    settings: &'a Settings,
}

impl<'a> CommandCatalogue<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    fn compose_file(&self) -> &str {
        &self.settings.compose_file
    }

    fn compose(&self, verb: &str) -> Invocation {
        Invocation::compose(["-f", self.compose_file(), verb])
    }

    /// `-f <file> exec <container> <cmd...>`, requiring `container` to run
    fn exec(&self, container: &str, cmd: &[&str]) -> Invocation {
        Invocation::compose(["-f", self.compose_file(), "exec", container])
            .with_args(cmd.iter().copied())
            .on(container)
    }

    pub fn serve_up(&self, sync: bool) -> Invocation {
        let file = if sync {
            &self.settings.compose_file
        } else {
            &self.settings.no_sync_compose_file
        };
        Invocation::compose(["-f", file.as_str(), "up"])
    }

    /// Always against the default file, which covers every service
    pub fn serve_stop(&self) -> Invocation {
        self.compose("stop")
    }

    pub fn kill(&self) -> Invocation {
        self.compose("kill")
    }

    pub fn console(&self) -> Invocation {
        self.exec(&self.settings.containers.app, &["rails", "c"])
    }

    pub fn bash(&self, container: Option<&str>) -> Invocation {
        let container = container.unwrap_or(&self.settings.containers.app);
        self.exec(container, &["bash"])
    }

    pub fn tail(
        &self,
        log: Option<&str>,
        container: Option<&str>,
        path: Option<&str>,
    ) -> Invocation {
        let container = container.unwrap_or(&self.settings.containers.app);
        let file = format!(
            "{}{}.log",
            path.unwrap_or("./log/"),
            log.unwrap_or("development")
        );
        self.exec(container, &["tail", "-f", file.as_str()])
    }

    pub fn psql(&self) -> Invocation {
        self.exec(&self.settings.containers.database, &["psql", "-U", "postgres"])
    }

    pub fn redis(&self) -> Invocation {
        self.exec(&self.settings.containers.cache, &["redis-cli"])
    }

    pub fn migrate(&self) -> Invocation {
        self.exec(&self.settings.containers.app, &["rake", "db:migrate"])
    }

    pub fn reset(&self) -> Invocation {
        self.exec(&self.settings.containers.app, &["rake", "db:reset"])
    }

    pub fn wipe(&self) -> Invocation {
        self.exec(&self.settings.containers.app, &["rake", "clean:all"])
    }

    pub fn test(&self) -> Invocation {
        self.exec(&self.settings.containers.app, &["rake", "test"])
    }

    pub fn rails(&self, args: &[String]) -> Invocation {
        self.exec(&self.settings.containers.app, &["rails"])
            .with_args(args.iter().cloned())
    }

    pub fn rake(&self, args: &[String]) -> Invocation {
        self.exec(&self.settings.containers.app, &["rake"])
            .with_args(args.iter().cloned())
    }

    pub fn zeus(&self, args: &[String]) -> Invocation {
        self.exec(&self.settings.containers.zeus, &["zeus"])
            .with_args(args.iter().cloned())
    }

    pub fn stellar(&self, args: &[String]) -> Invocation {
        self.exec(&self.settings.containers.tools, &["stellar"])
            .with_args(args.iter().cloned())
    }

    /// Snapshot name is always the final argument
    pub fn snapshot(&self, name: &str) -> Invocation {
        self.exec(
            &self.settings.containers.tools,
            &["-T", "stellar", "snapshot", name],
        )
    }

    /// The given name, or `<prefix>-<unix seconds>`
    pub fn snapshot_name(&self, name: Option<&str>) -> String {
        match name {
            Some(name) => name.to_string(),
            None => default_snapshot_name(&self.settings.snapshot_prefix),
        }
    }

    pub fn restore(&self, name: Option<&str>) -> Result<Invocation, PreconditionError> {
        let name = name.ok_or(PreconditionError::MissingArgument {
            argument: "name",
            command: "restore",
        })?;

        Ok(self.exec(
            &self.settings.containers.tools,
            &["stellar", "restore", name],
        ))
    }

    pub fn pry(&self, container_id: &str) -> Invocation {
        Invocation::docker(["attach", container_id], &self.settings.containers.app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tool;
    use std::path::Path;

    fn settings() -> Settings {
        Settings::for_root(Path::new("/srv/in-spiritus"))
    }

    #[test]
    fn test_serve_selects_compose_file() {
        let settings = settings();
        let catalogue = CommandCatalogue::new(&settings);

        let up = catalogue.serve_up(true);
        assert_eq!(up.args, vec!["-f", "docker/docker-compose.yml", "up"]);
        assert!(!up.require_running);

        let up = catalogue.serve_up(false);
        assert_eq!(up.args, vec!["-f", "docker/docker-compose-no-sync.yml", "up"]);
        assert!(!up.args.contains(&"docker/docker-compose.yml".to_string()));
    }

    #[test]
    fn test_stop_and_kill_use_default_file() {
        let settings = settings();
        let catalogue = CommandCatalogue::new(&settings);

        assert_eq!(
            catalogue.serve_stop().args,
            vec!["-f", "docker/docker-compose.yml", "stop"]
        );
        let kill = catalogue.kill();
        assert_eq!(kill.args, vec!["-f", "docker/docker-compose.yml", "kill"]);
        assert_eq!(kill.container, None);
    }

    #[test]
    fn test_exec_commands_target_their_container() {
        let settings = settings();
        let catalogue = CommandCatalogue::new(&settings);

        let cases = [
            (catalogue.console(), "web", vec!["rails", "c"]),
            (catalogue.psql(), "db", vec!["psql", "-U", "postgres"]),
            (catalogue.redis(), "redis", vec!["redis-cli"]),
            (catalogue.migrate(), "web", vec!["rake", "db:migrate"]),
            (catalogue.reset(), "web", vec!["rake", "db:reset"]),
            (catalogue.wipe(), "web", vec!["rake", "clean:all"]),
            (catalogue.test(), "web", vec!["rake", "test"]),
        ];

        for (inv, container, tail) in cases {
            assert_eq!(inv.tool, Tool::Compose);
            assert_eq!(inv.container.as_deref(), Some(container));
            assert!(inv.require_running);
            assert_eq!(&inv.args[..4], ["-f", "docker/docker-compose.yml", "exec", container]);
            assert_eq!(&inv.args[4..], tail.as_slice());
        }
    }

    #[test]
    fn test_bash_container_override() {
        let settings = settings();
        let catalogue = CommandCatalogue::new(&settings);

        assert_eq!(catalogue.bash(None).container.as_deref(), Some("web"));
        let inv = catalogue.bash(Some("db"));
        assert_eq!(inv.container.as_deref(), Some("db"));
        assert_eq!(inv.args[3..], ["db", "bash"]);
    }

    #[test]
    fn test_tail_paths() {
        let settings = settings();
        let catalogue = CommandCatalogue::new(&settings);

        assert_eq!(
            catalogue.tail(None, None, None).last_arg(),
            Some("./log/development.log")
        );
        let inv = catalogue.tail(Some("xero"), Some("worker"), Some("/var/log/"));
        assert_eq!(inv.last_arg(), Some("/var/log/xero.log"));
        assert_eq!(inv.container.as_deref(), Some("worker"));
    }

    #[test]
    fn test_pass_through_forwards_args_verbatim() {
        let settings = settings();
        let catalogue = CommandCatalogue::new(&settings);
        let args: Vec<String> = ["g", "model", "Post", "title", "date:datetime"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let inv = catalogue.rails(&args);
        assert_eq!(inv.args[5..], args[..]);
        assert_eq!(inv.args[4], "rails");

        let inv = catalogue.stellar(&args);
        assert_eq!(inv.container.as_deref(), Some("python"));
        assert_eq!(inv.args[5..], args[..]);

        let inv = catalogue.zeus(&[]);
        assert_eq!(inv.args, vec!["-f", "docker/docker-compose.yml", "exec", "zeus", "zeus"]);
    }

    #[test]
    fn test_snapshot_and_restore() {
        let settings = settings();
        let catalogue = CommandCatalogue::new(&settings);

        let inv = catalogue.snapshot("before-upgrade");
        assert_eq!(inv.args[4..], ["-T", "stellar", "snapshot", "before-upgrade"]);
        assert_eq!(inv.container.as_deref(), Some("python"));

        assert_eq!(catalogue.snapshot_name(Some("mine")), "mine");
        assert!(catalogue.snapshot_name(None).starts_with("in-spiritus-"));

        let inv = catalogue.restore(Some("before-upgrade")).unwrap();
        assert_eq!(inv.last_arg(), Some("before-upgrade"));
        assert!(matches!(
            catalogue.restore(None),
            Err(PreconditionError::MissingArgument { command: "restore", .. })
        ));
    }

    #[test]
    fn test_pry_attaches_with_docker() {
        let settings = settings();
        let catalogue = CommandCatalogue::new(&settings);

        let inv = catalogue.pry("abc123");
        assert_eq!(inv.tool, Tool::Docker);
        assert_eq!(inv.args, vec!["attach", "abc123"]);
        assert_eq!(inv.container.as_deref(), Some("web"));
    }
}
