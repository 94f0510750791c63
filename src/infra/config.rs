use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const GLOBAL_CONFIG_NAME: &str = "is.toml";
pub const LOCAL_CONFIG_NAME: &str = ".is.toml";

pub const DEFAULT_PROJECT_NAME: &str = "in-spiritus";
pub const DEFAULT_DATABASE_NAME: &str = "in_spiritus";
pub const DEFAULT_MARKER_DIR: &str = "docker";
pub const DEFAULT_COMPOSE_FILE: &str = "docker/docker-compose.yml";
pub const DEFAULT_NO_SYNC_COMPOSE_FILE: &str = "docker/docker-compose-no-sync.yml";

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
        .join(".config/is")
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: Option<String>,
    pub marker_dir: Option<String>,
    pub database: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ComposeConfig {
    pub file: Option<String>,
    pub no_sync_file: Option<String>,
    pub program: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct DockerConfig {
    pub program: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ContainersConfig {
    pub app: Option<String>,
    pub database: Option<String>,
    pub cache: Option<String>,
    pub tools: Option<String>,
    pub zeus: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    pub prefix: Option<String>,
}

/// Raw config file contents. Every field is optional so layers can be merged.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub containers: ContainersConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

fn overlay<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

impl AppConfig {
    /// Merges another AppConfig into self.
    /// Values from `other` overwrite values in `self` if present.
    pub fn merge(&mut self, other: AppConfig) {
        overlay(&mut self.project.name, other.project.name);
        overlay(&mut self.project.marker_dir, other.project.marker_dir);
        overlay(&mut self.project.database, other.project.database);

        overlay(&mut self.compose.file, other.compose.file);
        overlay(&mut self.compose.no_sync_file, other.compose.no_sync_file);
        overlay(&mut self.compose.program, other.compose.program);

        overlay(&mut self.docker.program, other.docker.program);

        overlay(&mut self.containers.app, other.containers.app);
        overlay(&mut self.containers.database, other.containers.database);
        overlay(&mut self.containers.cache, other.containers.cache);
        overlay(&mut self.containers.tools, other.containers.tools);
        overlay(&mut self.containers.zeus, other.containers.zeus);

        overlay(&mut self.snapshot.prefix, other.snapshot.prefix);
    }
}

/// Logical service names inside the compose project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerNames {
    pub app: String,
    pub database: String,
    pub cache: String,
    pub tools: String,
    pub zeus: String,
}

impl Default for ContainerNames {
    fn default() -> Self {
        Self {
            app: "web".into(),
            database: "db".into(),
            cache: "redis".into(),
            tools: "python".into(),
            zeus: "zeus".into(),
        }
    }
}

/// Resolved configuration handed to every command handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub project_root: PathBuf,
    pub project_name: String,
    pub database_name: String,
    /// Subdirectory whose presence marks a valid project root
    pub marker_dir: PathBuf,
    /// Compose files, relative to the project root unless absolute
    pub compose_file: String,
    pub no_sync_compose_file: String,
    pub compose_program: String,
    pub docker_program: String,
    pub containers: ContainerNames,
    pub snapshot_prefix: String,
}

impl Settings {
    /// Built-in defaults for a project rooted at `project_root`
    pub fn for_root(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            project_name: DEFAULT_PROJECT_NAME.into(),
            database_name: DEFAULT_DATABASE_NAME.into(),
            marker_dir: PathBuf::from(DEFAULT_MARKER_DIR),
            compose_file: DEFAULT_COMPOSE_FILE.into(),
            no_sync_compose_file: DEFAULT_NO_SYNC_COMPOSE_FILE.into(),
            compose_program: "docker-compose".into(),
            docker_program: "docker".into(),
            containers: ContainerNames::default(),
            snapshot_prefix: DEFAULT_PROJECT_NAME.into(),
        }
    }

    /// Applies a merged config on top of the defaults
    pub fn from_config(project_root: &Path, config: AppConfig) -> Result<Self> {
        let mut settings = Self::for_root(project_root);

        if let Some(name) = config.project.name {
            // The snapshot prefix follows the project name unless set explicitly
            settings.snapshot_prefix = name.clone();
            settings.project_name = name;
        }
        if let Some(db) = config.project.database {
            settings.database_name = db;
        }
        if let Some(marker) = config.project.marker_dir {
            settings.marker_dir = PathBuf::from(expand(&marker)?);
        }

        if let Some(file) = config.compose.file {
            settings.compose_file = expand(&file)?;
        }
        if let Some(file) = config.compose.no_sync_file {
            settings.no_sync_compose_file = expand(&file)?;
        }
        if let Some(program) = config.compose.program {
            settings.compose_program = expand(&program)?;
        }
        if let Some(program) = config.docker.program {
            settings.docker_program = expand(&program)?;
        }

        let names = &mut settings.containers;
        let c = config.containers;
        if let Some(v) = c.app {
            names.app = v;
        }
        if let Some(v) = c.database {
            names.database = v;
        }
        if let Some(v) = c.cache {
            names.cache = v;
        }
        if let Some(v) = c.tools {
            names.tools = v;
        }
        if let Some(v) = c.zeus {
            names.zeus = v;
        }

        if let Some(prefix) = config.snapshot.prefix {
            settings.snapshot_prefix = prefix;
        }

        Ok(settings)
    }
}

/// Expands `~` and `$VAR` in path-like values
fn expand(value: &str) -> Result<String> {
    shellexpand::full(value)
        .map(|v| v.into_owned())
        .with_context(|| format!("expanding {value:?}"))
}

fn read_config(path: &Path) -> Result<Option<AppConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("parsing {:?}", path))?;

    debug!("loaded config from {:?}", path);
    Ok(Some(config))
}

/// Global config first, then the project-local `.is.toml` on top
pub fn load_app_config(config_dir: &Path, project_root: &Path) -> Result<AppConfig> {
    let mut app_config = AppConfig::default();

    if let Some(global) = read_config(&config_dir.join(GLOBAL_CONFIG_NAME))? {
        app_config = global;
    }

    if let Some(local) = read_config(&project_root.join(LOCAL_CONFIG_NAME))? {
        app_config.merge(local);
    }

    Ok(app_config)
}

pub fn load_settings(config_dir: &Path, project_root: &Path) -> Result<Settings> {
    let config = load_app_config(config_dir, project_root)?;
    Settings::from_config(project_root, config)
}
