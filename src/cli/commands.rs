use crate::infra::config::default_config_dir;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:

  $ is serve
  $ is serve --no-sync
  $ is bash
  $ is bash --help
  $ is psql
  $ is console
  $ is c
  $ is reset
  $ is snapshot MY_SNAPSHOT
  $ is restore MY_SNAPSHOT
  $ is kill
  $ is rails g model Post title description date:datetime
  $ is rake test
  $ is rake db:rollback
  $ is wipe
  $ is tail
  $ is tail xero";

#[derive(Parser, Debug)]
#[command(
    name = "is",
    version,
    about = "Project shortcuts over docker-compose",
    after_help = EXAMPLES,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Project root (must contain the docker/ directory). Defaults to the current directory
    #[arg(long, env = "IS_PROJECT_DIR", global = true)]
    pub project_dir: Option<PathBuf>,

    /// Directory holding the global is.toml
    #[arg(long, env = "IS_CONFIG_DIR", default_value_os_t = default_config_dir(), global = true)]
    pub config_dir: PathBuf,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start all docker containers
    #[command(visible_aliases = ["server", "s"])]
    Serve {
        /// Don't start the syncing containers, sidekiq and worker
        #[arg(short = 'n', long)]
        no_sync: bool,
    },
    /// Kill all containers
    #[command(visible_alias = "k")]
    Kill,
    /// Starts a rails console on the web container
    #[command(visible_alias = "c")]
    Console,
    /// Attach to the web container to use pry
    Pry,
    /// Starts a bash shell in the container. Defaults to web container
    #[command(visible_alias = "b")]
    Bash {
        /// The container to connect to
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Tail logs. Defaults to the development log of the web container
    Tail {
        log: Option<String>,
        /// The container to connect to and tail
        #[arg(short, long)]
        container: Option<String>,
        /// Directory prefix, not the full file path: tails <path><log>.log (default ./log/)
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Starts a psql session on the db container
    Psql,
    /// Starts a redis-cli session on the redis container
    Redis,
    /// Runs pending db migrations
    Migrate,
    /// Drop db, runs rake db:reset
    Reset,
    /// Wipe all data and reseed without dropping
    Wipe,
    /// Run rails commands on the web container. Flags are not allowed; use `is bash` for those
    Rails { args: Vec<String> },
    /// Run rake commands on the web container. Flags are not allowed
    Rake { args: Vec<String> },
    /// Run zeus commands on the zeus container. Flags are not allowed
    Zeus { args: Vec<String> },
    /// Run stellar commands on the python container. Flags are not allowed
    Stellar { args: Vec<String> },
    /// Create a snapshot of the dev db
    Snapshot { name: Option<String> },
    /// Restore the dev db to the given snapshot
    Restore { name: Option<String> },
    /// Run test suite
    #[command(visible_alias = "t")]
    Test,
}
