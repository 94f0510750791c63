pub mod config;
pub mod docker_adapter;
pub mod signals;

pub use config::Settings;
pub use docker_adapter::DockerAdapter;
