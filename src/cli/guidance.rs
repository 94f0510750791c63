use crate::error::PreconditionError;
use colored::Colorize;

/// (message, command hint) pairs shown when a target container is down
pub fn unavailable_guidance(container: &str) -> Vec<(String, &'static str)> {
    vec![
        (
            format!(
                "The {container} container does not seem to be running. Try to serve and then try again."
            ),
            "$ is serve",
        ),
        ("Run the help command for more info".to_string(), "$ is --help"),
        (
            "If the containers failed to shut down, use the kill command".to_string(),
            "$ is kill",
        ),
    ]
}

pub fn print_unavailable(container: &str) {
    for (message, hint) in unavailable_guidance(container) {
        println!("{} {}", message.yellow(), hint.green());
    }
}

pub fn print_error(err: &anyhow::Error) {
    match err.downcast_ref::<PreconditionError>() {
        Some(precondition) => {
            eprintln!("{}", precondition.to_string().red());
            eprintln!("{}", precondition.remedy().yellow());
        }
        None => eprintln!("{} {err:#}", "error:".red().bold()),
    }
}

pub fn print_snapshot_created(name: &str) {
    println!("{} {}", "Created new snapshot:".yellow(), name.red());
    println!("{} {}", "To restore run:".yellow(), format!("is restore {name}").red());
}

pub fn print_restore_started(database: &str, name: &str) {
    println!("{} {}", format!("Restoring {database} db to:").yellow(), name.red());
    println!("{}", "This may take awhile".yellow());
}

pub fn print_restore_done(database: &str, name: &str) {
    println!(
        "{} {}",
        format!("DB {database} has been restored from snapshot:").green(),
        name.red()
    );
}
