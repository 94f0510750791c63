use anyhow::Result;
use is_cli::cli::{App, Command};
use is_cli::infra::Settings;
use is_cli::services::{
    CommandCatalogue, PreconditionChecker, ServeSession, ServeState, ShutdownTrigger,
};
use is_cli::test_support::MockRuntime;
use std::fs;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

fn project() -> Result<(tempfile::TempDir, Settings)> {
    let root = tempfile::tempdir()?;
    fs::create_dir(root.path().join("docker"))?;
    let settings = Settings::for_root(root.path());
    Ok((root, settings))
}

#[test]
fn test_interrupt_issues_stop_before_finishing() -> Result<()> {
    let (_root, settings) = project()?;
    let mock = Arc::new(MockRuntime::new());
    let checker = PreconditionChecker::new(mock.clone(), &settings);
    let (tx, rx) = mpsc::channel();

    let sender = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        tx.send(ShutdownTrigger::Interrupt)
    });

    let report = ServeSession::new(&checker, CommandCatalogue::new(&settings)).run(true, &rx)?;
    sender.join().expect("sender thread")?;

    assert_eq!(report.trigger, ShutdownTrigger::Interrupt);
    assert_eq!(report.exit_code, 0);
    assert_eq!(
        report.transitions,
        vec![
            ServeState::Starting,
            ServeState::Running,
            ServeState::Stopping,
            ServeState::Stopped
        ]
    );
    assert_eq!(
        mock.spawned(),
        vec![
            "compose -f docker/docker-compose.yml up",
            "compose -f docker/docker-compose.yml stop",
        ]
    );

    // compose up was waited on, not abandoned
    let children = mock.children();
    let up = children[0].lock().unwrap();
    assert!(up.waited);
    assert!(up.exit.is_some());
    Ok(())
}

#[test]
fn test_no_sync_uses_alternate_file_and_stops_with_default() -> Result<()> {
    let (_root, settings) = project()?;
    let mock = Arc::new(MockRuntime::new());
    let checker = PreconditionChecker::new(mock.clone(), &settings);
    let (tx, rx) = mpsc::channel();
    tx.send(ShutdownTrigger::Interrupt)?;

    ServeSession::new(&checker, CommandCatalogue::new(&settings)).run(false, &rx)?;

    let spawned = mock.spawned();
    assert_eq!(spawned[0], "compose -f docker/docker-compose-no-sync.yml up");
    assert!(!spawned[0].contains("docker/docker-compose.yml"));
    assert_eq!(spawned[1], "compose -f docker/docker-compose.yml stop");
    Ok(())
}

#[test]
fn test_up_exiting_on_its_own_still_stops_containers() -> Result<()> {
    let (_root, settings) = project()?;
    let mock = Arc::new(MockRuntime::new());
    let checker = PreconditionChecker::new(mock.clone(), &settings);
    let (_tx, rx) = mpsc::channel();

    let background = mock.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        background.finish_long_running(Some(3));
    });

    let start = Instant::now();
    let report = ServeSession::new(&checker, CommandCatalogue::new(&settings)).run(true, &rx)?;

    assert_eq!(report.trigger, ShutdownTrigger::ChildExited(Some(3)));
    assert_eq!(report.exit_code, 3);
    assert!(start.elapsed() < Duration::from_secs(5), "serve hung");
    assert_eq!(
        mock.spawned().last().map(String::as_str),
        Some("compose -f docker/docker-compose.yml stop")
    );
    Ok(())
}

#[test]
fn test_closed_shutdown_channel_waits_for_up() -> Result<()> {
    let (_root, settings) = project()?;
    let mock = Arc::new(MockRuntime::new());
    mock.set_exit_code(Some(0));
    let checker = PreconditionChecker::new(mock.clone(), &settings);
    let (tx, rx) = mpsc::channel::<ShutdownTrigger>();
    drop(tx);

    let report = ServeSession::new(&checker, CommandCatalogue::new(&settings)).run(true, &rx)?;

    assert_eq!(report.trigger, ShutdownTrigger::ChildExited(Some(0)));
    assert_eq!(report.transitions.last(), Some(&ServeState::Stopped));
    Ok(())
}

#[test]
fn test_serve_command_through_app() -> Result<()> {
    let (_root, settings) = project()?;
    let mock = Arc::new(MockRuntime::new());
    let app = App::with_runtime(settings, mock.clone());
    let (tx, rx) = mpsc::channel();
    tx.send(ShutdownTrigger::Interrupt)?;

    let code = app.run(Command::Serve { no_sync: true }, &rx)?;

    assert_eq!(code, 0);
    assert_eq!(mock.spawned().len(), 2);
    assert!(mock.get_commands().iter().all(|c| !c.starts_with("ps:")));
    Ok(())
}
