use crate::services::ShutdownTrigger;
use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver};
use tracing::debug;

/// Installs the process-wide Ctrl+C / SIGTERM handler.
///
/// The handler only forwards into the returned channel. The process keeps
/// running so an attached child (rails console, psql...) sees the
/// interrupt first and `serve` can shut its containers down in order.
pub fn install_shutdown_channel() -> Result<Receiver<ShutdownTrigger>> {
    let (tx, rx) = mpsc::channel();

    ctrlc::set_handler(move || {
        debug!("interrupt received");
        // Nobody listening (non-serve commands): the child handles it
        let _ = tx.send(ShutdownTrigger::Interrupt);
    })
    .context("installing the interrupt handler")?;

    Ok(rx)
}
