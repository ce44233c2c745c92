use std::io::BufRead;
use std::sync::Arc;

use anyhow::Context;
use clicker_console::logging::init_logging;
use clicker_console::{Console, Flow, Session, StdoutConsole};
use clicker_core::Config;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

// Blocking stdin lives on its own thread so exiting never waits on a pending read
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let console: Arc<dyn Console> = Arc::new(StdoutConsole);
    let session = Session::new(Config::new(), console, Handle::current());
    session.start();

    let mut lines = spawn_stdin_reader();
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    tracing::info!("stdin closed");
                    session.shutdown();
                    break;
                };
                let line = line.context("reading command from stdin")?;
                if session.handle_line(&line) == Flow::Exit {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C");
                session.shutdown();
                break;
            }
        }
    }

    Ok(())
}
