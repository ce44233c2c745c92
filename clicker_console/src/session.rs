use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clicker_core::*;
use tokio::runtime::Handle;

use crate::command::Command;

/// Whether the read loop should keep going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// Abstract output for testing
pub trait Console: Send + Sync {
    fn write_line(&self, line: &str);
}

pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}

/// Prints the score display on the console
struct ConsoleLabel(Arc<dyn Console>);

impl TextLabel for ConsoleLabel {
    fn set_text(&self, text: &str) {
        self.0.write_line(text);
    }
}

/// Announces when the double power-up becomes affordable
struct ShopHint {
    console: Arc<dyn Console>,
    unlocked: AtomicBool,
}

impl Toggle for ShopHint {
    fn set_enabled(&self, enabled: bool) {
        let was_unlocked = self.unlocked.swap(enabled, Ordering::SeqCst);
        if enabled && !was_unlocked {
            self.console
                .write_line("Double points is affordable! Type 'buy double'.");
        }
    }
}

/// One game from start to exit
pub struct Session {
    pub console: Arc<dyn Console>,
    pub config: Config,
    pub store: Arc<ScoreStore>,
    pub power_ups: PowerUps,
    pub income: PassiveIncome,
    pub hud: Hud,
}

impl Session {
    pub fn new(config: Config, console: Arc<dyn Console>, runtime: Handle) -> Self {
        let store = Arc::new(ScoreStore::new(&config));
        let power_ups = PowerUps::new(store.clone(), &config, runtime.clone());
        let income = PassiveIncome::spawn(store.clone(), &config, &runtime);

        let label: Arc<dyn TextLabel> = Arc::new(ConsoleLabel(console.clone()));
        let hint: Arc<dyn Toggle> = Arc::new(ShopHint {
            console: console.clone(),
            unlocked: AtomicBool::new(false),
        });
        let hud = Hud::new(Some(label), Some(hint), &config);

        Self {
            console,
            config,
            store,
            power_ups,
            income,
            hud,
        }
    }

    /// Print the banner and attach the score display
    pub fn start(&self) {
        self.console.write_line("=== Clicker ===");
        self.console.write_line("Type 'help' for the command list.");
        self.hud.attach(&self.store);
        tracing::info!("session started");
    }

    /// Parse and run one line of input. Blank lines are ignored.
    pub fn handle_line(&self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(err) => {
                self.console.write_line(&err.to_string());
                Flow::Continue
            }
        }
    }

    pub fn execute(&self, command: Command) -> Flow {
        tracing::debug!(?command, "command");
        match command {
            Command::Click => {
                self.store.click();
            }
            Command::BuyDouble => {
                let console = self.console.clone();
                let on_expire = move || console.write_line("Double points expired.");
                let refresh = self.power_ups.is_double_active();
                match self.power_ups.buy_double(on_expire) {
                    Ok(()) if refresh => self.console.write_line(&format!(
                        "Double points refreshed for {} seconds!",
                        self.config.double_duration.as_secs()
                    )),
                    Ok(()) => self.console.write_line(&format!(
                        "Double points active for {} seconds!",
                        self.config.double_duration.as_secs()
                    )),
                    Err(err) => self.console.write_line(&err.to_string()),
                }
            }
            Command::BuyPps => match self.power_ups.buy_passive() {
                Ok(rate) => self
                    .console
                    .write_line(&format!("Passive income is now {rate} points per second.")),
                Err(err) => self.console.write_line(&err.to_string()),
            },
            Command::Status => {
                let line = self.status_line();
                self.console.write_line(&line);
            }
            Command::Help => self.console.write_line(Command::HELP),
            Command::Exit => {
                self.console.write_line(&format!(
                    "Goodbye! Final score: {}",
                    self.store.score()
                ));
                self.shutdown();
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    pub fn status_line(&self) -> String {
        let snapshot = self.store.snapshot();
        let mut line = format!(
            "Score: {} | Clicks: {} | PPS: {} | Strategy: {}",
            snapshot.score, snapshot.clicks, snapshot.passive_rate, snapshot.click_effect
        );
        if let Some(remaining) = self.power_ups.double_remaining() {
            line.push_str(&format!(" ({}s left)", remaining.as_secs()));
        }
        line
    }

    /// Stop every timer and detach the display. Safe to call more than once.
    pub fn shutdown(&self) {
        self.income.cancel();
        self.power_ups.cancel();
        self.hud.detach(&self.store);
        tracing::info!(score = self.store.score(), "session ended");
    }
}
