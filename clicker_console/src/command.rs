//! Console commands
//!
//! Parsing is case-insensitive and ignores surrounding and repeated whitespace.

use std::str::FromStr;

use clicker_core::ClickerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click,
    BuyDouble,
    BuyPps,
    Status,
    Help,
    Exit,
}

impl Command {
    pub const HELP: &'static str = "\
Commands:
  c, click     earn points (1 per click, modified by the active power-up)
  buy double   spend 50 for double points over 20 seconds
  buy pps      spend 30 for +1 point per second, permanently
  status       show score, passive income and active strategy
  help         show this list
  exit         quit the game";
}

impl FromStr for Command {
    type Err = ClickerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        match normalized.as_str() {
            "c" | "click" => Ok(Command::Click),
            "buy double" => Ok(Command::BuyDouble),
            "buy pps" => Ok(Command::BuyPps),
            "status" => Ok(Command::Status),
            "help" => Ok(Command::Help),
            "exit" => Ok(Command::Exit),
            _ => Err(ClickerError::UnknownCommand(input.trim().to_string())),
        }
    }
}
