//! Error types for the clicker core
//!
//! None of these are fatal. Each one describes a piece of misuse that the
//! caller recovers from locally, and the `Display` text is what a frontend
//! shows the player.

use thiserror::Error;

use crate::effects::Effect;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClickerError {
    /// `apply_effect` was called without an effect
    #[error("No effect selected, nothing applied")]
    NoEffect,

    /// A purchase cost more than the current score
    #[error("Not enough points! Need {cost}, have {score}.")]
    InsufficientFunds { cost: i64, score: i64 },

    /// A whole-score effect was installed in the per-click slot
    #[error("{0} cannot be used as a click strategy")]
    NotAClickEffect(Effect),

    /// Console input that matches no command
    #[error("Unknown command '{0}'. Type 'help' for the command list.")]
    UnknownCommand(String),

    /// A display binding was never configured
    #[error("{0} is not wired")]
    MissingWiring(&'static str),
}

pub type Result<T> = std::result::Result<T, ClickerError>;
