pub mod config;
pub mod effects;
pub mod error;
pub mod hud;
pub mod income;
pub mod params;
pub mod powerups;
pub mod resources;
pub mod store;

pub use config::*;
pub use effects::*;
pub use error::ClickerError;
pub use hud::*;
pub use income::*;
pub use params::*;
pub use powerups::*;
pub use resources::*;
pub use store::*;
