pub mod command;
pub mod logging;
pub mod session;


pub use command::Command;
pub use session::{Console, Flow, Session, StdoutConsole};
