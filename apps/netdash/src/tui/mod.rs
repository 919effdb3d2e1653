pub mod keys;
pub mod terminal;

pub use terminal::{event_loop, TerminalRenderer, Tui};
