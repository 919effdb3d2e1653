//! Text rendering of the dashboard state.

pub mod chart;
pub mod dashboard;
pub mod table;
pub mod text;

pub use dashboard::render_dashboard;
pub use text::{Line, Span, UiOpts};
