//! Frontends that host the widget.

pub mod events;
pub mod tui;

pub use events::{DemoAction, FrontendEvent};
pub use tui::TuiFrontend;
