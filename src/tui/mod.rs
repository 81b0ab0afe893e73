//! Terminal dashboard.
//!
//! A ratatui front end over [`ViewController`](crate::controller::ViewController):
//! key presses become controller calls, and fetches and searches run as
//! background tasks that report back through [`Message`]s.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod panels;
pub mod runner;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message};
pub use runner::{TaskRunner, run};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
