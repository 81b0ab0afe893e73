//! Reusable UI pieces shared by the dashboard layout.

pub mod header;
pub mod popup;
pub mod search_bar;
pub mod status_bar;
