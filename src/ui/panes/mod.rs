//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`bars`]: bar chart of a buffer, colored by recent accesses and writes
//! - [`stats`]: run summary and operation counters
//! - [`status`]: status bar with keybindings and run state
//!
//! Each pane module exports a primary `render_*` function taking a
//! `*RenderData` struct, so the app decides what to show and the pane only
//! decides how.

pub mod bars;
pub mod stats;
pub mod status;

pub use bars::{render_bars_pane, BarsRenderData};
pub use stats::{render_stats_pane, StatsRenderData};
pub use status::{render_status_bar, RunIndicator, StatusRenderData};
