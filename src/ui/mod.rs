//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, keyboard event loop, play/step pacing
//! - **[`highlight`]**: per-index fading marks fed by buffer observer events
//! - **[`panes`]**: stateless render functions for each visible pane (bars,
//!   scratch bars, stats, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Config`](crate::config::Config) and call [`App::run`] to start the event
//! loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod highlight;
pub mod panes;
pub mod theme;

pub use app::App;
