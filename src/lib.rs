//! Guided recipe walkthrough: load a step list, then walk through it one
//! acknowledged step at a time with optional countdown timers.

pub mod cli;
pub mod countdown;
pub mod error;
pub mod loader;
pub mod logging;
pub mod model;
pub mod runner;
pub mod tui;

pub use countdown::{format_mmss, Countdown, SleepTicker, Ticker};
pub use error::{LoadError, SessionError};
pub use loader::{load_recipe, parse_line, parse_recipe};
pub use model::{LineWarning, LoadedRecipe, Recipe, SkipReason, Step};
pub use runner::{GuidedRunner, SessionState};
