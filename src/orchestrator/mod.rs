//! Application-level orchestration utilities.
//!
//! This module owns the enhancement request lifecycle (submit/supersede/cancel) and
//! post-result processing such as exports. UI/CLI layers call into this module to keep
//! responsibilities separated.

mod controller;
#[cfg(feature = "tui")]
mod dispatch;
#[cfg(feature = "tui")]
mod post_process;

pub(crate) use controller::{EnhancementController, Outcome};
#[cfg(feature = "tui")]
pub(crate) use dispatch::{run_controller, UiCommand};
#[cfg(feature = "tui")]
pub(crate) use post_process::process_result;
